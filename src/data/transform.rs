use derive_new::new;
use image::imageops::FilterType;
use image::DynamicImage;
use rand::Rng;

use super::{IMG_HEIGHT, IMG_WIDTH};

/// A preprocessing step applied to every decoded image before batching.
pub trait ImageTransform: Send + Sync {
    fn apply(&self, image: DynamicImage) -> DynamicImage;
}

/// Any plain function over images is a transform.
impl<F> ImageTransform for F
where
    F: Fn(DynamicImage) -> DynamicImage + Send + Sync,
{
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        self(image)
    }
}

/// The no-op transform attached when a dataset is built without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl ImageTransform for Identity {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        image
    }
}

/// Chains transforms, applied front to back.
pub struct Compose {
    transforms: Vec<Box<dyn ImageTransform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn ImageTransform>>) -> Self {
        Self { transforms }
    }
}

impl ImageTransform for Compose {
    fn apply(&self, mut image: DynamicImage) -> DynamicImage {
        for transform in &self.transforms {
            image = transform.apply(image);
        }
        image
    }
}

/// Resizes to exactly (width, height), ignoring aspect ratio.
pub struct Resize {
    width: u32,
    height: u32,
    filter: FilterType,
}

impl Resize {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: FilterType::Triangle,
        }
    }

    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

impl ImageTransform for Resize {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        image.resize_exact(self.width, self.height, self.filter)
    }
}

/// Mirrors left-right with probability `p`.
#[derive(Debug, Clone, Copy, new)]
pub struct RandomHorizontalFlip {
    p: f32,
}

impl ImageTransform for RandomHorizontalFlip {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        if rand::thread_rng().gen::<f32>() < self.p {
            image.fliph()
        } else {
            image
        }
    }
}

/// Mirrors top-bottom with probability `p`.
#[derive(Debug, Clone, Copy, new)]
pub struct RandomVerticalFlip {
    p: f32,
}

impl ImageTransform for RandomVerticalFlip {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        if rand::thread_rng().gen::<f32>() < self.p {
            image.flipv()
        } else {
            image
        }
    }
}

/// Rotates by a random quarter turn (90°, 180° or 270°) with
/// probability `p`. Square images keep their dimensions under any
/// quarter turn.
#[derive(Debug, Clone, Copy, new)]
pub struct RandomRotation {
    p: f32,
}

impl ImageTransform for RandomRotation {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        let mut rng = rand::thread_rng();
        if rng.gen::<f32>() >= self.p {
            return image;
        }
        match rng.gen_range(0..3) {
            0 => image.rotate90(),
            1 => image.rotate180(),
            _ => image.rotate270(),
        }
    }
}

/// Collapses to single-channel luma.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grayscale;

impl ImageTransform for Grayscale {
    fn apply(&self, image: DynamicImage) -> DynamicImage {
        image.grayscale()
    }
}

/// Augmentation pipeline for the train split.
pub fn train_transform() -> Compose {
    Compose::new(vec![
        Box::new(Resize::new(IMG_WIDTH, IMG_HEIGHT)),
        Box::new(RandomHorizontalFlip::new(0.3)),
        Box::new(RandomVerticalFlip::new(0.3)),
        Box::new(RandomRotation::new(0.5)),
    ])
}

/// Deterministic pipeline for the test and quick-test splits.
pub fn eval_transform() -> Compose {
    Compose::new(vec![Box::new(Resize::new(IMG_WIDTH, IMG_HEIGHT))])
}
