use burn::{
    config::Config,
    data::dataloader::batcher::Batcher,
    tensor::{backend::Backend, Data, ElementConversion, Int, Tensor},
};
use derive_new::new;
use image::GenericImageView;
use itertools::Itertools;

use self::folder::ImageItem;

pub mod error;
pub mod folder;
pub mod transform;

/// Target edge lengths of the standard resize transforms.
pub const IMG_WIDTH: u32 = 224;
pub const IMG_HEIGHT: u32 = 224;

/// Dataloader settings shared by driver code building the splits.
#[derive(Config)]
pub struct LoaderConfig {
    #[config(default = 64)]
    pub batch_size: usize,
    #[config(default = 4)]
    pub num_workers: usize,
    #[config(default = 42)]
    pub seed: u64,
}

#[derive(new)]
pub struct ImageBatcher<B: Backend> {
    device: B::Device,
}

#[derive(Debug, Clone)]
pub struct ImageBatch<B: Backend> {
    pub images: Tensor<B, 4>,
    pub labels: Tensor<B, 1, Int>,
}

impl<B: Backend> Batcher<ImageItem, ImageBatch<B>> for ImageBatcher<B> {
    fn batch(&self, items: Vec<ImageItem>) -> ImageBatch<B> {
        // Stacking requires every image in the batch to share dimensions;
        // the resize transform is responsible for that.
        if let Some(first) = items.first() {
            debug_assert!(items
                .iter()
                .all(|item| item.image.dimensions() == first.image.dimensions()));
        }

        let images = items
            .iter()
            .map(|item| item.image.to_rgb8())
            .map(|rgb| {
                let (width, height) = rgb.dimensions();
                let pixels = rgb
                    .into_raw()
                    .into_iter()
                    .map(|value| value as f32 / 255.0)
                    .collect_vec();
                Data::<f32, 3>::new(pixels, [height as usize, width as usize, 3].into())
            })
            .map(|data| Tensor::<B, 3>::from_data(data.convert(), &self.device))
            .map(|tensor|
                 // H x W x C -> C x W x H
                 tensor.swap_dims(0, 2)
                 // C x W x H -> C x H x W
                 .transpose())
            .collect_vec();

        let labels = items
            .iter()
            .map(|item| item.label as i64)
            .map(|label| Data::from([label.elem()]))
            .map(|data| Tensor::<B, 1, Int>::from_data(data, &self.device))
            .collect_vec();

        ImageBatch {
            images: Tensor::stack(images, 0),
            labels: Tensor::cat(labels, 0),
        }
    }
}
