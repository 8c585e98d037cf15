use std::collections::HashMap;
use std::path::{Path, PathBuf};

use burn::data::dataset::Dataset;
use image::DynamicImage;

use crate::utils::get_env;

use super::error::DataError;
use super::transform::{eval_transform, train_transform, Identity, ImageTransform};

/// Image files are matched one level below the class directory, by this
/// exact extension.
const IMG_EXTENSION: &str = "jpg";

/// Lists the immediate subdirectories of `root` as class names.
///
/// Returns the names sorted ascending together with the name → index
/// table. Indices are dense in `[0, num_classes)` and stable across
/// rescans of the same tree, so the same directory always maps to the
/// same label, in every split and every run.
pub fn find_classes(root: &Path) -> Result<(Vec<String>, HashMap<String, usize>), DataError> {
    let entries = std::fs::read_dir(root).map_err(|source| DataError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let mut classes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DataError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                classes.push(name.to_string());
            }
        }
    }
    classes.sort();

    if classes.is_empty() {
        return Err(DataError::NoClasses(root.to_path_buf()));
    }

    let class_to_index = classes
        .iter()
        .enumerate()
        .map(|(index, name)| (name.clone(), index))
        .collect();

    Ok((classes, class_to_index))
}

/// One sample: the decoded (and transformed) image plus its class index.
#[derive(Debug, Clone)]
pub struct ImageItem {
    pub image: DynamicImage,
    pub label: usize,
}

/// A lazily-decoded image classification dataset over a
/// `root/<class>/<name>.jpg` directory layout.
///
/// The path list and class table are fixed at construction. Every access
/// re-opens and re-decodes the file (nothing is cached), so dataloader
/// workers can pull samples concurrently without coordination.
pub struct ImageFolderDataset {
    paths: Vec<PathBuf>,
    classes: Vec<String>,
    class_to_index: HashMap<String, usize>,
    transform: Box<dyn ImageTransform>,
}

impl ImageFolderDataset {
    /// Scans `root` without attaching a transform.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, DataError> {
        Self::with_transform(root, Identity)
    }

    /// Scans `root`, applying `transform` to every decoded image.
    pub fn with_transform<P, T>(root: P, transform: T) -> Result<Self, DataError>
    where
        P: AsRef<Path>,
        T: ImageTransform + 'static,
    {
        let root = root.as_ref();
        let (classes, class_to_index) = find_classes(root)?;

        let mut paths = Vec::new();
        for class in &classes {
            let dir = root.join(class);
            let entries = std::fs::read_dir(&dir).map_err(|source| DataError::Io {
                path: dir.clone(),
                source,
            })?;
            for entry in entries {
                let entry = entry.map_err(|source| DataError::Io {
                    path: dir.clone(),
                    source,
                })?;
                let path = entry.path();
                if path.is_file() && path.extension().map_or(false, |ext| ext == IMG_EXTENSION) {
                    paths.push(path);
                }
            }
        }
        // Directory enumeration order is platform-dependent; sort so an
        // index refers to the same sample everywhere.
        paths.sort();

        log::debug!(
            "scanned {}: {} images across {} classes",
            root.display(),
            paths.len(),
            classes.len()
        );

        Ok(Self {
            paths,
            classes,
            class_to_index,
            transform: Box::new(transform),
        })
    }

    /// Number of discovered image files.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Class names, sorted ascending.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class name → index table.
    pub fn class_index(&self) -> &HashMap<String, usize> {
        &self.class_to_index
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// File path of the `index`-th sample.
    pub fn path_of(&self, index: usize) -> Option<&Path> {
        self.paths.get(index).map(|path| path.as_path())
    }

    /// Decodes the `index`-th image without applying the transform.
    pub fn load_image(&self, index: usize) -> Result<DynamicImage, DataError> {
        let path = self.paths.get(index).ok_or(DataError::OutOfRange {
            index,
            len: self.paths.len(),
        })?;
        image::open(path).map_err(|source| DataError::ImageDecode {
            path: path.clone(),
            source,
        })
    }

    /// Decodes, labels, and transforms the `index`-th sample.
    pub fn try_get(&self, index: usize) -> Result<ImageItem, DataError> {
        let path = self.paths.get(index).ok_or(DataError::OutOfRange {
            index,
            len: self.paths.len(),
        })?;
        let image = image::open(path).map_err(|source| DataError::ImageDecode {
            path: path.clone(),
            source,
        })?;

        let class = path
            .parent()
            .and_then(|dir| dir.file_name())
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let label = *self
            .class_to_index
            .get(class)
            .ok_or_else(|| DataError::UnknownClass {
                class: class.to_string(),
                path: path.clone(),
            })?;

        Ok(ImageItem {
            image: self.transform.apply(image),
            label,
        })
    }
}

/// Split constructors mirroring the `$DATA_DIR/{train,test,quick_test}`
/// layout, each with the standard transform for that split.
impl ImageFolderDataset {
    pub fn train() -> anyhow::Result<Self> {
        Self::split("train", train_transform())
    }

    pub fn test() -> anyhow::Result<Self> {
        Self::split("test", eval_transform())
    }

    pub fn quick_test() -> anyhow::Result<Self> {
        Self::split("quick_test", eval_transform())
    }

    fn split<T: ImageTransform + 'static>(split: &str, transform: T) -> anyhow::Result<Self> {
        let base = get_env("DATA_DIR")?;
        Ok(Self::with_transform(Path::new(&base).join(split), transform)?)
    }
}

impl Dataset<ImageItem> for ImageFolderDataset {
    fn get(&self, index: usize) -> Option<ImageItem> {
        if index >= self.paths.len() {
            return None;
        }
        // Decode and label failures abort the epoch.
        Some(self.try_get(index).unwrap())
    }

    fn len(&self) -> usize {
        self.paths.len()
    }
}
