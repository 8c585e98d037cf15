use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by directory scanning and sample loading.
///
/// None of these are recovered internally. They propagate to whichever
/// driver or dataloader requested the sample, which decides whether to
/// abort the run.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no class directories found under {}", .0.display())]
    NoClasses(PathBuf),

    #[error("failed to read directory {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}", .path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("parent directory `{class}` of {} is not a known class", .path.display())]
    UnknownClass { class: String, path: PathBuf },

    #[error("index {index} out of range for dataset of {len} samples")]
    OutOfRange { index: usize, len: usize },
}
