use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SliceError {
    #[error("Input image not found or unreadable: {}", path.display())]
    InputNotFound {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unsupported image: {0}")]
    UnsupportedImageShape(String),

    #[error("Cannot create output directory {}", path.display())]
    OutputDirError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid region: rows {start}..={end} in an image of height {height}")]
    InvalidRegion { start: u32, end: u32, height: u32 },
}

impl SliceError {
    /// Sort an `image::open` failure into missing input vs. undecodable data
    pub fn from_open(path: impl Into<PathBuf>, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(_) => SliceError::InputNotFound {
                path: path.into(),
                source: err,
            },
            other => SliceError::UnsupportedImageShape(format!(
                "{}: {}",
                path.into().display(),
                other
            )),
        }
    }
}
