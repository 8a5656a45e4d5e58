use std::path::PathBuf;

use thiserror::Error;

use crate::host::PixelFormat;

/// Library error type for viewer sessions.
#[derive(Debug, Error)]
pub enum Error {
    /// The base directory is missing or is not a directory.
    #[error("invalid image directory: {0}")]
    BadDir(PathBuf),

    /// The extension set is empty, so no file could ever be cataloged.
    #[error("no image extensions configured")]
    NoExtensions,

    /// No file in the base directory matched a recognized extension.
    #[error("no images with a recognized extension in {0}")]
    CatalogEmpty(PathBuf),

    /// The host refused the pixel format frames are delivered in.
    #[error("{0} is not supported by the host")]
    PixelFormatUnsupported(PixelFormat),

    /// The image at `path` could not be decoded.
    #[error("failed to decode {}", path.display())]
    DecodeFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A pixel buffer whose length does not match its dimensions.
    #[error("pixel buffer of {len} bytes does not hold {width}x{height} pixels")]
    InvalidBuffer { width: u32, height: u32, len: usize },

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
