use std::path::PathBuf;

use thiserror::Error;

/// Every failure the binding can report.
///
/// Native calls that return a falsy status map to one variant each; none
/// are retried.
#[derive(Error, Debug)]
pub enum Bd17Error {
    #[error("architecture {arch} is not supported by the brodmann17 library (supported: {supported})")]
    UnsupportedArchitecture { arch: String, supported: String },
    #[error("could not determine install directory: {0}")]
    InstallDirUnresolved(#[source] std::io::Error),
    #[error("failed to load native library {path}: {source}")]
    LibraryLoadError {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },
    #[error("failed to init library")]
    InitializationError,
    #[error("native library returned a null detector")]
    CreationError,
    #[error("{0}")]
    InvalidArgument(String),
    #[error("image must be of type uint8, got {0}")]
    InvalidImageType(String),
    #[error("unsupported image shape {0:?}, expected (height, width) or (height, width, channels)")]
    InvalidImageShape(Vec<usize>),
    #[error("image with {0} channels is currently not supported")]
    UnsupportedChannelCount(usize),
    #[error("rotation failed")]
    RotationError,
    #[error("detection failed")]
    DetectionError,
    #[error("failed to de-allocate detector")]
    DeallocationError,
    #[error("detector has already been released")]
    DetectorReleased,
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Bd17Error>;
