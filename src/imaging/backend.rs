//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers everything the crate needs from the
//! outside world: identify, load as plain RGB, write a crop, write a debug
//! image. The search itself never touches files.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::CropParams;
use image::RgbImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image I/O backends.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode to 8-bit RGB. Alpha is composited over opaque black.
    fn load_rgb(&self, path: &Path) -> Result<RgbImage, BackendError>;

    /// Cut `params.region` out of the source, resize it to the final size and save.
    fn write_crop(&self, params: &CropParams) -> Result<(), BackendError>;

    /// Save an already-built RGB image.
    fn write_image(&self, image: &RgbImage, path: &Path) -> Result<(), BackendError>;
}
