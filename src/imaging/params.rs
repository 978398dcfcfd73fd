//! Parameter types for image operations.
//!
//! These structs describe *what* to write, not *how*. They are the interface
//! between [`operations`](super::operations), which decides what to produce
//! from a search result, and the [`backend`](super::backend), which does the
//! pixel work. A mock backend can record them without touching files.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 90). Clamped on construction.
//! - [`Region`]: Whole-pixel rectangle in source coordinates.
//! - [`CropParams`]: Source, output path, region to cut, final size, quality.

use crate::types::CropRect;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Whole-pixel rectangle in source-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&CropRect> for Region {
    fn from(rect: &CropRect) -> Self {
        let (x, y, width, height) = rect.to_pixels();
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Parameters for writing a cropped, resized copy of a source image.
#[derive(Debug, Clone, PartialEq)]
pub struct CropParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Part of the source to keep.
    pub region: Region,
    /// Final output dimensions.
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
