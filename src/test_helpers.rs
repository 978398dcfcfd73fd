//! Shared test utilities for building synthetic images.
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let mut img = solid_image(200, 100, [90, 90, 90]);
//! paint_rect(&mut img, 150, 30, 30, 30, SKIN_TONE);
//! ```

use image::{Rgb, RgbImage};

/// An RGB triple close to the default skin color direction.
pub const SKIN_TONE: [u8; 3] = [187, 137, 106];

/// Image filled with a single color.
pub fn solid_image(width: u32, height: u32, rgb: [u8; 3]) -> RgbImage {
    RgbImage::from_pixel(width, height, Rgb(rgb))
}

/// Fill a rectangle, clipped to the image bounds.
pub fn paint_rect(img: &mut RgbImage, x: u32, y: u32, width: u32, height: u32, rgb: [u8; 3]) {
    let x_end = (x + width).min(img.width());
    let y_end = (y + height).min(img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, Rgb(rgb));
        }
    }
}
