//! Pixel primitives the analysis relies on.
//!
//! Luma conversion, 3x3 convolution and resampling come from the `image`
//! crate; this module pins down the exact variant (weights, kernel, filter,
//! border policy) each caller gets.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbImage, RgbaImage};

/// Laplacian-like kernel for edge energy, applied with no scale or offset.
pub const LAPLACIAN: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0];

/// Perceptual luma with Rec. 709 weights (0.2126, 0.7152, 0.0722), no bias.
pub fn luma(image: &RgbImage) -> GrayImage {
    imageops::grayscale(image)
}

/// Edge energy: [`LAPLACIAN`] convolved over `luma`, clipped to `0..=255`.
///
/// The one-pixel frame has no full neighbourhood and is set to 0.
pub fn laplacian(luma: &GrayImage) -> GrayImage {
    let (width, height) = luma.dimensions();
    if width == 0 || height == 0 {
        return GrayImage::new(width, height);
    }
    let mut edges: GrayImage = imageops::filter3x3(luma, &LAPLACIAN);
    for (x, y, px) in edges.enumerate_pixels_mut() {
        if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
            px.0[0] = 0;
        }
    }
    edges
}

/// High-quality resample to exactly `width x height` (Lanczos3).
pub fn resample(image: &RgbImage, width: u32, height: u32) -> RgbImage {
    imageops::resize(image, width.max(1), height.max(1), FilterType::Lanczos3)
}

/// Composite an RGBA image over an opaque black canvas.
pub fn flatten_alpha(image: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b, a] = image.get_pixel(x, y).0;
        let alpha = a as u32;
        let over = |c: u8| ((c as u32 * alpha + 127) / 255) as u8;
        image::Rgb([over(r), over(g), over(b)])
    })
}
