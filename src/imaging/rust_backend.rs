//! Image backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::image_dimensions` |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image::ImageReader` with format sniffing |
//! | Alpha → RGB | [`filters::flatten_alpha`] (composite over black) |
//! | Crop | `image::imageops::crop_imm` |
//! | Resize | [`filters::resample`] (Lanczos3) |
//! | Encode JPEG | `image::codecs::jpeg::JpegEncoder` with [`Quality`] |
//! | Encode PNG / TIFF / WebP / GIF | `image::RgbImage::save_with_format` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::filters;
use super::params::{CropParams, Quality};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use log::debug;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert any decoded colour type to plain RGB8.
pub fn to_plain_rgb(img: DynamicImage) -> RgbImage {
    if img.color().has_alpha() {
        filters::flatten_alpha(&img.to_rgba8())
    } else {
        img.into_rgb8()
    }
}

/// Save an RGB image, inferring the format from the extension.
fn save_image(img: &RgbImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let format = ImageFormat::from_path(path).map_err(|e| {
        BackendError::ProcessingFailed(format!(
            "Unsupported output format for {}: {e}",
            path.display()
        ))
    })?;

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let writer = std::io::BufWriter::new(file);
            let encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
            img.write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {e}")))
        }
        ImageFormat::Png | ImageFormat::Tiff | ImageFormat::WebP | ImageFormat::Gif => img
            .save_with_format(path, format)
            .map_err(|e| BackendError::ProcessingFailed(format!("Encode failed: {e}"))),
        other => Err(BackendError::ProcessingFailed(format!(
            "Unsupported output format: {other:?}"
        ))),
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::Decode(format!("Failed to read dimensions of {}: {e}", path.display()))
        })?;
        Ok(Dimensions { width, height })
    }

    fn load_rgb(&self, path: &Path) -> Result<RgbImage, BackendError> {
        let img = ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| BackendError::Decode(format!("Failed to decode {}: {e}", path.display())))?;
        debug!("decoded {} as {:?}", path.display(), img.color());
        Ok(to_plain_rgb(img))
    }

    fn write_crop(&self, params: &CropParams) -> Result<(), BackendError> {
        let img = self.load_rgb(&params.source)?;
        let region = params.region;
        if region.width == 0
            || region.height == 0
            || region.x + region.width > img.width()
            || region.y + region.height > img.height()
        {
            return Err(BackendError::ProcessingFailed(format!(
                "Crop region {}x{}+{}+{} outside {}x{} source",
                region.width,
                region.height,
                region.x,
                region.y,
                img.width(),
                img.height()
            )));
        }

        let cropped =
            image::imageops::crop_imm(&img, region.x, region.y, region.width, region.height)
                .to_image();
        let resized = filters::resample(&cropped, params.width, params.height);
        save_image(&resized, &params.output, params.quality)
    }

    fn write_image(&self, image: &RgbImage, path: &Path) -> Result<(), BackendError> {
        save_image(image, path, Quality::default())
    }
}
