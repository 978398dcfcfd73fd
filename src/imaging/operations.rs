//! High-level image operations.
//!
//! These functions combine the backend with the crop search: load a file,
//! search it, then write the crop or the analysis maps.

use super::backend::{BackendError, ImageBackend};
use super::params::{CropParams, Quality, Region};
use crate::analysis::{CropError, crop};
use crate::config::CropOptions;
use crate::types::AnalysisResult;
use log::info;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Crop search failed: {0}")]
    Crop(#[from] CropError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Load `source` and search it for the best crop at the `target` aspect.
pub fn analyze_file(
    backend: &impl ImageBackend,
    source: &Path,
    target: (u32, u32),
    options: &CropOptions,
) -> Result<AnalysisResult> {
    let image = backend.load_rgb(source)?;
    info!(
        "analyzing {} ({}x{}) for {}x{}",
        source.display(),
        image.width(),
        image.height(),
        target.0,
        target.1
    );
    let result = crop(&image, target.0, target.1, options)?;
    info!("{} candidates scored", result.crops.len());
    Ok(result)
}

/// Plan writing the top crop of `result` without executing it.
pub fn plan_crop(
    source: &Path,
    output: &Path,
    result: &AnalysisResult,
    target: (u32, u32),
    quality: Quality,
) -> CropParams {
    CropParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        region: Region::from(&result.top_crop.rect),
        width: target.0,
        height: target.1,
        quality,
    }
}

/// Write the top crop of `result`, resized to `target`.
pub fn apply_crop(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    result: &AnalysisResult,
    target: (u32, u32),
    quality: Quality,
) -> Result<()> {
    let params = plan_crop(source, output, result, target, quality);
    info!(
        "writing {}x{} crop of {} to {}",
        params.width,
        params.height,
        source.display(),
        output.display()
    );
    backend.write_crop(&params)?;
    Ok(())
}

/// Write the analysis maps as an RGB image (R = skin, G = edge, B = saturation).
pub fn write_analysis(
    backend: &impl ImageBackend,
    result: &AnalysisResult,
    output: &Path,
) -> Result<()> {
    backend.write_image(&result.analysis_image.to_rgb_image(), output)?;
    Ok(())
}
