//! Crop search orchestration.
//!
//! ```text
//! source ─▶ prescale? ─▶ features ─▶ score map ─┐
//!                                               ├─▶ score each ─▶ top crop
//!            geometry ─▶ candidates ────────────┘
//! ```
//!
//! All geometry handed back to the caller is in source-image pixels; the
//! working-space rectangles are mapped back exactly once, at the end.

use super::candidates::{SearchWindow, generate};
use super::features::analyze;
use super::score::{score_all, select_top};
use crate::config::{ConfigError, CropOptions};
use crate::imaging::calculations::search_geometry;
use crate::imaging::filters;
use crate::types::AnalysisResult;
use image::RgbImage;
use log::debug;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("Invalid input: {0}")]
    Input(String),
    #[error(
        "No {crop_width}x{crop_height} crop fits a {image_width}x{image_height} image \
         at scales down to {min_scale}"
    )]
    Configuration {
        image_width: u32,
        image_height: u32,
        crop_width: u32,
        crop_height: u32,
        min_scale: f64,
    },
    #[error(transparent)]
    Options(#[from] ConfigError),
}

/// Find the best crop of `image` for a `target_width x target_height` output.
///
/// Returns every candidate with its score and the winner, all in source
/// pixels. The search is deterministic: identical inputs give identical
/// results whether or not scoring runs in parallel.
pub fn crop(
    image: &RgbImage,
    target_width: u32,
    target_height: u32,
    options: &CropOptions,
) -> Result<AnalysisResult, CropError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(CropError::Input(format!(
            "image has no pixels ({width}x{height})"
        )));
    }
    if target_width == 0 || target_height == 0 {
        return Err(CropError::Input(format!(
            "target dimensions must be positive, got {target_width}x{target_height}"
        )));
    }
    options.validate()?;

    let geometry = search_geometry((width, height), (target_width, target_height), options);
    debug!(
        "search {width}x{height} → {target_width}x{target_height}: scale {:.4}, crop {}x{}, scales {}..={}",
        geometry.scale, geometry.crop_width, geometry.crop_height, geometry.min_scale, options.max_scale
    );
    if geometry.crop_width == 0 || geometry.crop_height == 0 {
        return Err(CropError::Configuration {
            image_width: geometry.working_width,
            image_height: geometry.working_height,
            crop_width: geometry.crop_width,
            crop_height: geometry.crop_height,
            min_scale: geometry.min_scale,
        });
    }

    let prescaled;
    let working = if geometry.is_prescaled() {
        debug!(
            "prescaling by {:.4} to {}x{}",
            geometry.prescale, geometry.working_width, geometry.working_height
        );
        prescaled = filters::resample(image, geometry.working_width, geometry.working_height);
        &prescaled
    } else {
        image
    };

    let analysis_image = analyze(working, options);
    let score_map = analysis_image.downsample(options.score_down_sample);

    let candidates = generate(&SearchWindow {
        image_width: working.width(),
        image_height: working.height(),
        crop_width: geometry.crop_width,
        crop_height: geometry.crop_height,
        max_scale: options.max_scale,
        min_scale: geometry.min_scale,
        scale_step: options.scale_step,
        step: options.step,
    })?;
    debug!("scoring {} candidates", candidates.len());

    let mut crops = score_all(&score_map, options.score_down_sample, &candidates, options);
    let top = select_top(&crops).ok_or(CropError::Configuration {
        image_width: working.width(),
        image_height: working.height(),
        crop_width: geometry.crop_width,
        crop_height: geometry.crop_height,
        min_scale: geometry.min_scale,
    })?;

    for crop in &mut crops {
        crop.rect = crop.rect.unscale(geometry.prescale);
    }
    let top_crop = crops[top];
    debug!(
        "top crop #{top}: {}x{}+{}+{} (score {:.6})",
        top_crop.rect.width, top_crop.rect.height, top_crop.rect.x, top_crop.rect.y, top_crop.score.total
    );

    Ok(AnalysisResult {
        analysis_image,
        crops,
        top_crop,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{SKIN_TONE, paint_rect, solid_image};

    #[test]
    fn empty_image_is_input_error() {
        let result = crop(&RgbImage::new(0, 0), 10, 10, &CropOptions::default());
        assert!(matches!(result, Err(CropError::Input(_))));
    }

    #[test]
    fn zero_target_is_input_error() {
        let img = solid_image(10, 10, [1, 2, 3]);
        assert!(matches!(
            crop(&img, 0, 10, &CropOptions::default()),
            Err(CropError::Input(_))
        ));
    }

    #[test]
    fn invalid_options_rejected() {
        let img = solid_image(10, 10, [1, 2, 3]);
        let opts = CropOptions {
            step: 0,
            ..CropOptions::default()
        };
        assert!(matches!(crop(&img, 5, 5, &opts), Err(CropError::Options(_))));
    }

    #[test]
    fn scale_bracket_above_source_is_configuration_error() {
        let img = solid_image(60, 40, [90, 90, 90]);
        let opts = CropOptions {
            max_scale: 1.5,
            min_scale: 1.2,
            ..CropOptions::default()
        };
        assert!(matches!(
            crop(&img, 60, 40, &opts),
            Err(CropError::Configuration { .. })
        ));
    }

    #[test]
    fn extreme_aspect_with_zero_width_window_is_configuration_error() {
        // scale = min(1000 / 1, 10 / 100) = 0.1, so the window is 0 pixels wide
        let img = solid_image(1000, 10, [120, 60, 30]);
        let result = crop(&img, 1, 100, &CropOptions::default());
        assert!(
            matches!(
                result,
                Err(CropError::Configuration {
                    crop_width: 0,
                    crop_height: 10,
                    ..
                })
            ),
            "{result:?}"
        );
    }

    #[test]
    fn prescaled_window_collapsing_to_zero_is_configuration_error() {
        // prescale 1 / (100 * 2) turns the 100x100 window into 0x0
        let img = solid_image(100, 100, [120, 60, 30]);
        let opts = CropOptions {
            max_scale: 2.0,
            min_scale: 2.0,
            ..CropOptions::default()
        };
        let result = crop(&img, 1, 1, &opts);
        assert!(
            matches!(
                result,
                Err(CropError::Configuration {
                    crop_width: 0,
                    crop_height: 0,
                    ..
                })
            ),
            "{result:?}"
        );
    }

    #[test]
    fn sub_percent_scale_bracket_still_searches() {
        let img = solid_image(104, 104, [90, 90, 90]);
        let opts = CropOptions {
            max_scale: 0.955,
            min_scale: 0.96,
            ..CropOptions::default()
        };
        let result = crop(&img, 104, 104, &opts).unwrap();
        // 104 * 0.95 = 98.8, floored on the way out
        assert_eq!(result.crops.len(), 1);
        assert_eq!(result.top_crop.rect.width, 98.0);
    }

    #[test]
    fn flat_gray_picks_first_full_scale_candidate() {
        let img = solid_image(100, 100, [128, 128, 128]);
        let result = crop(&img, 50, 50, &CropOptions::default()).unwrap();

        assert_eq!(result.top_crop, result.crops[0]);
        assert_eq!(result.top_crop.score.total, 0.0);
        assert_eq!((result.top_crop.rect.x, result.top_crop.rect.y), (0.0, 0.0));
        let widest = result
            .crops
            .iter()
            .map(|c| c.rect.width)
            .fold(0.0, f64::max);
        assert_eq!(result.top_crop.rect.width, widest);
    }

    #[test]
    fn results_are_whole_source_pixels_inside_the_image() {
        let mut img = solid_image(320, 200, [70, 80, 90]);
        paint_rect(&mut img, 250, 30, 40, 40, SKIN_TONE);
        let result = crop(&img, 100, 100, &CropOptions::default()).unwrap();
        for c in &result.crops {
            let r = c.rect;
            assert_eq!(r.x, r.x.floor());
            assert_eq!(r.width, r.width.floor());
            assert!(r.x >= 0.0 && r.y >= 0.0);
            assert!(r.x + r.width <= 320.0 && r.y + r.height <= 200.0, "{r:?}");
        }
    }

    #[test]
    fn analysis_image_is_in_working_space() {
        let img = solid_image(100, 100, [128, 128, 128]);
        let result = crop(&img, 50, 50, &CropOptions::default()).unwrap();
        // prescale 1 / (2 * 0.9)
        assert_eq!(
            (result.analysis_image.width(), result.analysis_image.height()),
            (55, 55)
        );

        let opts = CropOptions {
            prescale: false,
            ..CropOptions::default()
        };
        let result = crop(&img, 50, 50, &opts).unwrap();
        assert_eq!(result.analysis_image.width(), 100);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let mut img = solid_image(120, 90, [60, 100, 140]);
        paint_rect(&mut img, 10, 20, 25, 25, SKIN_TONE);
        paint_rect(&mut img, 80, 50, 10, 30, [250, 220, 20]);
        let opts = CropOptions::default();
        let a = crop(&img, 4, 3, &opts).unwrap();
        let b = crop(&img, 4, 3, &opts).unwrap();
        assert_eq!(a.crops, b.crops);
        assert_eq!(a.top_crop, b.top_crop);
    }

    #[test]
    fn score_down_sample_still_finds_a_crop() {
        let mut img = solid_image(160, 100, [90, 90, 90]);
        paint_rect(&mut img, 10, 30, 30, 30, SKIN_TONE);
        let opts = CropOptions {
            score_down_sample: 4,
            ..CropOptions::default()
        };
        let result = crop(&img, 100, 100, &opts).unwrap();
        let top = result.top_crop.rect;
        assert!(top.x <= 10.0 && top.x + top.width >= 40.0, "{top:?}");
    }
}
