//! Pure calculation functions for search geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::config::CropOptions;

/// Geometry of one crop search, derived from image size, target and options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchGeometry {
    /// Largest factor by which the target fits inside the source.
    pub scale: f64,
    /// Effective lower bound of the scale bracket (never requires upscaling).
    pub min_scale: f64,
    /// Working-image shrink factor; `1.0` when no prescaling happens.
    pub prescale: f64,
    /// Working-image dimensions.
    pub working_width: u32,
    pub working_height: u32,
    /// Crop window at scale 1.0, in working-image pixels.
    pub crop_width: u32,
    pub crop_height: u32,
}

impl SearchGeometry {
    pub fn is_prescaled(&self) -> bool {
        self.prescale < 1.0
    }
}

/// Derive the search geometry for cropping `image` to the aspect of `target`.
///
/// # Arguments
/// * `image` - Source dimensions (width, height), both non-zero
/// * `target` - Requested output dimensions (width, height), both non-zero
/// * `options` - Scale bracket and prescale switch
///
/// # Examples
/// ```
/// # use smart_crop::config::CropOptions;
/// # use smart_crop::imaging::calculations::search_geometry;
/// // 100x100 source, 50x50 target: the full frame at scale 2, shrunk by 1/(2*0.9)
/// let geo = search_geometry((100, 100), (50, 50), &CropOptions::default());
/// assert_eq!(geo.scale, 2.0);
/// assert_eq!(geo.min_scale, 0.9);
/// assert_eq!((geo.working_width, geo.working_height), (55, 55));
/// assert_eq!((geo.crop_width, geo.crop_height), (55, 55));
/// ```
pub fn search_geometry(image: (u32, u32), target: (u32, u32), options: &CropOptions) -> SearchGeometry {
    let (img_w, img_h) = image;
    let (tgt_w, tgt_h) = target;

    let scale = f64::min(img_w as f64 / tgt_w as f64, img_h as f64 / tgt_h as f64);
    let mut crop_width = (tgt_w as f64 * scale).floor() as u32;
    let mut crop_height = (tgt_h as f64 * scale).floor() as u32;

    // Never pick crops that would need upscaling to reach the target.
    let min_scale = options.max_scale.min((1.0 / scale).max(options.min_scale));

    let mut geometry = SearchGeometry {
        scale,
        min_scale,
        prescale: 1.0,
        working_width: img_w,
        working_height: img_h,
        crop_width,
        crop_height,
    };

    if options.prescale {
        let factor = 1.0 / (scale * min_scale);
        if factor < 1.0 {
            crop_width = (crop_width as f64 * factor).floor() as u32;
            crop_height = (crop_height as f64 * factor).floor() as u32;
            geometry = SearchGeometry {
                prescale: factor,
                working_width: ((img_w as f64 * factor) as u32).max(1),
                working_height: ((img_h as f64 * factor) as u32).max(1),
                crop_width,
                crop_height,
                ..geometry
            };
        }
    }

    geometry
}

/// Dimensions of the score map for a given down-sampling stride.
///
/// `ceil(w / d) x ceil(h / d)`, so a partial trailing block still gets a sample.
pub fn score_map_dimensions(dims: (u32, u32), down_sample: u32) -> (u32, u32) {
    let d = down_sample.max(1);
    (dims.0.div_ceil(d), dims.1.div_ceil(d))
}

/// Rewrite a target as width 100 with the same aspect ratio.
///
/// Only the aspect ratio then influences the search; the min-scale clamp
/// against upscaling never engages for sources wider than 100 pixels.
pub fn normalized_target(width: u32, height: u32) -> (u32, u32) {
    let h = (height as f64 / width as f64 * 100.0).floor() as u32;
    (100, h.max(1))
}
