//! Per-pixel feature extraction.
//!
//! Three single-channel maps are derived from the source: edge energy,
//! skin likelihood and saturation. They are kept planar in an
//! [`AnalysisImage`] so the scorer can read each channel as a flat slice.

use crate::config::CropOptions;
use crate::imaging::calculations::score_map_dimensions;
use crate::imaging::filters;
use image::{Rgb, RgbImage};

/// Planar three-channel feature image: skin, edge, saturation.
///
/// All planes have `width * height` entries in row-major order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisImage {
    width: u32,
    height: u32,
    skin: Vec<u8>,
    edge: Vec<u8>,
    saturation: Vec<u8>,
}

impl AnalysisImage {
    /// Assemble from three planes. Returns `None` if a plane has the wrong length.
    pub fn from_planes(
        width: u32,
        height: u32,
        skin: Vec<u8>,
        edge: Vec<u8>,
        saturation: Vec<u8>,
    ) -> Option<Self> {
        let len = width as usize * height as usize;
        (skin.len() == len && edge.len() == len && saturation.len() == len).then_some(Self {
            width,
            height,
            skin,
            edge,
            saturation,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn skin(&self) -> &[u8] {
        &self.skin
    }

    pub fn edge(&self) -> &[u8] {
        &self.edge
    }

    pub fn saturation(&self) -> &[u8] {
        &self.saturation
    }

    /// Channel values `[skin, edge, saturation]` at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let i = y as usize * self.width as usize + x as usize;
        [self.skin[i], self.edge[i], self.saturation[i]]
    }

    /// Interleave into an RGB image with R = skin, G = edge, B = saturation.
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut raw = Vec::with_capacity(self.skin.len() * 3);
        for i in 0..self.skin.len() {
            raw.extend_from_slice(&[self.skin[i], self.edge[i], self.saturation[i]]);
        }
        RgbImage::from_raw(self.width, self.height, raw)
            .unwrap_or_else(|| RgbImage::new(self.width, self.height))
    }

    /// Split an RGB image packed as by [`to_rgb_image`](Self::to_rgb_image).
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let len = width as usize * height as usize;
        let mut skin = Vec::with_capacity(len);
        let mut edge = Vec::with_capacity(len);
        let mut saturation = Vec::with_capacity(len);
        for Rgb([s, e, sat]) in image.pixels() {
            skin.push(*s);
            edge.push(*e);
            saturation.push(*sat);
        }
        Self {
            width,
            height,
            skin,
            edge,
            saturation,
        }
    }

    /// Resample to `ceil(w / factor) x ceil(h / factor)` for scoring.
    ///
    /// A factor of 1 returns an identical copy.
    pub fn downsample(&self, factor: u32) -> Self {
        if factor <= 1 {
            return self.clone();
        }
        let (w, h) = score_map_dimensions((self.width, self.height), factor);
        Self::from_rgb_image(&filters::resample(&self.to_rgb_image(), w, h))
    }
}

/// Derive the skin, edge and saturation maps of `image`.
pub fn analyze(image: &RgbImage, options: &CropOptions) -> AnalysisImage {
    let (width, height) = image.dimensions();
    let cie = filters::luma(image);
    let edge = filters::laplacian(&cie).into_raw();

    let (skin, saturation): (Vec<u8>, Vec<u8>) = image
        .pixels()
        .zip(cie.pixels())
        .map(|(px, l)| {
            let luma = l.0[0] as f64;
            (
                skin_value(px.0, luma, options),
                saturation_value(px.0, luma, options),
            )
        })
        .unzip();

    AnalysisImage {
        width,
        height,
        skin,
        edge,
        saturation,
    }
}

/// `1 - distance(normalize(rgb), skin_color)`.
///
/// A near-black pixel has no direction; it is treated as the zero vector so
/// the difference is exactly `-skin_color`.
pub fn skin_likelihood(rgb: [u8; 3], skin_color: &[f64; 3]) -> f64 {
    let [r, g, b] = rgb.map(f64::from);
    let mag = (r * r + g * g + b * b).sqrt();
    let (rd, gd, bd) = if mag.abs() < 1e-6 {
        (-skin_color[0], -skin_color[1], -skin_color[2])
    } else {
        (
            r / mag - skin_color[0],
            g / mag - skin_color[1],
            b / mag - skin_color[2],
        )
    };
    1.0 - (rd * rd + gd * gd + bd * bd).sqrt()
}

/// HSL-style saturation in `[0, 1]` from the channel extremes.
pub fn saturation(rgb: [u8; 3]) -> f64 {
    let [r, g, b] = rgb.map(f64::from);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let (mut s, d) = if max == min {
        (1.0, 0.0)
    } else {
        ((max + min) / 255.0, (max - min) / 255.0)
    };
    if s > 1.0 {
        s = 2.0 - d;
    }
    d / s
}

fn skin_value(rgb: [u8; 3], luma: f64, options: &CropOptions) -> u8 {
    let likelihood = skin_likelihood(rgb, &options.skin_color);
    let in_range = luma >= options.skin_brightness_min * 255.0
        && luma <= options.skin_brightness_max * 255.0;
    if likelihood > options.skin_threshold && in_range {
        rescale(likelihood, options.skin_threshold)
    } else {
        0
    }
}

fn saturation_value(rgb: [u8; 3], luma: f64, options: &CropOptions) -> u8 {
    let sat = saturation(rgb);
    let in_range = luma >= options.saturation_brightness_min * 255.0
        && luma <= options.saturation_brightness_max * 255.0;
    if sat > options.saturation_threshold && in_range {
        rescale(sat, options.saturation_threshold)
    } else {
        0
    }
}

/// Stretch `(threshold, 1]` onto `(0, 255]`, truncating.
fn rescale(value: f64, threshold: f64) -> u8 {
    ((value - threshold) * (255.0 / (1.0 - threshold))) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{SKIN_TONE, solid_image};

    fn norm(c: &[f64; 3]) -> f64 {
        (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt()
    }

    // =========================================================================
    // Skin
    // =========================================================================

    #[test]
    fn skin_likelihood_peaks_on_reference_tone() {
        let opts = CropOptions::default();
        // The reference vector is not unit length, so the best reachable value
        // is 1 - (|skin_color| - 1).
        let best = 2.0 - norm(&opts.skin_color);
        assert!((skin_likelihood(SKIN_TONE, &opts.skin_color) - best).abs() < 0.01);
    }

    #[test]
    fn skin_likelihood_black_is_minus_skin_color() {
        let opts = CropOptions::default();
        let expected = 1.0 - norm(&opts.skin_color);
        assert_eq!(skin_likelihood([0, 0, 0], &opts.skin_color), expected);
    }

    #[test]
    fn neutral_gray_is_not_skin() {
        let opts = CropOptions::default();
        let gray = skin_likelihood([128, 128, 128], &opts.skin_color);
        assert!(gray < opts.skin_threshold);
    }

    #[test]
    fn skin_map_respects_brightness_window() {
        let opts = CropOptions::default();
        // Same hue, too dark for the 0.2 brightness floor.
        let dark = [SKIN_TONE[0] / 8, SKIN_TONE[1] / 8, SKIN_TONE[2] / 8];
        let maps = analyze(&solid_image(4, 4, dark), &opts);
        assert!(maps.skin().iter().all(|&v| v == 0));

        let maps = analyze(&solid_image(4, 4, SKIN_TONE), &opts);
        assert!(maps.skin().iter().all(|&v| v > 150));
    }

    // =========================================================================
    // Saturation
    // =========================================================================

    #[test]
    fn saturation_gray_is_zero() {
        assert_eq!(saturation([77, 77, 77]), 0.0);
        assert_eq!(saturation([0, 0, 0]), 0.0);
    }

    #[test]
    fn saturation_pure_red_is_one() {
        assert_eq!(saturation([255, 0, 0]), 1.0);
    }

    #[test]
    fn saturation_bright_pastel_folds() {
        // (max + min) / 255 > 1 → s = 2 - d
        let d = 50.0 / 255.0;
        let expected = d / (2.0 - d);
        assert!((saturation([250, 200, 200]) - expected).abs() < 1e-12);
    }

    #[test]
    fn saturation_map_keeps_vivid_pixels() {
        let opts = CropOptions::default();
        let maps = analyze(&solid_image(3, 3, [255, 0, 0]), &opts);
        assert!(maps.saturation().iter().all(|&v| v >= 254));

        let maps = analyze(&solid_image(3, 3, [140, 140, 140]), &opts);
        assert!(maps.saturation().iter().all(|&v| v == 0));
    }

    // =========================================================================
    // AnalysisImage
    // =========================================================================

    #[test]
    fn flat_image_has_no_features() {
        let maps = analyze(&solid_image(20, 10, [128, 128, 128]), &CropOptions::default());
        assert_eq!((maps.width(), maps.height()), (20, 10));
        assert!(maps.skin().iter().all(|&v| v == 0));
        assert!(maps.edge().iter().all(|&v| v == 0));
        assert!(maps.saturation().iter().all(|&v| v == 0));
    }

    #[test]
    fn rgb_packing_is_skin_edge_saturation() {
        let maps = AnalysisImage::from_planes(1, 1, vec![10], vec![20], vec![30]).unwrap();
        assert_eq!(maps.pixel(0, 0), [10, 20, 30]);
        assert_eq!(maps.to_rgb_image().get_pixel(0, 0).0, [10, 20, 30]);
        assert_eq!(AnalysisImage::from_rgb_image(&maps.to_rgb_image()), maps);
    }

    #[test]
    fn from_planes_rejects_short_plane() {
        assert!(AnalysisImage::from_planes(2, 2, vec![0; 4], vec![0; 3], vec![0; 4]).is_none());
    }

    #[test]
    fn downsample_shrinks_with_ceiling() {
        let maps = analyze(&solid_image(17, 9, [128, 128, 128]), &CropOptions::default());
        assert_eq!(maps.downsample(1), maps);
        let small = maps.downsample(4);
        assert_eq!((small.width(), small.height()), (5, 3));
    }
}
