//! Sliding-window candidate enumeration.
//!
//! Candidates are produced scale-major, then row by row, then column by
//! column. The order is part of the contract: ties in scoring go to the
//! earliest candidate.

use super::search::CropError;
use crate::types::CropRect;

/// Bounds of one sliding-window enumeration, in working-image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchWindow {
    pub image_width: u32,
    pub image_height: u32,
    /// Window size at scale 1.0.
    pub crop_width: u32,
    pub crop_height: u32,
    pub max_scale: f64,
    pub min_scale: f64,
    pub scale_step: f64,
    /// Position step in pixels.
    pub step: u32,
}

impl SearchWindow {
    /// Scale factors to try, largest first, on a 1% grid.
    ///
    /// Integer percentages avoid accumulating float error; both ends are
    /// inclusive and no scale below `min_scale` is produced, except when
    /// `min_scale` and `max_scale` fall inside the same percent. Then the
    /// bracket is the single scale `floor(max_scale * 100) / 100`.
    pub fn scales(&self) -> Vec<f64> {
        let max_pct = (self.max_scale * 100.0 + 1e-9).floor() as i64;
        let min_pct = ((self.min_scale * 100.0 - 1e-9).ceil() as i64).min(max_pct);
        let step_pct = ((self.scale_step * 100.0).round() as i64).max(1);

        let mut scales = Vec::new();
        let mut pct = max_pct;
        while pct >= min_pct {
            scales.push(pct as f64 / 100.0);
            pct -= step_pct;
        }
        scales
    }
}

/// Enumerate every window that fits inside the image.
///
/// Fails with [`CropError::Configuration`] when no window fits at any scale.
pub fn generate(window: &SearchWindow) -> Result<Vec<CropRect>, CropError> {
    let image_w = window.image_width as f64;
    let image_h = window.image_height as f64;
    let step = window.step.max(1) as usize;
    let mut crops = Vec::new();

    for scale in window.scales() {
        let width = window.crop_width as f64 * scale;
        let height = window.crop_height as f64 * scale;
        for y in (0..window.image_height).step_by(step) {
            if y as f64 + height > image_h {
                break;
            }
            for x in (0..window.image_width).step_by(step) {
                if x as f64 + width > image_w {
                    break;
                }
                crops.push(CropRect::new(x as f64, y as f64, width, height));
            }
        }
    }

    if crops.is_empty() {
        return Err(CropError::Configuration {
            image_width: window.image_width,
            image_height: window.image_height,
            crop_width: window.crop_width,
            crop_height: window.crop_height,
            min_scale: window.min_scale,
        });
    }
    Ok(crops)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(image: (u32, u32), crop: (u32, u32)) -> SearchWindow {
        SearchWindow {
            image_width: image.0,
            image_height: image.1,
            crop_width: crop.0,
            crop_height: crop.1,
            max_scale: 1.0,
            min_scale: 0.9,
            scale_step: 0.1,
            step: 8,
        }
    }

    // =========================================================================
    // Scale bracket
    // =========================================================================

    #[test]
    fn default_bracket_is_one_and_point_nine() {
        assert_eq!(window((10, 10), (5, 5)).scales(), vec![1.0, 0.9]);
    }

    #[test]
    fn bracket_excludes_scales_below_min() {
        let w = SearchWindow {
            min_scale: 0.8333,
            ..window((10, 10), (5, 5))
        };
        assert_eq!(w.scales(), vec![1.0, 0.9]);
    }

    #[test]
    fn bracket_with_fine_step() {
        let w = SearchWindow {
            min_scale: 0.95,
            scale_step: 0.01,
            ..window((10, 10), (5, 5))
        };
        assert_eq!(w.scales(), vec![1.0, 0.99, 0.98, 0.97, 0.96, 0.95]);
    }

    #[test]
    fn collapsed_bracket_has_one_scale() {
        let w = SearchWindow {
            min_scale: 1.0,
            ..window((10, 10), (5, 5))
        };
        assert_eq!(w.scales(), vec![1.0]);
    }

    #[test]
    fn sub_percent_bracket_keeps_floored_max() {
        let w = SearchWindow {
            max_scale: 0.955,
            min_scale: 0.955,
            ..window((104, 104), (104, 104))
        };
        assert_eq!(w.scales(), vec![0.95]);
        assert_eq!(generate(&w).unwrap().len(), 1);
    }

    // =========================================================================
    // Enumeration
    // =========================================================================

    #[test]
    fn enumeration_order_is_scale_row_column() {
        let crops = generate(&window((40, 24), (24, 16))).unwrap();
        let first: Vec<(f64, f64, f64)> = crops.iter().take(4).map(|c| (c.x, c.y, c.width)).collect();
        assert_eq!(
            first,
            vec![(0.0, 0.0, 24.0), (8.0, 0.0, 24.0), (16.0, 0.0, 24.0), (0.0, 8.0, 24.0)]
        );
        // Scale 1.0 comes entirely before 0.9
        let switch = crops.iter().position(|c| c.width < 24.0).unwrap();
        assert!(crops[..switch].iter().all(|c| c.width == 24.0));
        assert!(crops[switch..].iter().all(|c| (c.width - 21.6).abs() < 1e-9));
    }

    #[test]
    fn every_candidate_stays_inside_image() {
        let w = SearchWindow {
            min_scale: 0.5,
            step: 3,
            ..window((97, 61), (80, 50))
        };
        let crops = generate(&w).unwrap();
        assert!(!crops.is_empty());
        for c in &crops {
            assert!(c.x >= 0.0 && c.y >= 0.0);
            assert!(c.x + c.width <= 97.0, "{c:?}");
            assert!(c.y + c.height <= 61.0, "{c:?}");
        }
    }

    #[test]
    fn exact_fit_yields_single_position_per_scale() {
        let crops = generate(&SearchWindow {
            min_scale: 1.0,
            ..window((50, 50), (50, 50))
        })
        .unwrap();
        assert_eq!(crops, vec![CropRect::new(0.0, 0.0, 50.0, 50.0)]);
    }

    #[test]
    fn oversized_window_is_configuration_error() {
        let result = generate(&SearchWindow {
            max_scale: 1.5,
            min_scale: 1.2,
            ..window((50, 50), (50, 50))
        });
        assert!(matches!(
            result,
            Err(CropError::Configuration {
                crop_width: 50,
                crop_height: 50,
                ..
            })
        ));
    }
}
