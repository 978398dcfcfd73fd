//! Positional importance of a pixel relative to a candidate crop.
//!
//! The weight combines a centre bias, a penalty band along the crop border
//! and an optional rule-of-thirds bonus. Pixels outside the crop get the
//! constant `outside_importance`.

use crate::config::CropOptions;
use crate::types::CropRect;

/// Importance of the working-space pixel `(x, y)` for `crop`.
pub fn importance(crop: &CropRect, x: f64, y: f64, options: &CropOptions) -> f64 {
    if !crop.contains(x, y) {
        return options.outside_importance;
    }

    let u = (x - crop.x) / crop.width;
    let v = (y - crop.y) / crop.height;
    let pu = (0.5 - u).abs() * 2.0;
    let pv = (0.5 - v).abs() * 2.0;

    // distance into the border band
    let dx = (pu - 1.0 + options.edge_radius).max(0.0);
    let dy = (pv - 1.0 + options.edge_radius).max(0.0);
    let edge = (dx * dx + dy * dy) * options.edge_weight;

    let mut s = 1.41 - (pu * pu + pv * pv).sqrt();
    if options.rule_of_thirds {
        s += (s + edge + 0.5).max(0.0) * 1.2 * (thirds(pu) + thirds(pv));
    }

    s + edge
}

/// Bump of width 1/8 peaking at 1 where `t = 1/3` (period 2).
///
/// `t` is the normalized distance from the crop centre, so the peak sits on
/// the third lines of the frame.
pub fn thirds(t: f64) -> f64 {
    let x = (((t + 2.0 / 3.0).rem_euclid(2.0)) * 0.5 - 0.5) * 16.0;
    (1.0 - x * x).max(0.0)
}
