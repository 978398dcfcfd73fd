//! Shared types passed between the analysis stages and the output layer.
//!
//! These types are serialized to JSON by the `analyze` command and must keep
//! their field names stable.

use crate::analysis::AnalysisImage;
use serde::{Deserialize, Serialize};

/// Axis-aligned crop rectangle.
///
/// During the search width and height may be fractional (a scaled window);
/// rectangles returned by [`crate::analysis::crop`] are whole pixels in
/// original-image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `(x, y)` lies inside the half-open rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x <= x && x < self.x + self.width && self.y <= y && y < self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Divide every component by `factor` and floor it.
    ///
    /// Maps a rectangle found in a shrunken working image back to the source.
    pub fn unscale(&self, factor: f64) -> Self {
        Self {
            x: (self.x / factor).floor(),
            y: (self.y / factor).floor(),
            width: (self.width / factor).floor(),
            height: (self.height / factor).floor(),
        }
    }

    /// Integer pixel bounds `(x, y, width, height)`, flooring fractional parts.
    pub fn to_pixels(&self) -> (u32, u32, u32, u32) {
        (
            self.x.max(0.0) as u32,
            self.y.max(0.0) as u32,
            self.width.max(0.0) as u32,
            self.height.max(0.0) as u32,
        )
    }
}

/// Score of one candidate. Only `total` is used for ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub detail: f64,
    pub skin: f64,
    pub saturation: f64,
    pub total: f64,
}

/// A candidate rectangle with its score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredCrop {
    #[serde(flatten)]
    pub rect: CropRect,
    pub score: Score,
}

/// Everything one crop search produced.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    /// Feature maps of the working image (after prescaling, before score
    /// down-sampling).
    #[serde(skip)]
    pub analysis_image: AnalysisImage,
    /// Every enumerated candidate in enumeration order, in original-image space.
    pub crops: Vec<ScoredCrop>,
    /// Highest-scoring candidate; the earliest one wins ties.
    pub top_crop: ScoredCrop,
}
