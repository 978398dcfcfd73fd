//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Crop
//!
//! A single geometry line in the `WxH+X+Y` form other image tools accept,
//! where `W` and `H` are the *right and bottom edges* of the crop:
//!
//! ```text
//! 640x427+64+0
//! ```
//!
//! ## Analyze
//!
//! A pretty-printed JSON report:
//!
//! ```text
//! {
//!   "source": { "width": 640, "height": 427 },
//!   "target": { "width": 100, "height": 100 },
//!   "top_crop": { "x": 64, "y": 0, "width": 427, "height": 427, "score": { ... } },
//!   "candidates": [ { "index": 17, "x": 64, ... }, ... ]
//! }
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function for testability and a `print_*`
//! wrapper that writes to stdout. Format functions are pure.

use crate::types::{AnalysisResult, CropRect, ScoredCrop};
use serde::Serialize;
use std::cmp::Ordering;

// ============================================================================
// Crop output
// ============================================================================

/// Geometry string `"{x+width}x{y+height}+{x}+{y}"` with whole-pixel values.
pub fn geometry_string(rect: &CropRect) -> String {
    let (x, y, width, height) = rect.to_pixels();
    format!("{}x{}+{}+{}", x + width, y + height, x, y)
}

/// Format the `crop` command output.
pub fn format_crop_output(result: &AnalysisResult) -> Vec<String> {
    vec![geometry_string(&result.top_crop.rect)]
}

pub fn print_crop_output(result: &AnalysisResult) {
    for line in format_crop_output(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Analyze output
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// A candidate with its position in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedCrop {
    pub index: usize,
    #[serde(flatten)]
    pub crop: ScoredCrop,
}

/// JSON report written by the `analyze` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub source: Size,
    pub target: Size,
    pub candidate_count: usize,
    pub top_crop: ScoredCrop,
    /// Best candidates by total score, highest first.
    pub candidates: Vec<RankedCrop>,
}

/// Rank candidates by total score, descending.
///
/// Equal totals keep enumeration order, so the first entry is always the
/// crop the search selected.
pub fn rank_candidates(crops: &[ScoredCrop], limit: usize) -> Vec<RankedCrop> {
    let mut ranked: Vec<RankedCrop> = crops
        .iter()
        .enumerate()
        .map(|(index, crop)| RankedCrop { index, crop: *crop })
        .collect();
    ranked.sort_by(|a, b| {
        b.crop
            .score
            .total
            .partial_cmp(&a.crop.score.total)
            .unwrap_or(Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });
    ranked.truncate(limit);
    ranked
}

pub fn build_report(
    result: &AnalysisResult,
    source: (u32, u32),
    target: (u32, u32),
    top: usize,
) -> AnalysisReport {
    AnalysisReport {
        source: Size {
            width: source.0,
            height: source.1,
        },
        target: Size {
            width: target.0,
            height: target.1,
        },
        candidate_count: result.crops.len(),
        top_crop: result.top_crop,
        candidates: rank_candidates(&result.crops, top),
    }
}

/// Format the `analyze` command output as pretty JSON.
pub fn format_analysis_report(report: &AnalysisReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

pub fn print_analysis_report(report: &AnalysisReport) -> Result<(), serde_json::Error> {
    println!("{}", format_analysis_report(report)?);
    Ok(())
}
