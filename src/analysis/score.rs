//! Candidate scoring and selection.
//!
//! A score sums, over sampled pixels of the feature image, the channel
//! values weighted by their [`importance`] for the candidate, then divides
//! by the candidate's area so windows of different scales compare fairly.
//!
//! Candidates are independent of each other, so [`score_all`] can fan out on
//! the rayon pool. The collected scores keep enumeration order and
//! [`select_top`] scans them sequentially, which makes parallel and
//! sequential runs pick the same winner.

use super::features::AnalysisImage;
use super::importance::importance;
use crate::config::CropOptions;
use crate::types::{CropRect, Score, ScoredCrop};
use rayon::prelude::*;

/// Score `crop` against a feature map sampled every `stride` working pixels.
///
/// `map` is the working image resampled (Lanczos3) to one sample per
/// `stride x stride` block. Sample `(x, y)` is weighted by the importance of
/// the block's top-left working pixel `(x * stride, y * stride)`. With
/// `stride == 1` every pixel is visited.
pub fn score(map: &AnalysisImage, stride: u32, crop: &CropRect, options: &CropOptions) -> Score {
    let stride = stride.max(1) as f64;
    let width = map.width() as usize;
    let (skin_plane, edge_plane, sat_plane) = (map.skin(), map.edge(), map.saturation());

    let mut detail_score = 0.0;
    let mut skin_score = 0.0;
    let mut saturation_score = 0.0;

    for y in 0..map.height() as usize {
        let row = y * width;
        let py = y as f64 * stride;
        for x in 0..width {
            let i = row + x;
            let weight = importance(crop, x as f64 * stride, py, options);
            let detail = edge_plane[i] as f64 / 255.0;
            skin_score += skin_plane[i] as f64 / 255.0 * (detail + options.skin_bias) * weight;
            detail_score += detail * weight;
            saturation_score +=
                sat_plane[i] as f64 / 255.0 * (detail + options.saturation_bias) * weight;
        }
    }

    let total = (detail_score * options.detail_weight
        + skin_score * options.skin_weight
        + saturation_score * options.saturation_weight)
        / crop.area();

    Score {
        detail: detail_score,
        skin: skin_score,
        saturation: saturation_score,
        total,
    }
}

/// Score every candidate, preserving enumeration order.
pub fn score_all(
    map: &AnalysisImage,
    stride: u32,
    crops: &[CropRect],
    options: &CropOptions,
) -> Vec<ScoredCrop> {
    let scored = |rect: &CropRect| ScoredCrop {
        rect: *rect,
        score: score(map, stride, rect, options),
    };
    if options.parallel {
        crops.par_iter().map(scored).collect()
    } else {
        crops.iter().map(scored).collect()
    }
}

/// Index of the highest `total`; the earliest candidate wins ties.
///
/// Returns `None` for an empty slice.
pub fn select_top(crops: &[ScoredCrop]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, crop) in crops.iter().enumerate() {
        match best {
            Some((_, top)) if crop.score.total <= top => {}
            _ => best = Some((index, crop.score.total)),
        }
    }
    best.map(|(index, _)| index)
}
