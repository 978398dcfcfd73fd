//! # Smart Crop
//!
//! Content-aware crop selection. Given an image and a target size, find the
//! rectangle of the target's aspect ratio that best keeps what a viewer cares
//! about, for thumbnailing without a human in the loop.
//!
//! # Architecture: Four-Stage Search
//!
//! ```text
//! 1. Geometry   image + target  →  scale, crop size, prescale factor
//! 2. Features   working image   →  AnalysisImage (skin, edge, saturation)
//! 3. Candidates crop size       →  sliding windows over a range of scales
//! 4. Score      maps × windows  →  ScoredCrop list + top crop
//! ```
//!
//! Stage 1 is pure arithmetic and stages 2 to 4 are pure functions of their
//! inputs, so the whole search runs in memory and is deterministic. File
//! decoding and encoding live behind [`imaging::ImageBackend`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`analysis`] | Feature maps, importance weighting, candidate generation, scoring and the [`analysis::crop`] entry point |
//! | [`config`] | `CropOptions` defaults, TOML loading over stock defaults, validation |
//! | [`types`] | Shared result types (`CropRect`, `Score`, `ScoredCrop`, `AnalysisResult`) |
//! | [`imaging`] | Decoding, pixel filters, search geometry and crop output via the `image` crate |
//! | [`output`] | CLI output formatting: geometry strings and the JSON analysis report |
//!
//! # Design Decisions
//!
//! ## Planar Feature Maps
//!
//! The three feature channels are stored as separate byte planes rather than
//! an interleaved RGB buffer. The scorer walks each channel as a flat slice;
//! [`analysis::AnalysisImage::to_rgb_image`] packs them for debugging output.
//!
//! ## Search in a Shrunken Working Image
//!
//! With `prescale` enabled, large sources are shrunk so the smallest crop
//! candidate is about the size of the target before any analysis runs. Crops
//! found in the working image are mapped back to source pixels by dividing
//! and flooring, which keeps every reported rectangle inside the source.
//!
//! ## Deterministic Parallel Scoring
//!
//! Candidates are scored independently on the rayon pool. Results are
//! collected in enumeration order and ties go to the earliest candidate, so
//! parallel and sequential runs agree bit for bit.

pub mod analysis;
pub mod config;
pub mod imaging;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
