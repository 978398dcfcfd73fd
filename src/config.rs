//! Crop configuration module.
//!
//! Handles loading, validating, and merging `smart-crop.toml` files. Every
//! tunable of the search lives in [`CropOptions`]; nothing is read from
//! process-wide state. A config file only needs the keys it wants to change,
//! stock defaults fill in the rest.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [crop]
//! detail_weight = 0.2
//! edge_radius = 0.4
//! edge_weight = -10.0
//! outside_importance = -0.5
//! rule_of_thirds = true
//! saturation_bias = 0.2
//! saturation_brightness_max = 0.9
//! saturation_brightness_min = 0.05
//! saturation_threshold = 0.4
//! saturation_weight = 0.3
//! score_down_sample = 1
//! skin_bias = 0.01
//! skin_brightness_max = 1.0
//! skin_brightness_min = 0.2
//! skin_color = [0.78, 0.57, 0.44]
//! skin_threshold = 0.8
//! skin_weight = 1.8
//! max_scale = 1.0
//! min_scale = 0.9
//! scale_step = 0.1
//! step = 8
//! prescale = true
//! parallel = true
//!
//! [processing]
//! max_threads = 4           # Max scoring threads (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings file layout: search tunables plus thread-pool sizing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Feature extraction, importance and search parameters.
    pub crop: CropOptions,
    /// Parallel scoring settings.
    pub processing: ProcessingConfig,
}

/// Immutable parameter set for one crop search.
///
/// Weights and thresholds are applied to channel values normalized to `[0, 1]`;
/// brightness bounds are fractions of full-scale luma.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropOptions {
    pub detail_weight: f64,
    /// Fraction of the half-extent, measured in from each crop border, where
    /// the edge penalty starts.
    pub edge_radius: f64,
    pub edge_weight: f64,
    /// Importance of every pixel outside the candidate crop.
    pub outside_importance: f64,
    pub rule_of_thirds: bool,
    pub saturation_bias: f64,
    pub saturation_brightness_max: f64,
    pub saturation_brightness_min: f64,
    pub saturation_threshold: f64,
    pub saturation_weight: f64,
    /// Sampling stride of the scorer, in working-image pixels.
    pub score_down_sample: u32,
    pub skin_bias: f64,
    pub skin_brightness_max: f64,
    pub skin_brightness_min: f64,
    /// Reference skin tone direction as normalized RGB. Not unit length:
    /// the default has a norm of about 1.06.
    pub skin_color: [f64; 3],
    pub skin_threshold: f64,
    pub skin_weight: f64,
    pub max_scale: f64,
    pub min_scale: f64,
    pub scale_step: f64,
    /// Sliding-window step in working-image pixels.
    pub step: u32,
    /// Shrink large images before analysis.
    pub prescale: bool,
    /// Score candidates on the rayon pool.
    pub parallel: bool,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            detail_weight: 0.2,
            edge_radius: 0.4,
            edge_weight: -10.0,
            outside_importance: -0.5,
            rule_of_thirds: true,
            saturation_bias: 0.2,
            saturation_brightness_max: 0.9,
            saturation_brightness_min: 0.05,
            saturation_threshold: 0.4,
            saturation_weight: 0.3,
            score_down_sample: 1,
            skin_bias: 0.01,
            skin_brightness_max: 1.0,
            skin_brightness_min: 0.2,
            skin_color: [0.78, 0.57, 0.44],
            skin_threshold: 0.8,
            skin_weight: 1.8,
            max_scale: 1.0,
            min_scale: 0.9,
            scale_step: 0.1,
            step: 8,
            prescale: true,
            parallel: true,
        }
    }
}

impl CropOptions {
    /// Validate that option values describe a searchable configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("skin_threshold", self.skin_threshold),
            ("saturation_threshold", self.saturation_threshold),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "crop.{name} must be in [0, 1)"
                )));
            }
        }
        if self.skin_brightness_min > self.skin_brightness_max {
            return Err(ConfigError::Validation(
                "crop.skin_brightness_min must not exceed crop.skin_brightness_max".into(),
            ));
        }
        if self.saturation_brightness_min > self.saturation_brightness_max {
            return Err(ConfigError::Validation(
                "crop.saturation_brightness_min must not exceed crop.saturation_brightness_max"
                    .into(),
            ));
        }
        if self.score_down_sample == 0 {
            return Err(ConfigError::Validation(
                "crop.score_down_sample must be at least 1".into(),
            ));
        }
        if self.step == 0 {
            return Err(ConfigError::Validation("crop.step must be at least 1".into()));
        }
        if self.scale_step < 0.01 {
            return Err(ConfigError::Validation(
                "crop.scale_step must be at least 0.01".into(),
            ));
        }
        if self.min_scale <= 0.0 || self.max_scale <= 0.0 {
            return Err(ConfigError::Validation(
                "crop.min_scale and crop.max_scale must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of scoring threads.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_threads
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default settings as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Settings::default()).expect("default settings must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_settings(overlay: Option<toml::Value>) -> Result<Settings, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let settings: Settings = merged.try_into()?;
    settings.crop.validate()?;
    Ok(settings)
}

/// Load settings from a TOML file, or stock defaults when `path` is `None`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let overlay = match path {
        Some(p) => {
            let content = fs::read_to_string(p)?;
            Some(toml::from_str::<toml::Value>(&content)?)
        }
        None => None,
    };
    resolve_settings(overlay)
}

/// Returns a fully-commented stock `smart-crop.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# smart-crop configuration
# ========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Crop search
# ---------------------------------------------------------------------------
[crop]
# Score weights for the three analysis channels.
detail_weight = 0.2
skin_weight = 1.8
saturation_weight = 0.3

# Added to the detail value when weighting skin and saturation pixels.
skin_bias = 0.01
saturation_bias = 0.2

# Skin detection: reference tone (normalized RGB), likelihood threshold and
# the luma window (fraction of full scale) where skin is accepted.
skin_color = [0.78, 0.57, 0.44]
skin_threshold = 0.8
skin_brightness_min = 0.2
skin_brightness_max = 1.0

# Saturation detection: threshold and accepted luma window.
saturation_threshold = 0.4
saturation_brightness_min = 0.05
saturation_brightness_max = 0.9

# Importance model: penalty band along the crop border, its weight, and the
# importance of pixels outside the candidate crop.
edge_radius = 0.4
edge_weight = -10.0
outside_importance = -0.5
rule_of_thirds = true

# Candidate search: scale bracket, scale step, window step (pixels).
max_scale = 1.0
min_scale = 0.9
scale_step = 0.1
step = 8

# Score on a map shrunk N times (Lanczos3), one sample per NxN block.
score_down_sample = 1

# Shrink large images before analysis.
prescale = true

# Score candidates in parallel. Results are identical either way.
parallel = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum scoring threads.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}
