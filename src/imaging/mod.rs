//! Image I/O and pixel services around the crop search.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify / decode** | `image::image_dimensions`, `image::ImageReader` |
//! | **Luma, 3x3 convolution, resampling** | [`filters`] over `image::imageops` |
//! | **Search geometry** | [`calculations`] (pure arithmetic) |
//! | **Crop + resize + encode** | `crop_imm` + Lanczos3 + format by extension |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for search geometry (unit testable)
//! - **Filters**: The pixel primitives the analysis calls into
//! - **Parameters**: Data structures describing what to write
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining backend + search

pub mod backend;
pub mod calculations;
pub mod filters;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use operations::{
    OperationError, analyze_file, apply_crop, get_dimensions, plan_crop, write_analysis,
};
pub use params::{CropParams, Quality, Region};
pub use rust_backend::RustBackend;
