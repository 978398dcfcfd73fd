//! Content-aware crop analysis.
//!
//! | Stage | Module | Output |
//! |---|---|---|
//! | **Features** | [`features`] | planar skin / edge / saturation maps |
//! | **Importance** | [`importance`] | positional weight of a pixel for a crop |
//! | **Candidates** | [`candidates`] | sliding windows over a scale bracket |
//! | **Scoring** | [`score`] | weighted, area-normalized score per window |
//! | **Search** | [`search`] | the orchestrated pipeline and its errors |
//!
//! Every stage is a pure function over immutable buffers; nothing is shared
//! between calls.

pub mod candidates;
pub mod features;
pub mod importance;
pub mod score;
pub mod search;

pub use candidates::{SearchWindow, generate};
pub use features::{AnalysisImage, analyze};
pub use importance::{importance, thirds};
pub use score::{score, score_all, select_top};
pub use search::{CropError, crop};
