//! Tuning options for the deferred backend.
//!
//! Modules:
//! - [`options`]: capacity limits for pipelines and the tile-size model used
//!   at flush time.

pub mod options;
pub use options::{PipelineOptions, TilingOptions};
