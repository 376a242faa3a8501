//! Deferred execution: stages, fused pipelines, and the lazy scheduler.
//!
//! Instead of running each vector primitive as its own pass over
//! memory, the deferred backend records a [`Stage`] per call and fuses
//! stages that touch the same containers into a [`Pipeline`]. At flush,
//! the pipeline's shared index range is tiled and every stage runs per
//! tile, so each cache line is visited once for the whole stage
//! sequence. Flushing happens on scalar reads, on explicit
//! [`LazyContext::wait`], or when container lengths cannot share a
//! pipeline.

mod lazy;
mod pipe;
mod stage;

pub use lazy::{LazyContext, LazyEvaluation, VectorHandle};
pub use pipe::Pipeline;
pub use stage::{Opcode, Stage, StageCtx};
