//! alpine: dense structured containers with GraphBLAS-style primitives
//!
//! This crate binds logical matrices and vectors — parameterized by element
//! type, algebraic structure, and view — to physical dense storage, and
//! routes level 0/1/2/3 primitives (`set`, `apply`, `foldl`, `dot`,
//! `eWiseApply`, `mxm`, ...) through structure-aware banded iteration.
//! A deferred backend batches primitives into fusable pipelines that are
//! tiled and flushed on demand.

pub mod algebra;
pub mod config;
pub mod container;
pub mod descriptor;
pub mod error;
pub mod imf;
pub mod iterate;
pub mod ops;
pub mod pipeline;
pub mod storage;
pub mod structure;
pub mod view;

pub use algebra::*;
pub use container::{
    FunctorMatrix, FunctorVector, Matrix, MatrixAccess, MatrixAccessMut, Scalar, Vector,
    VectorAccess, VectorAccessMut,
};
pub use descriptor::Descriptor;
pub use error::{AlpError, AlpResult};
pub use imf::Imf;
pub use ops::{blas0, blas1, blas2, blas3, constants, io};
pub use storage::{Amf, Smf};
pub use structure::{Band, Structure};
pub use view::{
    DiagonalView, MatrixView, MatrixViewMut, VectorView, col_view, diagonal, gather, gather_mut,
    get_view, row_view, select, transpose, transpose_mut, view_as,
};

// Deferred entry points at the crate root
pub use pipeline::{LazyContext, VectorHandle};
