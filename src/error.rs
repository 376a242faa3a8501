use thiserror::Error;

// Unified error type for alpine

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlpError {
    /// Operand dimensions or structures do not line up.
    #[error("dimension or structure mismatch: {0}")]
    Mismatch(String),
    /// A call that violates a runtime contract, e.g. an aliased output or a
    /// view that leaves the stored region of its target.
    #[error("illegal call: {0}")]
    Illegal(String),
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
    #[error("allocation failed for {0} elements")]
    OutOfMemory(usize),
    /// A library-internal invariant was broken. Callers cannot recover.
    #[error("internal panic state: {0}")]
    Panic(&'static str),
}

pub type AlpResult<T> = Result<T, AlpError>;

impl AlpError {
    pub fn mismatch(msg: impl Into<String>) -> Self {
        AlpError::Mismatch(msg.into())
    }

    pub fn illegal(msg: impl Into<String>) -> Self {
        AlpError::Illegal(msg.into())
    }
}
