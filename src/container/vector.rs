//! Owning dense vectors.

use num_traits::Zero as NumZero;

use crate::error::{AlpError, AlpResult};

use super::{next_container_id, VectorAccess, VectorAccessMut};

/// An owning one-dimensional container: a contiguous buffer of length
/// `n`, the `initialized` flag, and a stable id. The access path is the
/// identity, so elements live at their own index.
#[derive(Debug, Clone)]
pub struct Vector<T> {
    buf: Vec<T>,
    initialized: bool,
    id: u64,
}

impl<T: Copy + NumZero> Vector<T> {
    /// Allocates an uninitialized vector of length `n`.
    pub fn new(n: usize) -> AlpResult<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(n).map_err(|_| AlpError::OutOfMemory(n))?;
        buf.resize(n, T::zero());
        Ok(Vector { buf, initialized: false, id: next_container_id() })
    }

    /// As [`Vector::new`]; the capacity hint is accepted and ignored,
    /// dense storage cannot exceed its extent.
    pub fn with_capacity(n: usize, _capacity: usize) -> AlpResult<Self> {
        Vector::new(n)
    }

    /// An initialized vector holding a copy of `values`.
    pub fn from_slice(values: &[T]) -> AlpResult<Self> {
        let mut v = Vector::new(values.len())?;
        v.buf.copy_from_slice(values);
        v.initialized = !values.is_empty();
        Ok(v)
    }
}

impl<T> Vector<T> {
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Stable handle, unique within the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    pub fn set_initialized(&mut self, init: bool) {
        self.initialized = init;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buf
    }
}

impl<T: Copy> VectorAccess<T> for Vector<T> {
    fn len(&self) -> usize {
        self.buf.len()
    }

    fn initialized(&self) -> bool {
        self.initialized
    }

    #[inline]
    fn at(&self, i: usize) -> T {
        self.buf[i]
    }
}

impl<T: Copy> VectorAccessMut<T> for Vector<T> {
    fn set_initialized(&mut self, init: bool) {
        self.initialized = init;
    }

    #[inline]
    fn write_at(&mut self, i: usize, v: T) {
        self.buf[i] = v;
    }
}
