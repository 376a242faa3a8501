//! The level-0 container: one value plus the `initialized` flag.

/// A single algebraic value.
///
/// Reading an uninitialized scalar is a caller bug in user code; the
/// primitives never do it, they propagate the flag instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scalar<T> {
    value: T,
    initialized: bool,
}

impl<T: Default> Scalar<T> {
    /// Allocated but unassigned.
    pub fn new() -> Self {
        Scalar { value: T::default(), initialized: false }
    }
}

impl<T: Default> Default for Scalar<T> {
    fn default() -> Self {
        Scalar::new()
    }
}

impl<T> Scalar<T> {
    pub fn new_with(value: T) -> Self {
        Scalar { value, initialized: true }
    }

    pub fn initialized(&self) -> bool {
        self.initialized
    }

    pub fn set_initialized(&mut self, init: bool) {
        self.initialized = init;
    }

    /// The held value. Meaningless while uninitialized.
    pub fn value(&self) -> T
    where
        T: Copy,
    {
        debug_assert!(self.initialized);
        self.value
    }

    /// Assigns a value and marks the scalar initialized.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.initialized = true;
    }

    /// Back to the unassigned state; the old value is kept but no longer
    /// observable through [`Scalar::value`].
    pub fn clear(&mut self) {
        self.initialized = false;
    }
}

impl<T> From<T> for Scalar<T> {
    fn from(value: T) -> Self {
        Scalar::new_with(value)
    }
}
