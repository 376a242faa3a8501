use bitflags::bitflags;

bitflags! {
    /// Modifier flags accepted by every primitive.
    ///
    /// Descriptors never change what a primitive computes on well-typed
    /// dense inputs; they assert preconditions (`DENSE`, `NO_CASTING`) or
    /// select an operand transformation (`TRANSPOSE_LEFT`,
    /// `TRANSPOSE_RIGHT`). Bits this backend does not interpret
    /// (`INVERT_MASK`, `STRUCTURAL`, `USE_INDEX`) are rejected with
    /// `Unsupported` rather than ignored.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Descriptor: u32 {
        const INVERT_MASK     = 1 << 0;
        const STRUCTURAL      = 1 << 3;
        /// All operands are promised fully dense; violations surface as
        /// `Illegal` at flush time in the deferred backend.
        const DENSE           = 1 << 4;
        const USE_INDEX       = 1 << 6;
        /// Declares that no implicit domain conversion may happen. The type
        /// system already guarantees this; the bit is accepted for source
        /// compatibility with descriptor-driven callers.
        const NO_CASTING      = 1 << 8;
        const TRANSPOSE_LEFT  = 1 << 11;
        const TRANSPOSE_RIGHT = 1 << 12;
    }
}

impl Descriptor {
    pub const NO_OPERATION: Descriptor = Descriptor::empty();
}
