//! A deferred stage: a range-runnable closure plus the bookkeeping the
//! scheduler needs to decide fusion.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::error::AlpResult;

/// What a stage does, for merge diagnostics and trace output. The
/// fusion decision itself only looks at the container id sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    SetScalar,
    SetMaskedScalar,
    SetVector,
    SetMaskedVector,
    Fold,
    EWise,
    DotGeneric,
    EWiseLambda,
    EWiseMap,
    Zip,
    Unzip,
    VxmGeneric,
}

/// Raw element-buffer table handed to stage closures at flush.
///
/// Every registered container contributes its full buffer; a closure
/// invoked for a tile `[lo, hi)` must confine itself to that range.
/// Tiles partition `[0, n)`, so ranges handed to concurrently running
/// closures never overlap, and the scheduler refuses stages whose
/// output id also appears among their inputs. Those two rules together
/// make the aliased `slice`/`slice_mut` pairs below disjoint.
pub struct StageCtx<'a, T> {
    bufs: HashMap<u64, (*mut T, usize)>,
    _borrow: PhantomData<&'a mut T>,
}

// The pointer table is only dereferenced on disjoint ranges; see the
// type-level comment.
unsafe impl<T: Send> Send for StageCtx<'_, T> {}
unsafe impl<T: Sync> Sync for StageCtx<'_, T> {}

impl<'a, T> StageCtx<'a, T> {
    pub(crate) fn new() -> Self {
        StageCtx { bufs: HashMap::new(), _borrow: PhantomData }
    }

    pub(crate) fn register(&mut self, id: u64, buf: &'a mut [T]) {
        self.bufs.insert(id, (buf.as_mut_ptr(), buf.len()));
    }

    /// Read-only view of `[lo, hi)` of container `id`.
    ///
    /// # Safety
    /// No concurrently running closure may hold a mutable slice of
    /// `id` overlapping `[lo, hi)`.
    pub(crate) unsafe fn slice(&self, id: u64, lo: usize, hi: usize) -> &[T] {
        let (ptr, len) = self.bufs[&id];
        debug_assert!(lo <= hi && hi <= len);
        unsafe { std::slice::from_raw_parts(ptr.add(lo), hi - lo) }
    }

    /// Mutable view of `[lo, hi)` of container `id`.
    ///
    /// # Safety
    /// No concurrently running closure may hold any slice of `id`
    /// overlapping `[lo, hi)`.
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn slice_mut(&self, id: u64, lo: usize, hi: usize) -> &mut [T] {
        let (ptr, len) = self.bufs[&id];
        debug_assert!(lo <= hi && hi <= len);
        unsafe { std::slice::from_raw_parts_mut(ptr.add(lo), hi - lo) }
    }
}

type StageFn<T> = dyn Fn(&StageCtx<'_, T>, usize, usize) -> AlpResult<()> + Send + Sync;

/// One deferred operation over a contiguous index range.
pub struct Stage<T> {
    pub(crate) run: Box<StageFn<T>>,
    pub(crate) opcode: Opcode,
    pub(crate) output: Option<u64>,
    pub(crate) inputs: Vec<u64>,
    pub(crate) out_of_place: bool,
    pub(crate) dense_descr: bool,
}

impl<T> Stage<T> {
    pub fn new(
        opcode: Opcode,
        output: Option<u64>,
        inputs: Vec<u64>,
        run: impl Fn(&StageCtx<'_, T>, usize, usize) -> AlpResult<()> + Send + Sync + 'static,
    ) -> Self {
        Stage {
            run: Box::new(run),
            opcode,
            output,
            inputs,
            out_of_place: false,
            dense_descr: false,
        }
    }

    pub fn out_of_place(mut self) -> Self {
        self.out_of_place = true;
        self
    }

    pub fn dense(mut self, dense: bool) -> Self {
        self.dense_descr = dense;
        self
    }

    /// Container ids the stage touches, output first.
    pub(crate) fn accessed(&self) -> impl Iterator<Item = u64> + '_ {
        self.output.into_iter().chain(self.inputs.iter().copied())
    }
}

impl<T> std::fmt::Debug for Stage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("opcode", &self.opcode)
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .field("out_of_place", &self.out_of_place)
            .field("dense_descr", &self.dense_descr)
            .finish()
    }
}
