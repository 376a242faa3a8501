//! The deferred scheduler. `LazyEvaluation` decides which pipeline a
//! new stage fuses into; `LazyContext` is the user-facing surface that
//! owns the vector buffers, enqueues stages, and flushes on demand.
//!
//! A stage joins every pipeline it shares a container with; the sharers
//! are merged into one before the stage is appended, so within a
//! pipeline insertion order is execution order. Pipelines never share a
//! container, which is what makes flushing one of them sound on its
//! own.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::warn;

use crate::algebra::{BinaryOp, Conjugate, IdentityValue, Monoid, Semiring};
use crate::config::{PipelineOptions, TilingOptions};
use crate::container::next_container_id;
use crate::descriptor::Descriptor;
use crate::error::{AlpError, AlpResult};

use super::pipe::Pipeline;
use super::stage::{Opcode, Stage, StageCtx};

/// A set of pipelines plus the capacity bookkeeping around them.
pub struct LazyEvaluation<T> {
    pipelines: Vec<Pipeline<T>>,
    opts: PipelineOptions,
    tiling: TilingOptions,
    warned: bool,
}

impl<T: Send + Sync> LazyEvaluation<T> {
    pub fn new(opts: PipelineOptions, tiling: TilingOptions) -> Self {
        let mut pipelines = Vec::with_capacity(opts.max_pipelines);
        for _ in 0..opts.max_pipelines {
            pipelines.push(Pipeline::new(tiling.clone()));
        }
        LazyEvaluation { pipelines, opts, tiling, warned: false }
    }

    /// Live (non-empty) pipelines.
    pub fn num_pipelines(&self) -> usize {
        self.pipelines.iter().filter(|p| !p.is_empty()).count()
    }

    fn warn_capacity(&mut self, what: &str) {
        if self.opts.warn_if_exceeded && !self.warned {
            self.warned = true;
            warn!("deferred scheduler exceeded its reserved {what}; consider raising PipelineOptions");
        }
    }

    /// Routes a stage over range `[0, n)` into the right pipeline,
    /// merging every pipeline that shares a container with it. Sharers
    /// whose range length differs are flushed first.
    pub fn add_stage(&mut self, stage: Stage<T>, n: usize, ctx: &StageCtx<'_, T>) -> AlpResult<()> {
        for idx in 0..self.pipelines.len() {
            if !self.pipelines[idx].is_empty()
                && self.pipelines[idx].shares_data_with(&stage)
                && self.pipelines[idx].size() != n
            {
                self.pipelines[idx].execution(ctx)?;
            }
        }

        let sharers: Vec<usize> = (0..self.pipelines.len())
            .filter(|&i| !self.pipelines[i].is_empty() && self.pipelines[i].shares_data_with(&stage))
            .collect();
        let target = match sharers.split_first() {
            Some((&first, rest)) => {
                for &other in rest {
                    let (a, b) = split_two(&mut self.pipelines, first, other);
                    a.merge(b);
                }
                first
            }
            None => match self.pipelines.iter().position(|p| p.is_empty()) {
                Some(slot) => slot,
                None => {
                    self.warn_capacity("pipeline slots");
                    self.pipelines.push(Pipeline::new(self.tiling.clone()));
                    self.pipelines.len() - 1
                }
            },
        };

        self.pipelines[target].add_stage(stage, n);
        if self.pipelines[target].len() > self.opts.max_depth {
            self.warn_capacity("stage depth");
        }
        if self.pipelines[target].ids().count() > self.opts.max_containers {
            self.warn_capacity("container slots");
        }
        Ok(())
    }

    /// Flushes the one pipeline touching `id`, if any.
    pub fn execution_for(&mut self, id: u64, ctx: &StageCtx<'_, T>) -> AlpResult<()> {
        for p in &mut self.pipelines {
            if p.accesses(id) {
                return p.execution(ctx);
            }
        }
        Ok(())
    }

    /// Flushes everything.
    pub fn execution(&mut self, ctx: &StageCtx<'_, T>) -> AlpResult<()> {
        let mut first_err = None;
        for p in &mut self.pipelines {
            if let Err(e) = p.execution(ctx) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

// Disjoint &mut to two pipeline slots.
fn split_two<T>(v: &mut [Pipeline<T>], a: usize, b: usize) -> (&mut Pipeline<T>, &mut Pipeline<T>) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = v.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = v.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}

/// Handle to a vector owned by a [`LazyContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorHandle(u64);

impl VectorHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

struct Slot<T> {
    buf: Vec<T>,
    initialized: bool,
}

/// Owner of deferred vectors and their scheduler.
///
/// Element operations enqueue stages and return immediately; scalar
/// reductions, [`read`](LazyContext::read), and
/// [`wait`](LazyContext::wait) flush. Initialization state is tracked at
/// enqueue time: an operation on a vector that will still be
/// uninitialized when its pipeline runs simply marks its output
/// uninitialized and enqueues nothing, matching what the eager
/// primitives do.
pub struct LazyContext<T> {
    store: HashMap<u64, Slot<T>>,
    sched: LazyEvaluation<T>,
}

impl<T> Default for LazyContext<T>
where
    T: Copy + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LazyContext<T>
where
    T: Copy + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::with_options(PipelineOptions::default(), TilingOptions::default())
    }

    pub fn with_options(opts: PipelineOptions, tiling: TilingOptions) -> Self {
        LazyContext { store: HashMap::new(), sched: LazyEvaluation::new(opts, tiling) }
    }

    /// A fresh uninitialized vector of length `n`.
    pub fn vector(&mut self, n: usize) -> AlpResult<VectorHandle>
    where
        T: Default,
    {
        let mut buf = Vec::new();
        buf.try_reserve_exact(n).map_err(|_| AlpError::OutOfMemory(n))?;
        buf.resize(n, T::default());
        let id = next_container_id();
        self.store.insert(id, Slot { buf, initialized: false });
        Ok(VectorHandle(id))
    }

    /// An initialized vector holding a copy of `values`.
    pub fn vector_from(&mut self, values: &[T]) -> AlpResult<VectorHandle> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(values.len())
            .map_err(|_| AlpError::OutOfMemory(values.len()))?;
        buf.extend_from_slice(values);
        let id = next_container_id();
        self.store.insert(id, Slot { buf, initialized: !values.is_empty() });
        Ok(VectorHandle(id))
    }

    pub fn size(&self, h: VectorHandle) -> AlpResult<usize> {
        Ok(self.slot(h)?.buf.len())
    }

    /// Initialization state as it will be once pending work runs.
    pub fn initialized(&self, h: VectorHandle) -> AlpResult<bool> {
        Ok(self.slot(h)?.initialized)
    }

    pub fn num_pipelines(&self) -> usize {
        self.sched.num_pipelines()
    }

    fn slot(&self, h: VectorHandle) -> AlpResult<&Slot<T>> {
        self.store
            .get(&h.0)
            .ok_or_else(|| AlpError::illegal("handle does not belong to this context"))
    }

    fn len_of(&self, h: VectorHandle) -> AlpResult<usize> {
        Ok(self.slot(h)?.buf.len())
    }

    fn same_len(&self, a: VectorHandle, b: VectorHandle) -> AlpResult<usize> {
        let (la, lb) = (self.len_of(a)?, self.len_of(b)?);
        if la != lb {
            return Err(AlpError::mismatch(format!("vector lengths {la} and {lb}")));
        }
        Ok(la)
    }

    fn mark(&mut self, h: VectorHandle, init: bool) {
        if let Some(slot) = self.store.get_mut(&h.0) {
            slot.initialized = init;
        }
    }

    fn ctx(store: &mut HashMap<u64, Slot<T>>) -> StageCtx<'_, T> {
        let mut ctx = StageCtx::new();
        for (&id, slot) in store.iter_mut() {
            ctx.register(id, &mut slot.buf);
        }
        ctx
    }

    fn enqueue(&mut self, stage: Stage<T>, n: usize) -> AlpResult<()> {
        let ctx = Self::ctx(&mut self.store);
        self.sched.add_stage(stage, n, &ctx)
    }

    /// Deferred `x[i] = alpha`.
    pub fn set_value(&mut self, h: VectorHandle, alpha: T) -> AlpResult<()> {
        let n = self.len_of(h)?;
        let id = h.0;
        let stage = Stage::new(Opcode::SetScalar, Some(id), Vec::new(), move |ctx, lo, hi| {
            // Safety: tiles are disjoint and `id` is this stage's only
            // container.
            let out = unsafe { ctx.slice_mut(id, lo, hi) };
            out.fill(alpha);
            Ok(())
        });
        self.enqueue(stage, n)?;
        self.mark(h, n > 0);
        Ok(())
    }

    /// Deferred `dst = src`.
    pub fn set_copy(&mut self, dst: VectorHandle, src: VectorHandle) -> AlpResult<()> {
        let n = self.same_len(dst, src)?;
        if dst == src {
            return Err(AlpError::illegal("output aliases an input"));
        }
        if !self.slot(src)?.initialized {
            self.mark(dst, false);
            return Ok(());
        }
        let (d, s) = (dst.0, src.0);
        let stage = Stage::new(Opcode::SetVector, Some(d), vec![s], move |ctx, lo, hi| {
            // Safety: tiles are disjoint and d != s.
            let out = unsafe { ctx.slice_mut(d, lo, hi) };
            let inp = unsafe { ctx.slice(s, lo, hi) };
            out.copy_from_slice(inp);
            Ok(())
        })
        .out_of_place();
        self.enqueue(stage, n)?;
        self.mark(dst, n > 0);
        Ok(())
    }

    /// Deferred in-place `dst[i] = dst[i] ⊕ src[i]`.
    pub fn foldl<Op>(&mut self, dst: VectorHandle, src: VectorHandle, op: Op) -> AlpResult<()>
    where
        Op: BinaryOp<T, T, T> + Send + Sync + 'static,
    {
        let n = self.same_len(dst, src)?;
        if dst == src {
            return Err(AlpError::illegal("output aliases an input"));
        }
        if !self.slot(dst)?.initialized || !self.slot(src)?.initialized {
            self.mark(dst, false);
            return Ok(());
        }
        let (d, s) = (dst.0, src.0);
        let stage = Stage::new(Opcode::Fold, Some(d), vec![s], move |ctx, lo, hi| {
            // Safety: tiles are disjoint and d != s.
            let out = unsafe { ctx.slice_mut(d, lo, hi) };
            let inp = unsafe { ctx.slice(s, lo, hi) };
            for (o, x) in out.iter_mut().zip(inp) {
                let prev = *o;
                op.apply(&prev, x, o);
            }
            Ok(())
        });
        self.enqueue(stage, n)?;
        Ok(())
    }

    /// Deferred out-of-place `dst[i] = x[i] ⊕ y[i]`.
    pub fn ewise_apply<Op>(
        &mut self,
        dst: VectorHandle,
        x: VectorHandle,
        y: VectorHandle,
        op: Op,
    ) -> AlpResult<()>
    where
        Op: BinaryOp<T, T, T> + Send + Sync + 'static,
    {
        self.ewise_apply_desc(dst, x, y, op, Descriptor::NO_OPERATION)
    }

    /// As [`ewise_apply`](LazyContext::ewise_apply); with
    /// [`Descriptor::DENSE`] set, an uninitialized input surfaces as
    /// `Illegal` when the pipeline flushes instead of silently marking
    /// the output uninitialized.
    pub fn ewise_apply_desc<Op>(
        &mut self,
        dst: VectorHandle,
        x: VectorHandle,
        y: VectorHandle,
        op: Op,
        desc: Descriptor,
    ) -> AlpResult<()>
    where
        Op: BinaryOp<T, T, T> + Send + Sync + 'static,
    {
        crate::ops::reject_unsupported_bits(desc)?;
        let n = self.same_len(dst, x)?;
        self.same_len(dst, y)?;
        if dst == x || dst == y {
            return Err(AlpError::illegal("output aliases an input"));
        }
        if !self.slot(x)?.initialized || !self.slot(y)?.initialized {
            if desc.contains(Descriptor::DENSE) {
                let stage = Stage::new(Opcode::EWise, Some(dst.0), vec![x.0, y.0], |_, _, _| {
                    Err(AlpError::illegal("dense descriptor on an uninitialized operand"))
                })
                .out_of_place()
                .dense(true);
                return self.enqueue(stage, n);
            }
            self.mark(dst, false);
            return Ok(());
        }
        let (d, xs, ys) = (dst.0, x.0, y.0);
        let stage = Stage::new(Opcode::EWise, Some(d), vec![xs, ys], move |ctx, lo, hi| {
            // Safety: tiles are disjoint and d aliases neither input.
            let out = unsafe { ctx.slice_mut(d, lo, hi) };
            let a = unsafe { ctx.slice(xs, lo, hi) };
            let b = unsafe { ctx.slice(ys, lo, hi) };
            for ((o, p), q) in out.iter_mut().zip(a).zip(b) {
                op.apply(p, q, o);
            }
            Ok(())
        })
        .out_of_place()
        .dense(desc.contains(Descriptor::DENSE));
        self.enqueue(stage, n)?;
        self.mark(dst, n > 0);
        Ok(())
    }

    /// Deferred `dst[i] = f(src[i])`.
    pub fn ewise_map<F>(&mut self, dst: VectorHandle, src: VectorHandle, f: F) -> AlpResult<()>
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        let n = self.same_len(dst, src)?;
        if dst == src {
            return Err(AlpError::illegal("output aliases an input"));
        }
        if !self.slot(src)?.initialized {
            self.mark(dst, false);
            return Ok(());
        }
        let (d, s) = (dst.0, src.0);
        let stage = Stage::new(Opcode::EWiseMap, Some(d), vec![s], move |ctx, lo, hi| {
            // Safety: tiles are disjoint and d != s.
            let out = unsafe { ctx.slice_mut(d, lo, hi) };
            let inp = unsafe { ctx.slice(s, lo, hi) };
            for (o, x) in out.iter_mut().zip(inp) {
                *o = f(*x);
            }
            Ok(())
        })
        .out_of_place();
        self.enqueue(stage, n)?;
        self.mark(dst, n > 0);
        Ok(())
    }

    /// Deferred in-place `x[i] = f(i, x[i])`.
    pub fn ewise_lambda<F>(&mut self, h: VectorHandle, f: F) -> AlpResult<()>
    where
        F: Fn(usize, T) -> T + Send + Sync + 'static,
    {
        let n = self.len_of(h)?;
        if !self.slot(h)?.initialized {
            return Ok(());
        }
        let id = h.0;
        let stage = Stage::new(Opcode::EWiseLambda, Some(id), Vec::new(), move |ctx, lo, hi| {
            // Safety: tiles are disjoint and `id` is this stage's only
            // container.
            let out = unsafe { ctx.slice_mut(id, lo, hi) };
            for (k, o) in out.iter_mut().enumerate() {
                *o = f(lo + k, *o);
            }
            Ok(())
        });
        self.enqueue(stage, n)
    }

    /// `Σ_i x[i] ⊗ conj(y[i])` under `ring`. A scalar leaves the
    /// deferred world, so the stage is enqueued and its pipeline
    /// flushed before returning.
    pub fn dot<AddOp, MulOp, AddId, MulId>(
        &mut self,
        x: VectorHandle,
        y: VectorHandle,
        ring: &Semiring<AddOp, MulOp, AddId, MulId>,
    ) -> AlpResult<T>
    where
        T: Conjugate,
        AddOp: BinaryOp<T, T, T> + Send + Sync + 'static,
        MulOp: BinaryOp<T, T, T> + Send + Sync + 'static,
        AddId: IdentityValue<T>,
    {
        self.same_len(x, y)?;
        if !self.slot(x)?.initialized || !self.slot(y)?.initialized {
            return Err(AlpError::illegal("reduction over an uninitialized container"));
        }
        let identity: T = ring.additive_monoid().identity();
        let add = ring.additive_monoid().operator();
        let mul = ring.multiplicative_operator();
        let acc = Arc::new(Mutex::new(identity));
        let tile_acc = Arc::clone(&acc);
        let (xs, ys) = (x.0, y.0);
        let n = self.len_of(x)?;
        let stage = Stage::new(Opcode::DotGeneric, None, vec![xs, ys], move |ctx, lo, hi| {
            // Safety: tiles are disjoint and both containers are only
            // read.
            let a = unsafe { ctx.slice(xs, lo, hi) };
            let b = unsafe { ctx.slice(ys, lo, hi) };
            let mut local = identity;
            for (p, q) in a.iter().zip(b) {
                let mut prod = identity;
                mul.apply(p, &q.conj(), &mut prod);
                let prev = local;
                add.apply(&prev, &prod, &mut local);
            }
            let mut total = tile_acc
                .lock()
                .map_err(|_| AlpError::Panic("poisoned reduction accumulator"))?;
            let prev = *total;
            add.apply(&prev, &local, &mut *total);
            Ok(())
        });
        self.enqueue(stage, n)?;
        self.flush_for(xs)?;
        let value = *acc.lock().map_err(|_| AlpError::Panic("poisoned reduction accumulator"))?;
        Ok(value)
    }

    /// `⊕_i x[i]` under `monoid`; flushes like
    /// [`dot`](LazyContext::dot).
    pub fn fold_scalar<Op, Id>(&mut self, x: VectorHandle, monoid: &Monoid<Op, Id>) -> AlpResult<T>
    where
        Op: BinaryOp<T, T, T> + Send + Sync + 'static,
        Id: IdentityValue<T>,
    {
        if !self.slot(x)?.initialized {
            return Err(AlpError::illegal("reduction over an uninitialized container"));
        }
        let identity: T = monoid.identity();
        let op = monoid.operator();
        let acc = Arc::new(Mutex::new(identity));
        let tile_acc = Arc::clone(&acc);
        let xs = x.0;
        let n = self.len_of(x)?;
        let stage = Stage::new(Opcode::Fold, None, vec![xs], move |ctx, lo, hi| {
            // Safety: tiles are disjoint and the container is only read.
            let a = unsafe { ctx.slice(xs, lo, hi) };
            let mut local = identity;
            for p in a {
                let prev = local;
                op.apply(&prev, p, &mut local);
            }
            let mut total = tile_acc
                .lock()
                .map_err(|_| AlpError::Panic("poisoned reduction accumulator"))?;
            let prev = *total;
            op.apply(&prev, &local, &mut *total);
            Ok(())
        });
        self.enqueue(stage, n)?;
        self.flush_for(xs)?;
        let value = *acc.lock().map_err(|_| AlpError::Panic("poisoned reduction accumulator"))?;
        Ok(value)
    }

    fn flush_for(&mut self, id: u64) -> AlpResult<()> {
        let ctx = Self::ctx(&mut self.store);
        self.sched.execution_for(id, &ctx)
    }

    /// Flushes the pipeline touching `h`; idempotent.
    pub fn wait_on(&mut self, h: VectorHandle) -> AlpResult<()> {
        self.slot(h)?;
        self.flush_for(h.0)
    }

    /// Flushes every pending pipeline; idempotent.
    pub fn wait(&mut self) -> AlpResult<()> {
        let ctx = Self::ctx(&mut self.store);
        self.sched.execution(&ctx)
    }

    /// Realized contents of `h`; flushes first.
    pub fn read(&mut self, h: VectorHandle) -> AlpResult<Vec<T>> {
        self.slot(h)?;
        self.flush_for(h.0)?;
        let slot = self.slot(h)?;
        if !slot.initialized {
            return Err(AlpError::illegal("read of an uninitialized container"));
        }
        Ok(slot.buf.clone())
    }
}
