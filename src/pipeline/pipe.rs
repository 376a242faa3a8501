//! A fused pipeline: an ordered stage sequence over one shared index
//! range, flushed tile by tile.

use std::collections::BTreeSet;

use log::trace;

use crate::config::TilingOptions;
use crate::error::AlpResult;

use super::stage::{Stage, StageCtx};

/// Stages that touch overlapping container sets, executed together so
/// each tile of every container is visited once while hot.
pub struct Pipeline<T> {
    stages: Vec<Stage<T>>,
    containers_size: usize,
    size_of_data_type: usize,
    input_ids: BTreeSet<u64>,
    output_ids: BTreeSet<u64>,
    contains_out_of_place: bool,
    tiling: TilingOptions,
}

impl<T> Pipeline<T> {
    pub fn new(tiling: TilingOptions) -> Self {
        Pipeline {
            stages: Vec::new(),
            containers_size: 0,
            size_of_data_type: size_of::<T>(),
            input_ids: BTreeSet::new(),
            output_ids: BTreeSet::new(),
            contains_out_of_place: false,
            tiling,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Shared index range of every container in the pipeline.
    pub fn size(&self) -> usize {
        self.containers_size
    }

    pub fn accesses_input(&self, id: u64) -> bool {
        self.input_ids.contains(&id)
    }

    pub fn accesses_output(&self, id: u64) -> bool {
        self.output_ids.contains(&id)
    }

    pub fn accesses(&self, id: u64) -> bool {
        self.accesses_input(id) || self.accesses_output(id)
    }

    /// Whether the stage's accessed set intersects this pipeline's.
    pub(crate) fn shares_data_with(&self, stage: &Stage<T>) -> bool {
        stage.accessed().any(|id| self.accesses(id))
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.input_ids.union(&self.output_ids).copied()
    }

    /// Appends a stage. All containers of one pipeline share a single
    /// range length; the scheduler flushes before mixing lengths.
    pub(crate) fn add_stage(&mut self, stage: Stage<T>, n: usize) {
        debug_assert!(self.stages.is_empty() || self.containers_size == n);
        self.containers_size = n;
        if let Some(out) = stage.output {
            self.output_ids.insert(out);
        }
        self.input_ids.extend(stage.inputs.iter().copied());
        self.contains_out_of_place |= stage.out_of_place;
        self.stages.push(stage);
    }

    /// Drains `other` into `self`, keeping insertion order.
    pub(crate) fn merge(&mut self, other: &mut Pipeline<T>) {
        debug_assert!(other.is_empty() || self.is_empty() || self.containers_size == other.containers_size);
        self.containers_size = self.containers_size.max(other.containers_size);
        self.size_of_data_type = self.size_of_data_type.max(other.size_of_data_type);
        self.input_ids.append(&mut other.input_ids);
        self.output_ids.append(&mut other.output_ids);
        self.contains_out_of_place |= other.contains_out_of_place;
        self.stages.append(&mut other.stages);
        other.clear();
    }

    pub(crate) fn clear(&mut self) {
        self.stages.clear();
        self.containers_size = 0;
        self.input_ids.clear();
        self.output_ids.clear();
        self.contains_out_of_place = false;
    }

    fn run_tile(&self, ctx: &StageCtx<'_, T>, lo: usize, hi: usize) -> AlpResult<()> {
        // first error wins and skips the tile's remaining stages
        for stage in &self.stages {
            (stage.run)(ctx, lo, hi)?;
        }
        Ok(())
    }

    /// Flushes the pipeline: tiles `[0, n)` and runs every stage in
    /// insertion order per tile. The pipeline is cleared afterwards,
    /// error or not; partially executed tiles are not rolled back.
    pub(crate) fn execution(&mut self, ctx: &StageCtx<'_, T>) -> AlpResult<()>
    where
        T: Send + Sync,
    {
        if self.stages.is_empty() {
            return Ok(());
        }
        let n = self.containers_size;
        let num_accessed = self.ids().count();
        let tile = self.tiling.tile_size(n, num_accessed, self.size_of_data_type);
        let tiles = self.tiling.tile_bounds(n, tile);
        trace!(
            "flushing pipeline: {} stages over {} elements in {} tiles",
            self.stages.len(),
            n,
            tiles.len()
        );

        #[cfg(feature = "rayon")]
        let result = {
            use rayon::prelude::*;
            tiles.par_iter().try_for_each(|&(lo, hi)| self.run_tile(ctx, lo, hi))
        };
        #[cfg(not(feature = "rayon"))]
        let result = tiles.iter().try_for_each(|&(lo, hi)| self.run_tile(ctx, lo, hi));

        self.clear();
        result
    }
}

impl<T> std::fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .field("size", &self.containers_size)
            .field("inputs", &self.input_ids)
            .field("outputs", &self.output_ids)
            .field("out_of_place", &self.contains_out_of_place)
            .finish()
    }
}
