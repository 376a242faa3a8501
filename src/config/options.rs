//! Capacity and tiling options for the deferred pipeline.
//!
//! The defaults reserve enough room that typical programs never reallocate
//! scheduler state at run time. Exceeding a capacity is not an error; the
//! scheduler grows and emits a one-time warning through `log`.

/// Capacity limits for the lazy-evaluation scheduler.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Number of pipeline slots reserved up front.
    pub max_pipelines: usize,
    /// Stages reserved per pipeline.
    pub max_depth: usize,
    /// Distinct containers expected per pipeline.
    pub max_containers: usize,
    /// Tile-bound slots reserved per pipeline.
    pub max_tiles: usize,
    /// Emit a one-time warning when any of the above is exceeded.
    pub warn_if_exceeded: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        PipelineOptions {
            max_pipelines: 4,
            max_depth: 16,
            max_containers: 16,
            max_tiles: 1 << 16,
            warn_if_exceeded: true,
        }
    }
}

/// Parameters of the tile-size model applied at flush.
///
/// A tile should keep one stripe of every accessed container resident in L1
/// while being large enough to amortize per-tile bookkeeping.
#[derive(Debug, Clone)]
pub struct TilingOptions {
    /// Smallest tile the model may select on its own.
    pub min_tile_size: usize,
    /// Assumed per-core L1 data cache, in bytes.
    pub l1_cache_bytes: usize,
    /// Fraction of L1 the model is allowed to budget.
    pub l1_usage: f64,
}

impl Default for TilingOptions {
    fn default() -> Self {
        TilingOptions {
            min_tile_size: 512,
            l1_cache_bytes: 32 * 1024,
            l1_usage: 0.98,
        }
    }
}

impl TilingOptions {
    /// Number of worker threads available for a flush.
    pub fn threads() -> usize {
        #[cfg(feature = "rayon")]
        {
            num_cpus::get()
        }
        #[cfg(not(feature = "rayon"))]
        {
            1
        }
    }

    /// Pick a tile size for `n` elements when a flush touches
    /// `num_accessed` containers of `elem_size`-byte elements.
    pub fn tile_size(&self, n: usize, num_accessed: usize, elem_size: usize) -> usize {
        if n == 0 {
            return 1;
        }
        let budget = (self.l1_cache_bytes as f64 * self.l1_usage) as usize;
        let per_index = (num_accessed * elem_size).max(1);
        let from_cache = (budget / per_index).max(self.min_tile_size);
        // never choose fewer tiles than threads on large inputs
        let threads = Self::threads().max(1);
        let per_thread = n.div_ceil(threads);
        from_cache.min(per_thread).clamp(1, n)
    }

    /// Tile bounds `[lo, hi)` partitioning `[0, n)` into contiguous ranges.
    pub fn tile_bounds(&self, n: usize, tile: usize) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(n.div_ceil(tile.max(1)));
        let mut lo = 0;
        while lo < n {
            let hi = (lo + tile).min(n);
            out.push((lo, hi));
            lo = hi;
        }
        out
    }
}
