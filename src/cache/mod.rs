//! Lazy kernel row cache
//!
//! The solver walks the kernel matrix one row at a time and never needs the
//! full N x N matrix at once. This module computes rows on demand and keeps
//! the most recently used ones in an LRU cache, so repeated working pairs do
//! not recompute their rows.

use crate::core::TrainingSet;
use crate::kernel::Kernel;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

/// On-demand kernel row provider backed by an LRU cache.
///
/// Row i holds K(x_i, x_t) for every training example t. Rows are shared via
/// `Arc` so the solver can hold two rows from the same cache at once.
pub struct KernelRowCache<'a, K: Kernel> {
    kernel: &'a K,
    data: &'a TrainingSet,
    cache: LruCache<usize, Arc<Vec<f64>>>,
    hits: u64,
    misses: u64,
}

impl<'a, K: Kernel> KernelRowCache<'a, K> {
    /// Create a cache holding at most `capacity` rows
    pub fn new(kernel: &'a K, data: &'a TrainingSet, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            kernel,
            data,
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Get kernel row i, computing it if not cached
    pub fn row(&mut self, i: usize) -> Arc<Vec<f64>> {
        if let Some(row) = self.cache.get(&i) {
            self.hits += 1;
            return Arc::clone(row);
        }

        self.misses += 1;
        let x_i = self.data.row(i);
        let row: Vec<f64> = (0..self.data.len())
            .map(|t| self.kernel.compute(x_i, self.data.row(t)))
            .collect();
        let row = Arc::new(row);
        self.cache.put(i, Arc::clone(&row));
        row
    }

    /// Diagonal entry K(x_i, x_i) without materializing a row
    pub fn diagonal(&self, i: usize) -> f64 {
        let x_i = self.data.row(i);
        self.kernel.compute(x_i, x_i)
    }

    /// Cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            len: self.cache.len(),
        }
    }
}

/// Cache hit/miss statistics
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

impl CacheStats {
    /// Hit rate in [0, 1]; zero when no lookups were made
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
