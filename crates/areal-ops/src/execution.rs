//! Sequential or rayon-backed scheduling of per-feature work

use std::sync::OnceLock;

use areal_core::config::ExecutionMode;
use areal_core::error::{ArealError, Result};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Strategy for mapping a function over feature indices.
///
/// Results always come back in index order regardless of scheduling.
pub trait ParallelStrategy {
    /// Map a fallible function over `0..len`
    fn try_map<T, F>(&self, len: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync + Send;

    /// Map an infallible function over `0..len`
    fn map<T, F>(&self, len: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        self.try_map(len, |i| Ok(f(i)))
    }
}

/// Runs work under an `ExecutionMode`.
///
/// `ParallelWith` gets a dedicated pool, built on first use and kept for
/// every later call.
#[derive(Debug)]
pub struct Executor {
    mode: ExecutionMode,
    pool: OnceLock<ThreadPool>,
}

impl Executor {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode, pool: OnceLock::new() }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    fn dedicated_pool(&self, threads: usize) -> Result<&ThreadPool> {
        if let Some(pool) = self.pool.get() {
            return Ok(pool);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| ArealError::ConfigInvalid {
                key: "threads".to_string(),
                reason: format!("Failed to build thread pool: {}", e),
            })?;
        tracing::debug!(threads, "Built dedicated thread pool");

        // Keeps the first pool if another caller raced ahead
        Ok(self.pool.get_or_init(|| pool))
    }
}

impl ParallelStrategy for Executor {
    fn try_map<T, F>(&self, len: usize, f: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Sync + Send,
    {
        match self.mode {
            ExecutionMode::Sequential => (0..len).map(f).collect(),
            ExecutionMode::Parallel => (0..len).into_par_iter().map(f).collect(),
            ExecutionMode::ParallelWith(threads) => {
                let pool = self.dedicated_pool(threads)?;
                pool.install(|| (0..len).into_par_iter().map(f).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_is_preserved() {
        for mode in [
            ExecutionMode::Sequential,
            ExecutionMode::Parallel,
            ExecutionMode::ParallelWith(3),
        ] {
            let squares = Executor::new(mode).map(100, |i| i * i).unwrap();
            assert_eq!(squares, (0..100).map(|i| i * i).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_errors_propagate() {
        for mode in [
            ExecutionMode::Sequential,
            ExecutionMode::Parallel,
            ExecutionMode::ParallelWith(2),
        ] {
            let result: Result<Vec<usize>> = Executor::new(mode).try_map(10, |i| {
                if i == 7 {
                    Err(ArealError::MissingField { field: "v".to_string() })
                } else {
                    Ok(i)
                }
            });
            assert!(matches!(result, Err(ArealError::MissingField { .. })));
        }
    }

    #[test]
    fn test_empty_range() {
        let out: Vec<usize> = Executor::new(ExecutionMode::Parallel).map(0, |i| i).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_dedicated_pool_is_reused() {
        let executor = Executor::new(ExecutionMode::ParallelWith(2));
        assert!(executor.pool.get().is_none());

        let sizes = executor.map(8, |_| rayon::current_num_threads()).unwrap();
        assert!(sizes.iter().all(|&n| n == 2));
        let first = executor.pool.get().map(|pool| pool as *const ThreadPool);
        assert!(first.is_some());

        executor.map(8, |i| i).unwrap();
        let second = executor.pool.get().map(|pool| pool as *const ThreadPool);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sequential_builds_no_pool() {
        let executor = Executor::new(ExecutionMode::Sequential);
        executor.map(4, |i| i).unwrap();
        assert!(executor.pool.get().is_none());
    }
}
