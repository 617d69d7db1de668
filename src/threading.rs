use std::sync::OnceLock;

use crate::env::{env_string, parse_thread_count, NUM_THREADS_VAR};

/// A wrapper around the Rayon thread pool used by the parallel engine.
///
/// If the pool could not be created, operations run directly on the calling
/// thread.
pub struct ThreadPool {
    /// The wrapped thread pool, or None if we failed to construct one.
    pool: Option<rayon::ThreadPool>,
}

impl ThreadPool {
    /// Run a function in the thread pool.
    ///
    /// This corresponds to [`rayon::ThreadPool::install`], except when the
    /// pool failed to start, in which case `op` runs directly.
    pub fn run<R: Send, Op: FnOnce() -> R + Send>(&self, op: Op) -> R {
        if let Some(pool) = self.pool.as_ref() {
            pool.install(op)
        } else {
            op()
        }
    }

    /// Create a thread pool with a given number of threads.
    pub fn with_num_threads(num_threads: usize) -> ThreadPool {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("ndkit-{}", index))
            .build();

        if let Err(err) = &pool {
            log::warn!("Failed to create thread pool: {}", err);
        }
        ThreadPool { pool: pool.ok() }
    }

    /// Return the number of threads in the pool, or 1 if running on the
    /// calling thread.
    pub fn num_threads(&self) -> usize {
        self.pool
            .as_ref()
            .map(|pool| pool.current_num_threads())
            .unwrap_or(1)
    }
}

/// Return the optimal number of threads for compute-bound work.
fn optimal_core_count() -> usize {
    num_cpus::get_physical().max(1)
}

/// Return the [Rayon][rayon] thread pool used by the parallel engine.
///
/// This differs from Rayon's default global thread pool in that it chooses a
/// thread count based on the number of physical rather than logical cores.
///
/// The thread count can be overridden at the process level by setting the
/// `NDKIT_NUM_THREADS` environment variable, whose value is clamped to
/// between 1 and the logical core count.
///
/// [rayon]: https://github.com/rayon-rs/rayon
pub fn thread_pool() -> &'static ThreadPool {
    static THREAD_POOL: OnceLock<ThreadPool> = OnceLock::new();
    THREAD_POOL.get_or_init(|| {
        let num_threads = env_string(NUM_THREADS_VAR)
            .and_then(|threads| parse_thread_count(&threads, num_cpus::get()))
            .unwrap_or_else(optimal_core_count);
        log::debug!("Creating thread pool with {} threads", num_threads);
        ThreadPool::with_num_threads(num_threads)
    })
}
