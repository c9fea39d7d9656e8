//! Worker pool handle and cancellation flag.
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Errors raised while building an execution context.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecError {
    /// Thread count must be at least one.
    InvalidThreadCount { threads: usize },
    /// Wrapper for `rayon::ThreadPoolBuildError`.
    PoolBuild { text: String },
}

impl std::error::Error for ExecError {}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecError::InvalidThreadCount { threads } => {
                write!(f, "Invalid thread count {threads}: must be at least 1")
            }
            ExecError::PoolBuild { text } => write!(f, "Failed to build worker pool: {text}"),
        }
    }
}

/// Shared cooperative cancellation flag.
///
/// Cloning shares the underlying flag; cancelling any clone cancels all of
/// them. Once set the flag stays set.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// ExecContext — explicitly injected executor for data-parallel work.
///
/// Purpose
/// -------
/// Own a fixed-size worker pool and a [`CancelFlag`]. Measurement strategies,
/// bootstrap resampling and the local Hölder map all run their fork-join
/// sections through [`ExecContext::install`].
///
/// Notes
/// -----
/// - Cloning is cheap: the pool is reference counted and the flag is shared.
/// - A context built with [`ExecContext::sequential`] runs everything on a
///   single worker, which is handy in tests that compare against a
///   multi-threaded run.
#[derive(Debug, Clone)]
pub struct ExecContext {
    pool: Arc<ThreadPool>,
    cancel: CancelFlag,
}

impl ExecContext {
    /// Build a context with `threads` workers and a fresh cancel flag.
    ///
    /// # Errors
    /// - [`ExecError::InvalidThreadCount`] when `threads == 0`.
    /// - [`ExecError::PoolBuild`] when rayon refuses to build the pool.
    pub fn new(threads: usize) -> Result<Self, ExecError> {
        if threads == 0 {
            return Err(ExecError::InvalidThreadCount { threads });
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("fractal-worker-{i}"))
            .build()
            .map_err(|e| ExecError::PoolBuild { text: e.to_string() })?;
        Ok(Self { pool: Arc::new(pool), cancel: CancelFlag::new() })
    }

    /// Single-worker context.
    pub fn sequential() -> Result<Self, ExecError> {
        Self::new(1)
    }

    /// Wrap an existing pool, e.g. one shared with the host application.
    pub fn with_pool(pool: Arc<ThreadPool>) -> Self {
        Self { pool, cancel: CancelFlag::new() }
    }

    /// Replace the cancel flag, keeping the pool.
    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Run `op` inside the owned pool; rayon parallel iterators used by `op`
    /// execute on this pool's workers.
    pub fn install<R, OP>(&self, op: OP) -> R
    where
        OP: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(op)
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn cancel_flag(&self) -> &CancelFlag {
        &self.cancel
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    // Purpose
    // -------
    // A zero-sized pool is a configuration error, not a panic.
    fn exec_context_rejects_zero_threads() {
        let err = ExecContext::new(0).unwrap_err();
        assert_eq!(err, ExecError::InvalidThreadCount { threads: 0 });
    }

    #[test]
    // Purpose
    // -------
    // Work installed on the context runs on its pool and the thread count
    // is reported back.
    fn exec_context_installs_parallel_work() {
        let ctx = ExecContext::new(2).expect("pool should build");
        let total: u64 = ctx.install(|| (1..=100u64).into_par_iter().sum());
        assert_eq!(total, 5050);
        assert_eq!(ctx.threads(), 2);
    }

    #[test]
    // Purpose
    // -------
    // Cancelling a clone of the flag is visible through the context.
    fn cancel_flag_is_shared_between_clones() {
        let flag = CancelFlag::new();
        let ctx = ExecContext::sequential().expect("pool should build").with_cancel(flag.clone());
        assert!(!ctx.is_cancelled());
        flag.cancel();
        assert!(ctx.is_cancelled());
    }
}
