//! The runtime that launched closures run on.
//!
//! [`Runtime`] wraps a multi-thread tokio runtime. Launched closures run on its
//! blocking-thread pool, one thread per closure. Waiting on a [`Future`] does
//! not need the runtime, so futures stay usable after it shuts down.
//!
//! Most callers use the process-wide [`default_runtime()`] through
//! [`spawn()`]. A dedicated runtime is useful to name threads or to bound the
//! number of concurrent closures (see [`Config`]).
//!
//! # Example
//!
//! ```no_run
//! use async_future::{Config, Runtime};
//!
//! let runtime = Runtime::new(&Config::default().with_thread_name("fetch")).unwrap();
//! let task = runtime.spawn(|| "result");
//! assert_eq!(task.wait(), Ok(&"result"));
//! ```

use crate::{Config, Future};
use std::sync::OnceLock;
use trace_err::*;
use tracing::debug;

// tokio adds the worker count to the blocking thread limit
const UNBOUNDED_BLOCKING_THREADS: usize = usize::MAX >> 1;

static DEFAULT_RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// A runtime for launching closures as [`Future`]s.
///
/// Dropping a `Runtime` blocks until every running closure has returned; use
/// [`shutdown_timeout()`](Runtime::shutdown_timeout) to bound that. It must not
/// be dropped from within an asynchronous execution context.
#[derive(Debug)]
pub struct Runtime {
    inner: tokio::runtime::Runtime,
}

impl Runtime {
    /// Builds and starts a runtime.
    pub fn new(config: &Config) -> std::io::Result<Self> {
        let inner = tokio::runtime::Builder::new_multi_thread()
            .enable_time()
            .thread_name(config.thread_name.clone())
            .worker_threads(config.worker_threads.get())
            .max_blocking_threads(
                config
                    .max_blocking_threads
                    .map_or(UNBOUNDED_BLOCKING_THREADS, |n| n.get()),
            )
            .build()?;

        debug!(
            thread_name = %config.thread_name,
            worker_threads = config.worker_threads.get(),
            max_blocking_threads = ?config.max_blocking_threads,
            "Runtime started"
        );

        Ok(Self { inner })
    }

    /// Starts `f` on a thread of its own and returns a handle to its outcome.
    ///
    /// Returns immediately, before `f` has necessarily started.
    ///
    /// # Panics
    ///
    /// Panics if the OS cannot start a new thread.
    pub fn spawn<F, T>(&self, f: F) -> Future<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + Sync + 'static,
    {
        Future::launch(self.inner.handle(), f)
    }

    /// Shuts the runtime down, waiting at most `timeout` for running closures.
    ///
    /// Closures still running after the timeout are left to finish on their
    /// own threads. A closure the runtime discards without running resolves
    /// its future to [`Error::Abandoned`](crate::Error::Abandoned).
    pub fn shutdown_timeout(self, timeout: time::Duration) {
        debug!("Runtime shutting down");
        self.inner.shutdown_timeout(crate::time::to_std(timeout));
    }
}

/// Returns the process-wide runtime, starting it on first use.
///
/// The default runtime is built from [`Config::default()`] and is never shut
/// down.
///
/// # Panics
///
/// Panics if the runtime cannot be started.
pub fn default_runtime() -> &'static Runtime {
    DEFAULT_RUNTIME.get_or_init(|| {
        Runtime::new(&Config::default()).trace_expect("Failed to start the default runtime")
    })
}

/// Starts `f` on a thread of its own and returns a handle to its outcome.
///
/// Uses the [`default_runtime()`]. Returns immediately, before `f` has
/// necessarily started.
///
/// # Example
///
/// ```no_run
/// let task = async_future::spawn(|| {
///     // Some short, parallelizable work
///     1 + 1
/// });
///
/// // Do other work, then collect the result
/// assert_eq!(task.wait(), Ok(&2));
/// ```
pub fn spawn<F, T>(f: F) -> Future<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + Sync + 'static,
{
    default_runtime().spawn(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, Error};
    use core::num::NonZeroUsize;
    use core::time::Duration;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn wait_until_resolved<T>(task: &Future<T>) {
        let start = std::time::Instant::now();
        while !task.is_resolved() {
            assert!(start.elapsed() < Duration::from_secs(5), "task never resolved");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn explicit_runtime() {
        let runtime = Runtime::new(&Config::default().with_thread_name("explicit")).unwrap();

        let task = runtime.spawn(|| std::thread::current().name().map(str::to_string));
        assert_eq!(task.wait(), Ok(&Some("explicit".to_string())));

        runtime.shutdown_timeout(time::Duration::seconds(1));
    }

    #[test]
    fn default_runtime_is_shared() {
        assert!(core::ptr::eq(default_runtime(), default_runtime()));
    }

    #[test]
    fn bounded_runtime_limits_concurrency() {
        let runtime = Runtime::new(
            &Config::default().with_max_blocking_threads(NonZeroUsize::new(2).unwrap()),
        )
        .unwrap();
        let concurrent = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let concurrent = concurrent.clone();
                let max_concurrent = max_concurrent.clone();
                runtime.spawn(move || {
                    let current = concurrent.fetch_add(1, Ordering::SeqCst) + 1;
                    max_concurrent.fetch_max(current, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(10));
                    concurrent.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for task in &tasks {
            task.wait().unwrap();
        }

        assert!(max_concurrent.load(Ordering::SeqCst) <= 2);
        runtime.shutdown_timeout(time::Duration::seconds(1));
    }

    #[test]
    fn waits_outlive_runtime_shutdown() {
        let runtime = Runtime::new(&Config::default()).unwrap();
        let task = runtime.spawn(|| {
            std::thread::sleep(Duration::from_millis(300));
            5
        });
        runtime.shutdown_timeout(time::Duration::milliseconds(10));

        // The closure is still running on its own thread
        let ctx = Context::new().with_timeout(time::Duration::milliseconds(10));
        assert_eq!(task.wait_with_cancellation(&ctx), Err(Error::DeadlineExceeded));

        let ctx = Context::new().with_timeout(time::Duration::seconds(2));
        assert_eq!(task.wait_with_cancellation(&ctx), Ok(&5));
        assert_eq!(task.wait(), Ok(&5));
    }

    #[test]
    fn launch_after_shutdown_is_abandoned() {
        let runtime = Runtime::new(&Config::default()).unwrap();
        let handle = runtime.inner.handle().clone();
        runtime.shutdown_timeout(time::Duration::seconds(1));

        let task = Future::launch(&handle, || 1);
        wait_until_resolved(&task);
        assert_eq!(task.try_get(), Some(Err(Error::Abandoned)));
    }
}
