use core::num::NonZeroUsize;

/// Configuration for a [`Runtime`](crate::Runtime).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Name given to every thread the runtime starts.
    pub thread_name: String,
    /// Number of runtime worker threads.
    ///
    /// Launched closures do not run on these threads, so one is usually enough.
    pub worker_threads: NonZeroUsize,
    /// Upper bound on the threads running launched closures.
    ///
    /// If `None`, every launch gets a thread of its own. With a bound, launches
    /// beyond it queue until a thread becomes free.
    pub max_blocking_threads: Option<NonZeroUsize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thread_name: "async-future".to_string(),
            worker_threads: NonZeroUsize::MIN,
            max_blocking_threads: None,
        }
    }
}

impl Config {
    /// Set the thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the number of timer/driver threads.
    pub fn with_worker_threads(mut self, threads: NonZeroUsize) -> Self {
        self.worker_threads = threads;
        self
    }

    /// Bound the number of threads running launched closures.
    pub fn with_max_blocking_threads(mut self, threads: NonZeroUsize) -> Self {
        self.max_blocking_threads = Some(threads);
        self
    }
}
