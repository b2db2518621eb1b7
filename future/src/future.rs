//! The [`Future`] handle and its accessors.
//!
//! A future is shared between one producer (the launched closure, running on
//! a blocking thread of its [`Runtime`](crate::Runtime)) and any number of
//! readers. The producer publishes its outcome into a write-once slot and then
//! fires a broadcast signal; waiting readers wait on the signal and then read
//! the slot. The slot is published with release/acquire ordering, so a reader
//! that sees it written sees the whole outcome, and it never changes after.

use crate::park;
use crate::signal::Signal;
use crate::sync::spin::Once;
use crate::{Context, Error};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

struct Shared<T> {
    id: u64,
    slot: Once<Result<T, Error>>,
    signal: Signal,
}

impl<T> Shared<T> {
    fn resolve(&self, outcome: Result<T, Error>) {
        self.slot.call_once(|| outcome);
        self.signal.fire();
    }
}

/// The producer's half of a future.
///
/// Resolves the future with [`Error::Abandoned`] if dropped without completing,
/// which happens when the runtime discards the closure without running it.
struct Completer<T> {
    shared: Option<Arc<Shared<T>>>,
}

impl<T> Completer<T> {
    fn complete(mut self, outcome: Result<T, Error>) {
        if let Some(shared) = self.shared.take() {
            trace!(task = shared.id, "Task resolved");
            shared.resolve(outcome);
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(shared) = self.shared.take() {
            trace!(task = shared.id, "Task dropped before it ran");
            shared.resolve(Err(Error::Abandoned));
        }
    }
}

/// A handle to the eventual outcome of a launched closure.
///
/// Created by [`spawn()`](crate::spawn) or [`Runtime::spawn()`](crate::Runtime::spawn).
/// The closure starts running immediately on its own thread; the handle can be
/// cloned freely and every clone observes the same outcome.
///
/// Dropping every handle does not stop the closure: it runs to completion and
/// its result is discarded.
///
/// # Outcomes
///
/// - `Ok(&T)`: the closure returned a value
/// - `Err(Error::Panicked)`: the closure panicked
/// - `Err(Error::Abandoned)`: the runtime shut down before the closure ran
/// - `Err(Error::Cancelled)` / `Err(Error::DeadlineExceeded)`: only from the
///   cancellable accessors, when the [`Context`] fired first
///
/// # Blocking
///
/// [`wait()`](Future::wait) and [`wait_with_cancellation()`](Future::wait_with_cancellation)
/// park the calling thread without entering any runtime, so they work from any
/// thread and keep working after the launching [`Runtime`](crate::Runtime) has
/// shut down. Inside an async task they block that task's thread; prefer
/// [`resolved()`](Future::resolved) and
/// [`resolved_with_cancellation()`](Future::resolved_with_cancellation) there.
pub struct Future<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Future<T>
where
    T: Send + Sync + 'static,
{
    pub(crate) fn launch<F>(handle: &tokio::runtime::Handle, f: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::new(Shared {
            id,
            slot: Once::new(),
            signal: Signal::new(),
        });
        let completer = Completer {
            shared: Some(shared.clone()),
        };

        trace!(task = id, "Launching task");

        // Detached: the join handle is dropped and the closure keeps running
        handle.spawn_blocking(move || {
            let outcome = std::panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
                let e = Error::from_panic(payload);
                debug!(task = id, "{e}");
                e
            });
            completer.complete(outcome);
        });

        Self { shared }
    }
}

impl<T> Future<T> {
    /// Returns the process-unique id of this task, as used in log output.
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Returns `true` once the closure has finished.
    pub fn is_resolved(&self) -> bool {
        self.shared.slot.get().is_some()
    }

    /// Returns the outcome if the closure has finished, without blocking.
    pub fn try_get(&self) -> Option<Result<&T, Error>> {
        self.shared.slot.get().map(outcome)
    }

    /// Blocks until the closure finishes and returns its outcome.
    ///
    /// Never times out. Once the future is resolved this returns immediately.
    ///
    /// # Example
    ///
    /// ```no_run
    /// let task = async_future::spawn(|| 6 * 7);
    /// assert_eq!(task.wait(), Ok(&42));
    /// ```
    pub fn wait(&self) -> Result<&T, Error> {
        if let Some(outcome) = self.try_get() {
            return outcome;
        }
        park::block_on(self.resolved())
    }

    /// Blocks until the closure finishes or `ctx` fires, whichever is first.
    ///
    /// Returns [`Error::Cancelled`] or [`Error::DeadlineExceeded`] if `ctx`
    /// fired first. The closure itself is never interrupted, and a later wait
    /// can still return its outcome.
    ///
    /// If the future is already resolved its outcome is returned, even if
    /// `ctx` has already fired, and a closure finishing just as the deadline
    /// passes also wins.
    pub fn wait_with_cancellation(&self, ctx: &Context) -> Result<&T, Error> {
        if let Some(outcome) = self.try_get() {
            return outcome;
        }
        if let Some(reason) = ctx.err() {
            trace!(task = self.shared.id, "Wait ended before it started: {reason}");
            return Err(reason);
        }
        let waiting = async {
            tokio::select! {
                biased;
                outcome = self.resolved() => outcome,
                _ = ctx.cancel_token().cancelled() => Err(Error::Cancelled),
            }
        };
        let outcome = match ctx.deadline() {
            Some(deadline) => park::block_on_until(waiting, deadline).unwrap_or_else(|| {
                self.try_get().unwrap_or(Err(Error::DeadlineExceeded))
            }),
            None => park::block_on(waiting),
        };
        if let Err(reason @ (Error::Cancelled | Error::DeadlineExceeded)) = &outcome {
            trace!(task = self.shared.id, "Wait ended: {reason}");
        }
        outcome
    }

    /// Completes when the closure finishes, yielding its outcome.
    ///
    /// The asynchronous equivalent of [`wait()`](Future::wait).
    pub async fn resolved(&self) -> Result<&T, Error> {
        self.shared.signal.fired().await;

        // The signal fires only after the slot has been written
        outcome(self.shared.slot.wait())
    }

    /// Completes when the closure finishes or `ctx` fires, whichever is first.
    ///
    /// The asynchronous equivalent of
    /// [`wait_with_cancellation()`](Future::wait_with_cancellation). If both are
    /// ready at once, the closure's outcome wins.
    ///
    /// Waiting on a deadline requires a tokio runtime with time enabled.
    pub async fn resolved_with_cancellation(&self, ctx: &Context) -> Result<&T, Error> {
        tokio::select! {
            biased;
            outcome = self.resolved() => outcome,
            reason = ctx.done() => {
                trace!(task = self.shared.id, "Wait ended: {reason}");
                Err(reason)
            }
        }
    }
}

fn outcome<T>(outcome: &Result<T, Error>) -> Result<&T, Error> {
    outcome.as_ref().map_err(Clone::clone)
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T> core::fmt::Debug for Future<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Future")
            .field("id", &self.shared.id)
            .field("resolved", &self.is_resolved())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spawn;
    use core::time::Duration;
    use std::sync::mpsc;

    #[test]
    fn spawn_returns_before_completion() {
        let (tx, rx) = mpsc::channel::<()>();
        let task = spawn(move || {
            rx.recv().unwrap();
            "done"
        });

        assert!(!task.is_resolved());
        assert_eq!(task.try_get(), None);

        tx.send(()).unwrap();
        assert_eq!(task.wait(), Ok(&"done"));
        assert!(task.is_resolved());
        assert_eq!(task.try_get(), Some(Ok(&"done")));
    }

    #[test]
    fn panic_is_captured() {
        let task = spawn(|| -> i32 { panic!("boom") });

        assert_eq!(task.wait(), Err(Error::Panicked("boom".to_string())));
        // Every later waiter sees the same failure
        assert_eq!(
            task.wait_with_cancellation(&Context::new()),
            Err(Error::Panicked("boom".to_string()))
        );
    }

    #[test]
    fn cancelled_wait_leaves_future_resolvable() {
        let (tx, rx) = mpsc::channel::<()>();
        let task = spawn(move || {
            rx.recv().unwrap();
            7
        });

        let ctx = Context::new();
        ctx.cancel();
        assert_eq!(task.wait_with_cancellation(&ctx), Err(Error::Cancelled));

        let ctx = Context::new().with_timeout(time::Duration::milliseconds(5));
        assert_eq!(task.wait_with_cancellation(&ctx), Err(Error::DeadlineExceeded));
        assert!(!task.is_resolved());

        tx.send(()).unwrap();
        assert_eq!(task.wait(), Ok(&7));
    }

    #[test]
    fn resolved_outcome_beats_fired_context() {
        let task = spawn(|| 3);
        assert_eq!(task.wait(), Ok(&3));

        let ctx = Context::new();
        ctx.cancel();
        assert_eq!(task.wait_with_cancellation(&ctx), Ok(&3));
    }

    #[test]
    fn cancel_from_another_thread() {
        let (tx, rx) = mpsc::channel::<()>();
        let task = spawn(move || {
            rx.recv().unwrap();
            1
        });

        let ctx = Context::new();
        let canceller = ctx.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            canceller.cancel();
        });

        assert_eq!(task.wait_with_cancellation(&ctx), Err(Error::Cancelled));
        tx.send(()).unwrap();
        assert_eq!(task.wait(), Ok(&1));
    }

    #[test]
    fn nested_launch_and_wait() {
        let outer = spawn(|| {
            let inner = spawn(|| 20);
            inner.wait().map(|v| v + 1)
        });

        assert_eq!(outer.wait(), Ok(&Ok(21)));
    }

    #[test]
    fn clones_share_outcome() {
        let task = spawn(|| vec![1, 2, 3]);
        let other = task.clone();

        assert_eq!(other.id(), task.id());
        assert_eq!(task.wait(), Ok(&vec![1, 2, 3]));
        assert!(core::ptr::eq(task.wait().unwrap(), other.wait().unwrap()));
    }

    #[test]
    fn ids_are_unique() {
        let a = spawn(|| ());
        let b = spawn(|| ());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn debug_shows_state() {
        let task = spawn(|| 0u8);
        task.wait().unwrap();

        let s = format!("{task:?}");
        assert!(s.starts_with("Future"));
        assert!(s.contains(&format!("id: {}", task.id())));
        assert!(s.contains("resolved: true"));
    }

    #[tokio::test]
    async fn async_accessors() {
        let task = spawn(|| {
            std::thread::sleep(Duration::from_millis(20));
            "value"
        });

        let ctx = Context::new().with_timeout(time::Duration::milliseconds(1));
        assert_eq!(
            task.resolved_with_cancellation(&ctx).await,
            Err(Error::DeadlineExceeded)
        );

        assert_eq!(task.resolved().await, Ok(&"value"));
        assert_eq!(
            task.resolved_with_cancellation(&Context::new()).await,
            Ok(&"value")
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn blocking_wait_inside_async_context() {
        let (tx, rx) = mpsc::channel::<()>();
        let task = spawn(move || {
            rx.recv().unwrap();
            1
        });
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            tx.send(()).unwrap();
        });

        // Pending when the wait starts
        assert!(!task.is_resolved());
        assert_eq!(task.wait(), Ok(&1));

        let pending = spawn(|| {
            std::thread::sleep(Duration::from_millis(500));
            2
        });
        let ctx = Context::new().with_timeout(time::Duration::milliseconds(10));
        assert_eq!(
            pending.wait_with_cancellation(&ctx),
            Err(Error::DeadlineExceeded)
        );
    }

    #[test]
    fn is_resolved_agrees_with_try_get() {
        let task = spawn(|| {
            std::thread::sleep(Duration::from_millis(5));
            9
        });

        let start = std::time::Instant::now();
        loop {
            let got = task.try_get().is_some();
            let resolved = task.is_resolved();
            // Once a value is visible, the future reports resolved
            assert!(!got || resolved);
            if got {
                break;
            }
            assert!(start.elapsed() < Duration::from_secs(5));
            std::hint::spin_loop();
        }
        assert_eq!(task.try_get(), Some(Ok(&9)));
    }
}
