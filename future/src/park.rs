//! Drives a future to completion on the calling thread.
//!
//! The blocking accessors use this instead of a runtime's `block_on`: it needs
//! no runtime context, so it works from any thread (including inside an async
//! task, where it simply blocks that thread) and keeps working after the
//! runtime that launched the task has shut down. Deadlines are enforced with
//! `park_timeout`, not with a runtime timer.

use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll};
use std::sync::Arc;
use std::task::{Wake, Waker};
use std::thread::Thread;
use std::time::Instant;

/// Unparks the waiting thread when the future is woken.
struct ThreadWaker(Thread);

impl Wake for ThreadWaker {
    fn wake(self: Arc<Self>) {
        self.0.unpark();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.0.unpark();
    }
}

fn thread_waker() -> Waker {
    Arc::new(ThreadWaker(std::thread::current())).into()
}

/// Polls `future` on this thread until it completes.
pub(crate) fn block_on<F: Future>(future: F) -> F::Output {
    let mut future = pin!(future);
    let waker = thread_waker();
    let mut cx = Context::from_waker(&waker);

    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
        std::thread::park();
    }
}

/// Polls `future` on this thread until it completes or `deadline` passes.
///
/// Returns `None` if the deadline passed first.
pub(crate) fn block_on_until<F: Future>(future: F, deadline: Instant) -> Option<F::Output> {
    let mut future = pin!(future);
    let waker = thread_waker();
    let mut cx = Context::from_waker(&waker);

    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return Some(output);
        }

        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        // Spurious wake-ups just re-poll
        std::thread::park_timeout(deadline - now);
    }
}
