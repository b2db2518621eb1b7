//! Cancellation contexts for bounding a wait.
//!
//! A [`Context`] combines a `tokio_util::sync::CancellationToken` with an
//! optional deadline. It fires when the token is cancelled (directly or via a
//! parent) or when the deadline passes, whichever happens first.
//!
//! # Example
//!
//! ```no_run
//! use async_future::{Context, Error};
//!
//! let task = async_future::spawn(|| {
//!     std::thread::sleep(std::time::Duration::from_secs(5));
//!     1
//! });
//!
//! let ctx = Context::new().with_timeout(time::Duration::milliseconds(10));
//! assert_eq!(task.wait_with_cancellation(&ctx), Err(Error::DeadlineExceeded));
//! ```

use crate::Error;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

/// A cancellation token with an optional deadline.
///
/// Cloning a `Context` yields a handle to the same token: cancelling any
/// clone cancels them all. Use [`child()`](Context::child) for a context that
/// can be cancelled independently of its parent.
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// Creates a new context with no deadline.
    ///
    /// It only fires if [`cancel()`](Context::cancel) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a child context.
    ///
    /// The child fires when the parent is cancelled, and inherits the parent's
    /// deadline. Cancelling the child does not affect the parent.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Sets the deadline to `timeout` from now.
    ///
    /// Zero or negative timeouts produce an already-expired context. An
    /// existing earlier deadline is kept; deadlines only ever tighten.
    pub fn with_timeout(self, timeout: time::Duration) -> Self {
        match crate::time::deadline_after(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Sets the deadline, unless the context already has an earlier one.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(current) => current.min(deadline),
            None => deadline,
        });
        self
    }

    /// Returns the deadline, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the underlying cancellation token.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Cancels this context and all of its children.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` if the context has been cancelled.
    ///
    /// This does not consider the deadline; see [`err()`](Context::err).
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns why the context has fired, or `None` if it has not.
    ///
    /// Cancellation is reported ahead of an expired deadline.
    pub fn err(&self) -> Option<Error> {
        if self.token.is_cancelled() {
            Some(Error::Cancelled)
        } else if self.deadline.is_some_and(|d| d <= Instant::now()) {
            Some(Error::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Returns `true` if the context has been cancelled or its deadline has passed.
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Completes when the context fires, yielding the reason.
    ///
    /// Waiting on a deadline requires a tokio runtime with time enabled.
    pub async fn done(&self) -> Error {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => Error::Cancelled,
                    _ = tokio::time::sleep_until(deadline.into()) => Error::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                Error::Cancelled
            }
        }
    }
}

impl From<CancellationToken> for Context {
    fn from(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }
}
