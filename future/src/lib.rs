//! Launch a closure on its own thread now, collect its result later.
//!
//! This crate provides a minimal future/promise: [`spawn()`] starts a closure
//! running in parallel and immediately returns a [`Future`]. The caller goes on
//! with other work and later blocks on [`Future::wait()`] for the result, or on
//! [`Future::wait_with_cancellation()`] to give up when a [`Context`] is
//! cancelled or its deadline passes.
//!
//! It is meant for running a handful of short tasks in parallel, such as
//! several independent requests. It is not a job system: there is no queue,
//! no retry, and cancelling a wait never stops the closure itself.
//!
//! # Features
//!
//! - **Future**: write-once result, broadcast to any number of waiters
//! - **Context**: cancellation token with an optional deadline
//! - **Runtime**: configurable runtime closures are launched on
//! - **spawn!**: launch inside a tracing span
//!
//! # Example
//!
//! ```no_run
//! use async_future::{Context, Error};
//!
//! let task = async_future::spawn(|| {
//!     std::thread::sleep(std::time::Duration::from_millis(50));
//!     1
//! });
//!
//! // Give up waiting after 10ms; the task keeps running
//! let ctx = Context::new().with_timeout(time::Duration::milliseconds(10));
//! assert_eq!(task.wait_with_cancellation(&ctx), Err(Error::DeadlineExceeded));
//!
//! // Wait for real
//! assert_eq!(task.wait(), Ok(&1));
//! ```
//!
//! # Failures
//!
//! A panic in the closure is caught on its thread and delivered to every
//! waiter as [`Error::Panicked`]; it never takes the process down.

mod spawn;

pub mod config;
pub mod context;
pub mod error;
pub mod future;
pub mod runtime;

mod park;
mod signal;
mod sync;
mod time;

// Re-export commonly used types at crate root
pub use config::Config;
pub use context::Context;
pub use error::Error;
pub use future::Future;
pub use runtime::{Runtime, default_runtime, spawn};

#[doc(hidden)]
pub mod __private {
    pub use tracing;
}
