//! Outcomes of a [`Future`](crate::Future) other than a produced value.

/// Why an accessor did not return the task's value.
///
/// Task failures (`Panicked`, `Abandoned`) are terminal: they are stored in the
/// future and every waiter observes the same error. Cancellation errors
/// (`Cancelled`, `DeadlineExceeded`) only describe a single wait; the future is
/// left untouched and a later wait can still return the value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The launched closure panicked; carries the panic message.
    #[error("Task panicked: {0}")]
    Panicked(String),
    /// The runtime dropped the closure before it ran.
    #[error("Task was abandoned before it could run")]
    Abandoned,
    /// The wait's context was cancelled.
    #[error("Wait cancelled")]
    Cancelled,
    /// The wait's context deadline passed.
    #[error("Wait deadline exceeded")]
    DeadlineExceeded,
}

impl Error {
    /// Returns `true` if this error ended a wait rather than the task.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Error::Cancelled | Error::DeadlineExceeded)
    }

    pub(crate) fn from_panic(payload: Box<dyn core::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Error::Panicked(message)
    }
}
