//! One-shot broadcast event marking a future as resolved.
//!
//! [`Signal`] wraps a `tokio::sync::watch` channel holding a single `bool`.
//! Unlike `tokio::sync::Notify`, which hands a stored permit to one waiter, a
//! watch channel is observed by every receiver, so any number of waiters can
//! see the same firing, whether they started waiting before or after it.

/// A one-shot event observable by any number of waiters.
///
/// Once [`fire()`](Signal::fire) has been called the signal stays fired and
/// [`fired()`](Signal::fired) completes immediately.
#[derive(Debug)]
pub(crate) struct Signal(tokio::sync::watch::Sender<bool>);

impl Signal {
    /// Creates a new, unfired signal.
    pub fn new() -> Self {
        Self(tokio::sync::watch::Sender::new(false))
    }

    /// Fires the signal, waking all current waiters.
    ///
    /// Writes made before this call are visible to any thread that observes
    /// the signal as fired.
    pub fn fire(&self) {
        self.0.send_replace(true);
    }

    /// Completes once the signal has fired.
    pub async fn fired(&self) {
        let mut rx = self.0.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait
        let _ = rx.wait_for(|fired| *fired).await;
    }
}
