//! Spin-based synchronization primitives for O(1) operations.
//!
//! Use these only when:
//!
//! - All operations are O(1)
//! - No blocking, I/O, or syscalls happen while another thread may be spinning
//! - The value is published before anyone is told to look for it

/// A write-once cell with lock-free reads.
///
/// This is a thin wrapper around `spin::Once`. The write uses release ordering
/// and every read uses acquire ordering, so a reader that sees the value also
/// sees everything the writer did before publishing it.
///
/// # Usage Guidelines
///
/// [`wait()`](Once::wait) busy-waits. Only call it once some other
/// synchronization has already established that the value is published, or
/// when the initializer is known to be O(1).
#[derive(Debug, Default)]
pub struct Once<T>(spin::Once<T>);

impl<T> Once<T> {
    /// Creates a new, empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(spin::Once::new())
    }

    /// Initializes the cell with `f` if it is empty, and returns the stored value.
    ///
    /// Only the first call runs its initializer; later calls return the value
    /// stored by the first.
    #[inline]
    pub fn call_once<F: FnOnce() -> T>(&self, f: F) -> &T {
        self.0.call_once(f)
    }

    /// Returns the value if the cell has been initialized.
    #[inline]
    pub fn get(&self) -> Option<&T> {
        self.0.get()
    }

    /// Spins until the cell is initialized, then returns the value.
    #[inline]
    pub fn wait(&self) -> &T {
        self.0.wait()
    }
}
