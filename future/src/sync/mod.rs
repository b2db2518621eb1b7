//! Synchronization primitives with platform-appropriate implementations.
//!
//! # Submodules
//!
//! - [`spin`] - Spin-based primitives for O(1) operations on hot paths
//!
//! # Choosing the Right Primitive
//!
//! | Use Case | Primitive |
//! |----------|-----------|
//! | Write-once value, lock-free reads | [`spin::Once`] |
//! | Waiting for an event that may take long | the crate-internal completion `Signal` |

pub mod spin;
