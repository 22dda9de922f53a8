//! Callback dispatch contexts for the brook result bridge.
//!
//! Result callbacks cross from producer threads into a caller-owned,
//! single-threaded execution context. The [`core::CallbackExecutor`] trait is
//! that seam; `core` ships deterministic executors for tests and demos, and
//! `std` ships the Tokio-backed executor used in production.

pub mod core;
pub mod std;
