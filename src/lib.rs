//! Facade crate for the brook result bridge.
//!
//! Re-exports the member crates under stable module names: [`dispatch`] for
//! callback execution contexts and [`results`] for the demand-negotiated
//! result bridge itself.

pub use brook_dispatch_rs as dispatch;
pub use brook_results_rs as results;


/// Returns the version of this crate.
#[must_use]
pub fn crate_version() -> &'static str {
  env!("CARGO_PKG_VERSION")
}
