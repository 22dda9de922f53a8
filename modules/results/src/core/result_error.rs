//! Result bridge error definitions.

use crate::core::source_error::SourceError;

/// Errors produced by the result bridge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResultError {
  /// Demand request is invalid.
  #[error("demand request must be greater than zero")]
  InvalidDemand,
  /// A configuration argument is invalid.
  #[error("{name} must be greater than zero")]
  InvalidArgument {
    /// Name of the offending argument.
    name: &'static str,
  },
  /// The row source already has a consumer attached.
  #[error("row source already attached")]
  AlreadyAttached,
  /// The row source failed while producing.
  #[error("row source failed: {0}")]
  Source(#[from] SourceError),
  /// A row transform failed.
  #[error("row transform failed: {0}")]
  Transform(SourceError),
}
