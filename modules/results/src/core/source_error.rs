use std::sync::Arc;

/// Failure reported by a row source or a row transform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SourceError {
  message: Arc<str>,
}

impl SourceError {
  /// Creates a new failure with the provided message.
  #[must_use]
  pub fn new(message: impl Into<Arc<str>>) -> Self {
    Self { message: message.into() }
  }

  /// Returns the failure message.
  #[must_use]
  pub fn message(&self) -> &str {
    &self.message
  }
}
