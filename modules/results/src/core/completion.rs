use crate::core::result_error::ResultError;

/// Polling view of a one-shot result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion<T> {
  /// The result is not settled yet.
  Pending,
  /// The result is settled.
  Ready(Result<T, ResultError>),
}

impl<T> Completion<T> {
  /// Returns `true` while the result is unsettled.
  #[must_use]
  pub const fn is_pending(&self) -> bool {
    matches!(self, Self::Pending)
  }
}
