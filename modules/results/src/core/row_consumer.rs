use crate::core::result_error::ResultError;

/// Receiver side of one row-source attachment.
///
/// Producers may invoke these callbacks from any thread; implementations
/// marshal onto their execution context before touching shared state. Per
/// attachment, `on_error` terminates delivery: no `on_complete` follows it
/// and no further rows are accepted after either.
pub trait RowConsumer<T>: Send + Sync {
  /// Delivers one row.
  fn on_item(&self, item: T);

  /// Signals that the source emitted every row it will emit.
  fn on_complete(&self);

  /// Signals that the source failed.
  fn on_error(&self, error: ResultError);
}
