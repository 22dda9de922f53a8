/// Producer-side demand operations.
///
/// Producers hand an implementation to a [`DemandHandle`](crate::core::DemandHandle)
/// when a consumer attaches. Zero-count requests never reach the control; the
/// handle rejects them first.
pub trait DemandControl: Send + Sync {
  /// Grants permission to deliver up to `count` additional rows.
  fn request(&self, count: u64);

  /// Tells the producer to stop emitting and release its resources.
  ///
  /// The producer must not emit after observing cancellation; one row
  /// already in flight is tolerated and dropped by the consumer.
  fn cancel(&self);
}
