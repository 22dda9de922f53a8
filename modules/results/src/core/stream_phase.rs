/// Lifecycle phase of a row stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
  /// Attached, no demand issued yet.
  Idle,
  /// Demand flows automatically.
  Active,
  /// Automatic demand is frozen.
  Paused,
  /// The source delivered every row.
  Ended,
  /// The source failed.
  Failed,
  /// The caller disposed the stream.
  Disposed,
}

impl StreamPhase {
  /// Returns `true` for phases that accept no further callbacks.
  #[must_use]
  pub const fn is_terminal(&self) -> bool {
    matches!(self, Self::Ended | Self::Failed | Self::Disposed)
  }
}
