use crate::core::result_error::ResultError;


/// Flow-control configuration for a row stream.
///
/// `batch_size` is how many rows are requested per demand grant;
/// `replenish_watermark` is the outstanding-demand level below which the
/// stream refills back up to the batch size. Larger batches trade buffering
/// for fewer negotiation round trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowStreamConfig {
  batch_size:          u64,
  replenish_watermark: u64,
}

impl RowStreamConfig {
  /// Creates the default configuration: one row per request, replenished as
  /// soon as outstanding demand is exhausted.
  #[must_use]
  pub const fn new() -> Self {
    Self { batch_size: 1, replenish_watermark: 1 }
  }

  /// Returns the number of rows requested per demand grant.
  #[must_use]
  pub const fn batch_size(&self) -> u64 {
    self.batch_size
  }

  /// Returns the outstanding-demand level below which demand is replenished.
  #[must_use]
  pub const fn replenish_watermark(&self) -> u64 {
    self.replenish_watermark
  }

  /// Updates the batch size.
  ///
  /// # Errors
  ///
  /// Returns [`ResultError::InvalidArgument`] when `batch_size` is zero.
  pub const fn with_batch_size(mut self, batch_size: u64) -> Result<Self, ResultError> {
    if batch_size == 0 {
      return Err(ResultError::InvalidArgument { name: "batch_size" });
    }
    self.batch_size = batch_size;
    Ok(self)
  }

  /// Updates the replenish watermark.
  ///
  /// # Errors
  ///
  /// Returns [`ResultError::InvalidArgument`] when `replenish_watermark` is
  /// zero.
  pub const fn with_replenish_watermark(
    mut self,
    replenish_watermark: u64,
  ) -> Result<Self, ResultError> {
    if replenish_watermark == 0 {
      return Err(ResultError::InvalidArgument { name: "replenish_watermark" });
    }
    self.replenish_watermark = replenish_watermark;
    Ok(self)
  }
}

impl Default for RowStreamConfig {
  fn default() -> Self {
    Self::new()
  }
}
