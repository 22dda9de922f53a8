use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use crate::core::{demand_control::DemandControl, result_error::ResultError};


/// Consumer-owned handle for negotiating demand with a producer.
///
/// Cancellation is idempotent (only the first call reaches the producer) and
/// requests after cancellation are silently dropped.
#[derive(Clone)]
pub struct DemandHandle {
  control:   Arc<dyn DemandControl>,
  cancelled: Arc<AtomicBool>,
}

impl DemandHandle {
  /// Creates a handle over the producer's demand control.
  #[must_use]
  pub fn new(control: Arc<dyn DemandControl>) -> Self {
    Self { control, cancelled: Arc::new(AtomicBool::new(false)) }
  }

  /// Grants permission for up to `count` additional rows.
  ///
  /// # Errors
  ///
  /// Returns [`ResultError::InvalidDemand`] when `count` is zero.
  pub fn request(&self, count: u64) -> Result<(), ResultError> {
    if count == 0 {
      return Err(ResultError::InvalidDemand);
    }
    if !self.cancelled.load(Ordering::Acquire) {
      self.control.request(count);
    }
    Ok(())
  }

  /// Tells the producer to stop emitting.
  pub fn cancel(&self) {
    if !self.cancelled.swap(true, Ordering::AcqRel) {
      self.control.cancel();
    }
  }

  /// Returns `true` once the handle has been cancelled.
  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.cancelled.load(Ordering::Acquire)
  }
}
