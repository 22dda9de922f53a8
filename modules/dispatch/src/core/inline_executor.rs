use super::{CallbackExecutor, CallbackTask};


/// Executor that runs each task on the calling thread immediately.
///
/// Producer callbacks are delivered inside the producer's own call stack, so
/// a handler that drives demand synchronously re-enters delivery. Use
/// [`ManualExecutor`](super::ManualExecutor) or the Tokio executor when
/// handlers perform flow control.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl InlineExecutor {
  /// Creates a new inline executor.
  #[must_use]
  pub const fn new() -> Self {
    Self
  }
}

impl CallbackExecutor for InlineExecutor {
  fn execute(&self, task: CallbackTask) {
    task();
  }
}
