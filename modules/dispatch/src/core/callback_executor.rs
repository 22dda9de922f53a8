use std::sync::Arc;

/// Unit of work marshaled onto a callback executor.
pub type CallbackTask = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to a callback executor.
pub type SharedExecutor = Arc<dyn CallbackExecutor>;

/// Execution context that runs callbacks one at a time.
///
/// Tasks submitted from one thread must run in submission order; the result
/// bridge relies on FIFO delivery per attachment.
pub trait CallbackExecutor: Send + Sync {
  /// Submits a task for execution.
  fn execute(&self, task: CallbackTask);
}
