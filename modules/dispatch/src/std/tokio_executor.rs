use tokio::{
  runtime::Handle,
  sync::mpsc::{self, UnboundedSender},
};

use crate::core::{CallbackExecutor, CallbackTask};


/// Executor that drains tasks on a single Tokio task.
///
/// A single pump task receives from an unbounded channel, so tasks run one at
/// a time in submission order even when producers submit from several
/// threads.
#[derive(Clone)]
pub struct TokioExecutor {
  sender: UnboundedSender<CallbackTask>,
}

impl TokioExecutor {
  /// Creates an executor pumping on the provided runtime handle.
  #[must_use]
  pub fn new(handle: &Handle) -> Self {
    let (sender, mut receiver) = mpsc::unbounded_channel::<CallbackTask>();
    handle.spawn(async move {
      while let Some(task) = receiver.recv().await {
        task();
      }
    });
    Self { sender }
  }

  /// Creates an executor pumping on the current runtime.
  ///
  /// # Panics
  ///
  /// Panics when called outside a Tokio runtime context.
  #[must_use]
  pub fn current() -> Self {
    Self::new(&Handle::current())
  }
}

impl CallbackExecutor for TokioExecutor {
  fn execute(&self, task: CallbackTask) {
    // Send failure means the runtime shut down; late tasks are dropped.
    let _ = self.sender.send(task);
  }
}
