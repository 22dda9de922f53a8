use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use super::{CallbackExecutor, CallbackTask};


/// Executor that queues tasks until a test pumps them.
///
/// Pumping one task at a time lets tests drive callback interleavings
/// deterministically, without a live producer or runtime.
#[derive(Clone)]
pub struct ManualExecutor {
  queue: Arc<Mutex<VecDeque<CallbackTask>>>,
}

impl ManualExecutor {
  /// Creates a new executor with an empty queue.
  #[must_use]
  pub fn new() -> Self {
    Self { queue: Arc::new(Mutex::new(VecDeque::new())) }
  }

  /// Returns the number of queued tasks.
  #[must_use]
  pub fn pending(&self) -> usize {
    self.queue.lock().len()
  }

  /// Runs the oldest queued task.
  ///
  /// Returns `false` when the queue is empty.
  pub fn run_next(&self) -> bool {
    let task = self.queue.lock().pop_front();
    match task {
      | Some(task) => {
        task();
        true
      },
      | None => false,
    }
  }

  /// Runs queued tasks until the queue stays empty.
  ///
  /// Tasks submitted while pumping run in the same pass. Returns the number
  /// of tasks executed.
  pub fn run_all(&self) -> usize {
    let mut executed = 0;
    while self.run_next() {
      executed += 1;
    }
    executed
  }
}

impl Default for ManualExecutor {
  fn default() -> Self {
    Self::new()
  }
}

impl CallbackExecutor for ManualExecutor {
  fn execute(&self, task: CallbackTask) {
    self.queue.lock().push_back(task);
  }
}
