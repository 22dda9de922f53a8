use std::sync::Arc;

use brook_dispatch_rs::core::SharedExecutor;
use parking_lot::Mutex;

use crate::core::{
  demand_handle::DemandHandle,
  result_error::ResultError,
  result_future::ResultFuture,
  result_promise::ResultPromise,
  row_consumer::RowConsumer,
  row_source::{BoxSource, RowSource},
};

#[cfg(test)]
mod tests;

/// Collector resolving a one-shot result with the first row, if any.
///
/// Requests exactly one row; the first delivery wins, cancels the producer,
/// and settles the future. A source completing without rows settles `None`,
/// since an empty result set is success, never an error.
pub struct HeadSink<T> {
  executor: SharedExecutor,
  promise:  ResultPromise<Option<T>>,
  handle:   Mutex<Option<DemandHandle>>,
}

impl<T> HeadSink<T>
where
  T: Send + 'static,
{
  /// Attaches to `source` and resolves with its first row.
  ///
  /// Attachment failures settle the returned future, so every call resolves
  /// exactly once through the future.
  pub fn run(mut source: BoxSource<T>, executor: SharedExecutor) -> ResultFuture<Option<T>> {
    let (promise, future) = ResultPromise::channel();
    let sink = Arc::new(Self { executor, promise: promise.clone(), handle: Mutex::new(None) });
    match source.attach(sink.clone()) {
      | Ok(handle) => {
        *sink.handle.lock() = Some(handle.clone());
        if let Err(error) = handle.request(1) {
          let _ = promise.fail(error);
        }
      },
      | Err(error) => {
        let _ = promise.fail(error);
      },
    }
    future
  }
}

impl<T> RowConsumer<T> for HeadSink<T>
where
  T: Send + 'static,
{
  fn on_item(&self, item: T) {
    let promise = self.promise.clone();
    let handle = self.handle.lock().clone();
    self.executor.execute(Box::new(move || {
      if promise.is_settled() {
        return;
      }
      // Further rows are not needed even if the producer still holds demand.
      if let Some(handle) = &handle {
        handle.cancel();
      }
      let _ = promise.succeed(Some(item));
    }));
  }

  fn on_complete(&self) {
    let promise = self.promise.clone();
    self.executor.execute(Box::new(move || {
      let _ = promise.succeed(None);
    }));
  }

  fn on_error(&self, error: ResultError) {
    let promise = self.promise.clone();
    self.executor.execute(Box::new(move || {
      let _ = promise.fail(error);
    }));
  }
}
