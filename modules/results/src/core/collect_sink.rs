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


/// Collector resolving a one-shot result with a row list.
///
/// With a limit, demand for exactly `limit` rows is issued once and the
/// producer is cancelled as soon as the limit is reached. Without a limit the
/// unbounded sentinel is requested. Completion below the limit settles with
/// whatever accumulated; that is success, not partial failure. A source
/// failure discards the buffer, since partial rows are not a recoverable
/// result through this shape.
pub struct CollectSink<T> {
  executor: SharedExecutor,
  promise:  ResultPromise<Vec<T>>,
  state:    Arc<Mutex<CollectState<T>>>,
}

struct CollectState<T> {
  buffer: Vec<T>,
  limit:  Option<u64>,
  handle: Option<DemandHandle>,
}

impl<T> CollectSink<T>
where
  T: Send + 'static,
{
  /// Attaches to `source` and resolves with up to `limit` rows.
  ///
  /// A limit of zero settles immediately with an empty list and cancels the
  /// source without ever requesting demand. Attachment failures settle the
  /// returned future.
  pub fn run(
    mut source: BoxSource<T>,
    limit: Option<u64>,
    executor: SharedExecutor,
  ) -> ResultFuture<Vec<T>> {
    let (promise, future) = ResultPromise::channel();
    let sink = Arc::new(Self {
      executor,
      promise: promise.clone(),
      state: Arc::new(Mutex::new(CollectState { buffer: Vec::new(), limit, handle: None })),
    });
    match source.attach(sink.clone()) {
      | Ok(handle) => {
        sink.state.lock().handle = Some(handle.clone());
        match limit {
          | Some(0) => {
            handle.cancel();
            let _ = promise.succeed(Vec::new());
          },
          | Some(count) => {
            if let Err(error) = handle.request(count) {
              let _ = promise.fail(error);
            }
          },
          | None => {
            if let Err(error) = handle.request(u64::MAX) {
              let _ = promise.fail(error);
            }
          },
        }
      },
      | Err(error) => {
        let _ = promise.fail(error);
      },
    }
    future
  }
}

impl<T> RowConsumer<T> for CollectSink<T>
where
  T: Send + 'static,
{
  fn on_item(&self, item: T) {
    let promise = self.promise.clone();
    let state = self.state.clone();
    self.executor.execute(Box::new(move || {
      if promise.is_settled() {
        return;
      }
      let capped = {
        let mut state = state.lock();
        state.buffer.push(item);
        match state.limit {
          | Some(limit) if state.buffer.len() as u64 >= limit => {
            Some((state.handle.clone(), std::mem::take(&mut state.buffer)))
          },
          | _ => None,
        }
      };
      if let Some((handle, rows)) = capped {
        if let Some(handle) = handle {
          handle.cancel();
        }
        let _ = promise.succeed(rows);
      }
    }));
  }

  fn on_complete(&self) {
    let promise = self.promise.clone();
    let state = self.state.clone();
    self.executor.execute(Box::new(move || {
      if promise.is_settled() {
        return;
      }
      let rows = std::mem::take(&mut state.lock().buffer);
      let _ = promise.succeed(rows);
    }));
  }

  fn on_error(&self, error: ResultError) {
    let promise = self.promise.clone();
    let state = self.state.clone();
    self.executor.execute(Box::new(move || {
      state.lock().buffer.clear();
      let _ = promise.fail(error);
    }));
  }
}
