use std::{sync::Arc, task::Waker};

use parking_lot::Mutex;

use crate::core::{result_error::ResultError, result_future::ResultFuture};


pub(crate) struct ResultCell<T> {
  pub(crate) result:  Option<Result<T, ResultError>>,
  pub(crate) settled: bool,
  pub(crate) waker:   Option<Waker>,
}

impl<T> ResultCell<T> {
  const fn new() -> Self {
    Self { result: None, settled: false, waker: None }
  }
}

/// Write side of a one-shot result.
///
/// The first settlement wins; every later settlement is dropped. This is the
/// completion token every collector races through.
pub struct ResultPromise<T> {
  cell: Arc<Mutex<ResultCell<T>>>,
}

impl<T> Clone for ResultPromise<T> {
  fn clone(&self) -> Self {
    Self { cell: self.cell.clone() }
  }
}

impl<T> ResultPromise<T> {
  /// Creates a promise together with its future.
  #[must_use]
  pub fn channel() -> (Self, ResultFuture<T>) {
    let cell = Arc::new(Mutex::new(ResultCell::new()));
    (Self { cell: cell.clone() }, ResultFuture::from_cell(cell))
  }

  /// Settles the result.
  ///
  /// Returns `false` when the result was already settled; the provided value
  /// is dropped in that case.
  pub fn complete(&self, result: Result<T, ResultError>) -> bool {
    let waker = {
      let mut cell = self.cell.lock();
      if cell.settled {
        return false;
      }
      cell.settled = true;
      cell.result = Some(result);
      cell.waker.take()
    };
    if let Some(waker) = waker {
      waker.wake();
    }
    true
  }

  /// Settles the result with a success value.
  pub fn succeed(&self, value: T) -> bool {
    self.complete(Ok(value))
  }

  /// Settles the result with a failure.
  pub fn fail(&self, error: ResultError) -> bool {
    self.complete(Err(error))
  }

  /// Returns `true` once the result has been settled.
  #[must_use]
  pub fn is_settled(&self) -> bool {
    self.cell.lock().settled
  }
}
