use std::{
  future::Future,
  pin::Pin,
  sync::Arc,
  task::{Context, Poll},
};

use parking_lot::Mutex;

use crate::core::{
  completion::Completion, mapped_future::MappedFuture, result_error::ResultError,
  result_promise::ResultCell,
};


/// Read side of a one-shot result.
///
/// Await it as an ordinary future, or observe it synchronously through
/// [`poll_now`](Self::poll_now) / [`try_take`](Self::try_take) when no
/// async runtime is involved.
pub struct ResultFuture<T> {
  cell: Arc<Mutex<ResultCell<T>>>,
}

impl<T> ResultFuture<T> {
  pub(crate) fn from_cell(cell: Arc<Mutex<ResultCell<T>>>) -> Self {
    Self { cell }
  }

  /// Polls the settlement state without registering interest.
  #[must_use]
  pub fn poll_now(&self) -> Completion<T>
  where
    T: Clone, {
    let cell = self.cell.lock();
    match &cell.result {
      | Some(result) => Completion::Ready(result.clone()),
      | None => Completion::Pending,
    }
  }

  /// Attempts to take the settled result.
  #[must_use]
  pub fn try_take(&self) -> Option<Result<T, ResultError>> {
    self.cell.lock().result.take()
  }

  /// Maps a successful settlement with `func`.
  #[must_use]
  pub fn map<U, F>(self, func: F) -> MappedFuture<T, U, F>
  where
    F: FnOnce(T) -> U, {
    MappedFuture::new(self, func)
  }
}

impl<T> Future for ResultFuture<T> {
  type Output = Result<T, ResultError>;

  fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
    let mut cell = self.cell.lock();
    match cell.result.take() {
      | Some(result) => Poll::Ready(result),
      | None => {
        cell.waker = Some(context.waker().clone());
        Poll::Pending
      },
    }
  }
}
