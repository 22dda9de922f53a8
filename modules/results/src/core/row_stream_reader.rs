use std::{
  collections::VecDeque,
  pin::Pin,
  sync::Arc,
  task::{Context, Poll, Waker},
};

use futures_core::Stream;
use parking_lot::Mutex;

use crate::core::{demand::Demand, result_error::ResultError, row_stream::RowStream};

#[cfg(test)]
mod tests;

/// Pull adapter exposing a row stream as a [`futures_core::Stream`].
///
/// The underlying stream stays paused; demand is fetched in batch-size
/// increments as the internal queue drains, so no more than one batch is ever
/// buffered. After a source failure the error is yielded once and the stream
/// ends. Dropping the reader disposes the underlying stream.
pub struct RowStreamReader<T> {
  stream: RowStream<T>,
  shared: Arc<Mutex<ReaderState<T>>>,
  batch:  u64,
}

struct ReaderState<T> {
  queue: VecDeque<Result<T, ResultError>>,
  ended: bool,
  waker: Option<Waker>,
}

impl<T> ReaderState<T> {
  fn push(&mut self, entry: Result<T, ResultError>) -> Option<Waker> {
    self.queue.push_back(entry);
    self.waker.take()
  }
}

impl<T> RowStreamReader<T>
where
  T: Send + 'static,
{
  pub(crate) fn new(stream: RowStream<T>) -> Self {
    let batch = stream.config().batch_size();
    let shared = Arc::new(Mutex::new(ReaderState {
      queue: VecDeque::new(),
      ended: false,
      waker: None,
    }));

    stream.pause();
    let state = shared.clone();
    stream.handler(move |item| {
      let waker = state.lock().push(Ok(item));
      if let Some(waker) = waker {
        waker.wake();
      }
    });
    let state = shared.clone();
    stream.exception_handler(move |error| {
      let waker = {
        let mut state = state.lock();
        state.ended = true;
        state.push(Err(error))
      };
      if let Some(waker) = waker {
        waker.wake();
      }
    });
    let state = shared.clone();
    stream.end_handler(move || {
      let waker = {
        let mut state = state.lock();
        state.ended = true;
        state.waker.take()
      };
      if let Some(waker) = waker {
        waker.wake();
      }
    });

    Self { stream, shared, batch }
  }
}

impl<T> Stream for RowStreamReader<T>
where
  T: Send + 'static,
{
  type Item = Result<T, ResultError>;

  fn poll_next(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Option<Self::Item>> {
    let this = self.get_mut();
    {
      let mut state = this.shared.lock();
      if let Some(entry) = state.queue.pop_front() {
        return Poll::Ready(Some(entry));
      }
      if state.ended {
        return Poll::Ready(None);
      }
      state.waker = Some(context.waker().clone());
    }
    if this.stream.outstanding() == Demand::Finite(0) {
      let _ = this.stream.fetch(this.batch);
      // The fetch may have delivered synchronously; check again.
      let mut state = this.shared.lock();
      if let Some(entry) = state.queue.pop_front() {
        return Poll::Ready(Some(entry));
      }
      if state.ended {
        return Poll::Ready(None);
      }
    }
    Poll::Pending
  }
}

impl<T> Drop for RowStreamReader<T> {
  fn drop(&mut self) {
    self.stream.dispose();
  }
}
