use std::{
  future::Future,
  marker::PhantomData,
  pin::Pin,
  task::{Context, Poll},
};

use crate::core::{result_error::ResultError, result_future::ResultFuture};

/// Future adapter mapping a successful settlement.
///
/// Failures pass through unchanged.
pub struct MappedFuture<T, U, F> {
  inner: ResultFuture<T>,
  func:  Option<F>,
  _pd:   PhantomData<fn() -> U>,
}

impl<T, U, F> MappedFuture<T, U, F>
where
  F: FnOnce(T) -> U,
{
  pub(crate) fn new(inner: ResultFuture<T>, func: F) -> Self {
    Self { inner, func: Some(func), _pd: PhantomData }
  }
}

impl<T, U, F> Future for MappedFuture<T, U, F>
where
  F: FnOnce(T) -> U + Unpin,
{
  type Output = Result<U, ResultError>;

  fn poll(self: Pin<&mut Self>, context: &mut Context<'_>) -> Poll<Self::Output> {
    let this = self.get_mut();
    match Pin::new(&mut this.inner).poll(context) {
      | Poll::Ready(Ok(value)) => match this.func.take() {
        | Some(func) => Poll::Ready(Ok(func(value))),
        | None => Poll::Pending,
      },
      | Poll::Ready(Err(error)) => Poll::Ready(Err(error)),
      | Poll::Pending => Poll::Pending,
    }
  }
}
