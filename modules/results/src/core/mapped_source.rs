use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use parking_lot::Mutex;

use crate::core::{
  demand_handle::DemandHandle,
  result_error::ResultError,
  row_consumer::RowConsumer,
  row_source::{BoxSource, RowSource},
  source_error::SourceError,
};


/// Transform applied to every row of a mapped source.
pub type RowTransform<I, O> = dyn Fn(I) -> Result<O, SourceError> + Send + Sync;

/// Decorator applying a per-row transform without touching flow control.
///
/// Demand and cancellation pass through untouched; rows are neither buffered
/// nor reordered. A transform failure fails the whole attachment: upstream
/// demand is cancelled, the failure is forwarded once as
/// [`ResultError::Transform`], and any rows still in flight are dropped.
pub struct MappedSource<I, O> {
  inner:     BoxSource<I>,
  transform: Arc<RowTransform<I, O>>,
}

impl<I, O> MappedSource<I, O>
where
  I: Send + 'static,
  O: Send + 'static,
{
  /// Creates a mapped source over `inner`.
  #[must_use]
  pub fn new<F>(inner: BoxSource<I>, transform: F) -> Self
  where
    F: Fn(I) -> Result<O, SourceError> + Send + Sync + 'static, {
    Self { inner, transform: Arc::new(transform) }
  }
}

impl<I, O> RowSource<O> for MappedSource<I, O>
where
  I: Send + 'static,
  O: Send + 'static,
{
  fn attach(&mut self, consumer: Arc<dyn RowConsumer<O>>) -> Result<DemandHandle, ResultError> {
    let mapped = Arc::new(MappedConsumer {
      downstream: consumer,
      transform:  self.transform.clone(),
      upstream:   Mutex::new(None),
      failed:     AtomicBool::new(false),
    });
    let handle = self.inner.attach(mapped.clone())?;
    *mapped.upstream.lock() = Some(handle.clone());
    Ok(handle)
  }

  fn first_view(self: Box<Self>) -> BoxSource<O> {
    let Self { inner, transform } = *self;
    Box::new(MappedSource { inner: inner.first_view(), transform })
  }
}

struct MappedConsumer<I, O> {
  downstream: Arc<dyn RowConsumer<O>>,
  transform:  Arc<RowTransform<I, O>>,
  upstream:   Mutex<Option<DemandHandle>>,
  failed:     AtomicBool,
}

impl<I, O> RowConsumer<I> for MappedConsumer<I, O>
where
  I: Send + 'static,
  O: Send + 'static,
{
  fn on_item(&self, item: I) {
    if self.failed.load(Ordering::Acquire) {
      return;
    }
    match (self.transform)(item) {
      | Ok(mapped) => self.downstream.on_item(mapped),
      | Err(failure) => {
        if self.failed.swap(true, Ordering::AcqRel) {
          return;
        }
        let upstream = self.upstream.lock().clone();
        if let Some(upstream) = upstream {
          upstream.cancel();
        }
        self.downstream.on_error(ResultError::Transform(failure));
      },
    }
  }

  fn on_complete(&self) {
    if !self.failed.load(Ordering::Acquire) {
      self.downstream.on_complete();
    }
  }

  fn on_error(&self, error: ResultError) {
    if !self.failed.swap(true, Ordering::AcqRel) {
      self.downstream.on_error(error);
    }
  }
}
