use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{
  demand_control::DemandControl,
  demand_handle::DemandHandle,
  result_error::ResultError,
  row_consumer::RowConsumer,
  row_source::{BoxSource, RowSource},
  source_error::SourceError,
};

/// Fully script-driven row source for interleaving tests.
///
/// The test drives the producer side directly through the
/// [`ManualSourceProbe`]: it can emit rows, complete, or fail at any point,
/// including in violation of granted demand, to exercise adversarial
/// producer behavior against the consumers.
pub struct ManualSource<T> {
  state: Arc<Mutex<ManualState<T>>>,
}

struct ManualState<T> {
  consumer:  Option<Arc<dyn RowConsumer<T>>>,
  demand:    u64,
  requests:  Vec<u64>,
  cancelled: bool,
  attached:  bool,
}

impl<T> ManualSource<T>
where
  T: Send + 'static,
{
  /// Creates a new source with no scripted behavior.
  #[must_use]
  pub fn new() -> Self {
    Self {
      state: Arc::new(Mutex::new(ManualState {
        consumer:  None,
        demand:    0,
        requests:  Vec::new(),
        cancelled: false,
        attached:  false,
      })),
    }
  }

  /// Returns the probe driving this source.
  #[must_use]
  pub fn probe(&self) -> ManualSourceProbe<T> {
    ManualSourceProbe { state: self.state.clone() }
  }

  /// Boxes this source.
  #[must_use]
  pub fn boxed(self) -> BoxSource<T> {
    Box::new(self)
  }
}

impl<T> Default for ManualSource<T>
where
  T: Send + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T> RowSource<T> for ManualSource<T>
where
  T: Send + 'static,
{
  fn attach(&mut self, consumer: Arc<dyn RowConsumer<T>>) -> Result<DemandHandle, ResultError> {
    {
      let mut state = self.state.lock();
      if state.attached {
        return Err(ResultError::AlreadyAttached);
      }
      state.attached = true;
      state.consumer = Some(consumer);
    }
    let control = Arc::new(ManualControl { state: self.state.clone() });
    Ok(DemandHandle::new(control))
  }

  fn first_view(self: Box<Self>) -> BoxSource<T> {
    self
  }
}

/// Test-side handle driving a [`ManualSource`].
pub struct ManualSourceProbe<T> {
  state: Arc<Mutex<ManualState<T>>>,
}

impl<T> Clone for ManualSourceProbe<T> {
  fn clone(&self) -> Self {
    Self { state: self.state.clone() }
  }
}

impl<T> ManualSourceProbe<T>
where
  T: Send + 'static,
{
  /// Emits one row, regardless of granted demand.
  pub fn emit(&self, item: T) {
    let consumer = {
      let mut state = self.state.lock();
      state.demand = state.demand.saturating_sub(1);
      state.consumer.clone()
    };
    if let Some(consumer) = consumer {
      consumer.on_item(item);
    }
  }

  /// Signals completion.
  pub fn complete(&self) {
    let consumer = self.state.lock().consumer.clone();
    if let Some(consumer) = consumer {
      consumer.on_complete();
    }
  }

  /// Signals failure.
  pub fn fail(&self, failure: SourceError) {
    let consumer = self.state.lock().consumer.clone();
    if let Some(consumer) = consumer {
      consumer.on_error(ResultError::Source(failure));
    }
  }

  /// Returns `true` once a consumer is attached.
  #[must_use]
  pub fn is_attached(&self) -> bool {
    self.state.lock().attached
  }

  /// Returns the demand granted and not yet consumed by emits.
  #[must_use]
  pub fn demand(&self) -> u64 {
    self.state.lock().demand
  }

  /// Returns every request amount observed, in order.
  #[must_use]
  pub fn requests(&self) -> Vec<u64> {
    self.state.lock().requests.clone()
  }

  /// Returns `true` once the consumer cancelled.
  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.state.lock().cancelled
  }
}

struct ManualControl<T> {
  state: Arc<Mutex<ManualState<T>>>,
}

impl<T> DemandControl for ManualControl<T>
where
  T: Send + 'static,
{
  fn request(&self, count: u64) {
    let mut state = self.state.lock();
    state.requests.push(count);
    state.demand = state.demand.saturating_add(count);
  }

  fn cancel(&self) {
    self.state.lock().cancelled = true;
  }
}
