use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use crate::core::{
  demand_control::DemandControl,
  demand_handle::DemandHandle,
  result_error::ResultError,
  row_consumer::RowConsumer,
  row_source::{BoxSource, RowSource},
  source_error::SourceError,
};

#[cfg(test)]
mod tests;

/// In-memory row source that honors the demand protocol.
///
/// Rows are emitted only while granted demand remains; once the last row is
/// out, the source completes (or fails, when built with
/// [`failing`](Self::failing)). The [`SourceProbe`] records the negotiation
/// so tests can assert on observed requests and cancellation.
pub struct VecSource<T> {
  state: Arc<Mutex<VecState<T>>>,
  probe: SourceProbe,
}

struct VecState<T> {
  rows:     VecDeque<T>,
  failure:  Option<SourceError>,
  consumer: Option<Arc<dyn RowConsumer<T>>>,
  demand:   u64,
  emitting: bool,
  attached: bool,
  finished: bool,
}

/// Records the demand negotiation observed by a [`VecSource`].
#[derive(Clone)]
pub struct SourceProbe {
  state: Arc<Mutex<ProbeState>>,
}

struct ProbeState {
  requests:  Vec<u64>,
  cancelled: bool,
}

impl SourceProbe {
  fn new() -> Self {
    Self { state: Arc::new(Mutex::new(ProbeState { requests: Vec::new(), cancelled: false })) }
  }

  /// Returns every request amount observed, in order.
  #[must_use]
  pub fn requests(&self) -> Vec<u64> {
    self.state.lock().requests.clone()
  }

  /// Returns `true` once the producer observed cancellation.
  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.state.lock().cancelled
  }
}

impl<T> VecSource<T>
where
  T: Send + 'static,
{
  /// Creates a source that emits `rows` and completes.
  #[must_use]
  pub fn new(rows: impl IntoIterator<Item = T>) -> Self {
    Self {
      state: Arc::new(Mutex::new(VecState {
        rows:     rows.into_iter().collect(),
        failure:  None,
        consumer: None,
        demand:   0,
        emitting: false,
        attached: false,
        finished: false,
      })),
      probe: SourceProbe::new(),
    }
  }

  /// Creates a source that emits `rows` and then fails with `failure`.
  #[must_use]
  pub fn failing(rows: impl IntoIterator<Item = T>, failure: SourceError) -> Self {
    let source = Self::new(rows);
    source.state.lock().failure = Some(failure);
    source
  }

  /// Returns the probe recording this source's demand negotiation.
  #[must_use]
  pub fn probe(&self) -> SourceProbe {
    self.probe.clone()
  }

  /// Boxes this source.
  #[must_use]
  pub fn boxed(self) -> BoxSource<T> {
    Box::new(self)
  }
}

impl<T> RowSource<T> for VecSource<T>
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
    let control = Arc::new(VecControl { state: self.state.clone(), probe: self.probe.clone() });
    Ok(DemandHandle::new(control))
  }

  fn first_view(self: Box<Self>) -> BoxSource<T> {
    // Narrowing capability: anything past the first row is never served.
    self.state.lock().rows.truncate(1);
    self
  }
}

struct VecControl<T> {
  state: Arc<Mutex<VecState<T>>>,
  probe: SourceProbe,
}

impl<T> DemandControl for VecControl<T>
where
  T: Send + 'static,
{
  fn request(&self, count: u64) {
    self.probe.state.lock().requests.push(count);
    drain(&self.state, count);
  }

  fn cancel(&self) {
    self.probe.state.lock().cancelled = true;
    self.state.lock().finished = true;
  }
}

/// Emits rows while demand remains, then completes or fails.
///
/// Reentrancy-safe: callbacks run outside the state lock, and a `request`
/// arriving from inside a callback only tops up demand for the outer drain
/// loop to pick up.
fn drain<T>(state: &Arc<Mutex<VecState<T>>>, add: u64) {
  let mut guard = state.lock();
  guard.demand = guard.demand.saturating_add(add);
  if guard.emitting {
    return;
  }
  guard.emitting = true;
  loop {
    if guard.finished || guard.demand == 0 || guard.rows.is_empty() {
      break;
    }
    let Some(item) = guard.rows.pop_front() else {
      break;
    };
    guard.demand -= 1;
    let Some(consumer) = guard.consumer.clone() else {
      break;
    };
    drop(guard);
    consumer.on_item(item);
    guard = state.lock();
  }
  if !guard.finished && guard.rows.is_empty() {
    guard.finished = true;
    let consumer = guard.consumer.clone();
    let failure = guard.failure.take();
    drop(guard);
    if let Some(consumer) = consumer {
      match failure {
        | Some(failure) => consumer.on_error(ResultError::Source(failure)),
        | None => consumer.on_complete(),
      }
    }
    guard = state.lock();
  }
  guard.emitting = false;
}
