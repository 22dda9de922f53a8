use std::{future::Future, pin::Pin, sync::Arc};

use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::Notify};

use crate::core::{
  BoxSource, DemandControl, DemandHandle, ResultError, RowConsumer, RowSource, SourceError,
};


type ProducerFn<T> = Box<
  dyn FnOnce(Emitter<T>) -> Pin<Box<dyn Future<Output = Result<(), SourceError>> + Send>>
    + Send,
>;

/// Row source backed by an async producer running on a Tokio task.
///
/// The producer receives an [`Emitter`] and pushes rows through it; every
/// emit waits until demand has been granted and fails once the consumer
/// cancels, so the producer observes backpressure and cancellation without
/// touching the negotiation itself. Returning `Ok(())` completes the
/// attachment, returning an error fails it. Consumer callbacks fire on the
/// producer task's thread; the consumer marshals them.
pub struct TaskSource<T> {
  handle:   Handle,
  producer: Option<ProducerFn<T>>,
}

impl<T> TaskSource<T>
where
  T: Send + 'static,
{
  /// Creates a source that runs `producer` on `handle` once attached.
  #[must_use]
  pub fn new<F, Fut>(handle: Handle, producer: F) -> Self
  where
    F: FnOnce(Emitter<T>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), SourceError>> + Send + 'static, {
    Self { handle, producer: Some(Box::new(move |emitter| Box::pin(producer(emitter)))) }
  }

  /// Boxes this source.
  #[must_use]
  pub fn boxed(self) -> BoxSource<T> {
    Box::new(self)
  }
}

impl<T> RowSource<T> for TaskSource<T>
where
  T: Send + 'static,
{
  fn attach(&mut self, consumer: Arc<dyn RowConsumer<T>>) -> Result<DemandHandle, ResultError> {
    let Some(producer) = self.producer.take() else {
      return Err(ResultError::AlreadyAttached);
    };
    let gate = Arc::new(DemandGate::new());
    let emitter = Emitter { gate: gate.clone(), consumer: consumer.clone() };
    let task_gate = gate.clone();
    self.handle.spawn(async move {
      match producer(emitter).await {
        | Ok(()) => {
          if !task_gate.is_cancelled() {
            consumer.on_complete();
          }
        },
        | Err(failure) => {
          if !task_gate.is_cancelled() {
            consumer.on_error(ResultError::Source(failure));
          }
        },
      }
    });
    Ok(DemandHandle::new(gate))
  }

  fn first_view(self: Box<Self>) -> BoxSource<T> {
    self
  }
}

struct DemandGate {
  state:  Mutex<GateState>,
  notify: Notify,
}

struct GateState {
  demand:    u64,
  cancelled: bool,
}

impl DemandGate {
  fn new() -> Self {
    Self { state: Mutex::new(GateState { demand: 0, cancelled: false }), notify: Notify::new() }
  }

  fn is_cancelled(&self) -> bool {
    self.state.lock().cancelled
  }
}

impl DemandControl for DemandGate {
  fn request(&self, count: u64) {
    {
      let mut state = self.state.lock();
      state.demand = state.demand.saturating_add(count);
    }
    self.notify.notify_waiters();
  }

  fn cancel(&self) {
    self.state.lock().cancelled = true;
    self.notify.notify_waiters();
  }
}

/// Producer-side handle emitting rows under granted demand.
pub struct Emitter<T> {
  gate:     Arc<DemandGate>,
  consumer: Arc<dyn RowConsumer<T>>,
}

impl<T> Emitter<T>
where
  T: Send + 'static,
{
  /// Emits one row once demand is available.
  ///
  /// # Errors
  ///
  /// Returns an error once the consumer cancelled; the producer should stop
  /// and return.
  pub async fn emit(&self, item: T) -> Result<(), SourceError> {
    loop {
      let notified = self.gate.notify.notified();
      tokio::pin!(notified);
      notified.as_mut().enable();
      {
        let mut state = self.gate.state.lock();
        if state.cancelled {
          return Err(SourceError::new("attachment cancelled"));
        }
        if state.demand > 0 {
          state.demand -= 1;
          break;
        }
      }
      notified.await;
    }
    self.consumer.on_item(item);
    Ok(())
  }

  /// Returns `true` once the consumer cancelled the attachment.
  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.gate.is_cancelled()
  }
}
