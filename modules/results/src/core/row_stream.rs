use std::sync::Arc;

use brook_dispatch_rs::core::SharedExecutor;
use parking_lot::Mutex;
use tracing::{error, warn};

use crate::core::{
  demand::Demand,
  demand_handle::DemandHandle,
  demand_tracker::DemandTracker,
  result_error::ResultError,
  row_consumer::RowConsumer,
  row_source::{BoxSource, RowSource},
  row_stream_config::RowStreamConfig,
  row_stream_reader::RowStreamReader,
  stream_phase::StreamPhase,
};


type ItemHandler<T> = Box<dyn FnMut(T) + Send>;
type ErrorHandler = Box<dyn FnMut(ResultError) + Send>;
type EndHandler = Box<dyn FnOnce() + Send>;

/// Pausable push stream over one row-source attachment.
///
/// The stream attaches at construction but issues no demand until it is
/// started by the first item-handler registration or an explicit
/// [`start`](Self::start). While active it keeps up to the configured batch
/// size of demand outstanding, refilling when deliveries drop it below the
/// watermark, so it behaves like an unbounded stream without ever granting
/// unbounded demand at once.
///
/// The value is a cheap cloneable handle; handlers may capture a clone to
/// drive `pause`/`resume`/`fetch`/`dispose` from inside a callback.
pub struct RowStream<T> {
  shared: Arc<RowStreamShared<T>>,
}

impl<T> Clone for RowStream<T> {
  fn clone(&self) -> Self {
    Self { shared: self.shared.clone() }
  }
}

struct RowStreamShared<T> {
  executor: SharedExecutor,
  state:    Mutex<StreamState<T>>,
}

struct StreamState<T> {
  phase:         StreamPhase,
  config:        RowStreamConfig,
  outstanding:   DemandTracker,
  handle:        Option<DemandHandle>,
  item_handler:  Option<ItemHandler<T>>,
  error_handler: Option<ErrorHandler>,
  end_handler:   Option<EndHandler>,
  handler_epoch: u64,
}

impl<T> StreamState<T> {
  /// Computes the demand request to refill outstanding demand up to the
  /// batch size, registering it in the tracker. Returns the request to be
  /// issued outside the state lock.
  fn replenish(&mut self) -> Option<(DemandHandle, u64)> {
    if self.phase != StreamPhase::Active || self.item_handler.is_none() {
      return None;
    }
    if !self.outstanding.is_below(self.config.replenish_watermark()) {
      return None;
    }
    let deficit = self.outstanding.deficit(self.config.batch_size());
    if deficit == 0 {
      return None;
    }
    let handle = self.handle.clone()?;
    match self.outstanding.request(deficit) {
      | Ok(_) => Some((handle, deficit)),
      | Err(_) => None,
    }
  }

  fn drop_handlers(&mut self) {
    self.item_handler = None;
    self.error_handler = None;
    self.end_handler = None;
    self.handler_epoch += 1;
  }
}

fn issue(request: Option<(DemandHandle, u64)>) {
  if let Some((handle, count)) = request {
    let _ = handle.request(count);
  }
}

impl<T> RowStream<T>
where
  T: Send + 'static,
{
  /// Attaches to `source` and returns the idle stream.
  ///
  /// # Errors
  ///
  /// Returns [`ResultError::AlreadyAttached`] when the source was attached
  /// elsewhere.
  pub fn attach(
    mut source: BoxSource<T>,
    executor: SharedExecutor,
    config: RowStreamConfig,
  ) -> Result<Self, ResultError> {
    let shared = Arc::new(RowStreamShared {
      executor,
      state: Mutex::new(StreamState {
        phase: StreamPhase::Idle,
        config,
        outstanding: DemandTracker::new(),
        handle: None,
        item_handler: None,
        error_handler: None,
        end_handler: None,
        handler_epoch: 0,
      }),
    });
    let consumer = Arc::new(StreamConsumer { shared: shared.clone() });
    let handle = source.attach(consumer)?;
    shared.state.lock().handle = Some(handle);
    Ok(Self { shared })
  }

  /// Registers the item handler, starting the stream if it was idle.
  ///
  /// Accepted but ignored after the stream reached a terminal phase.
  pub fn handler<F>(&self, handler: F)
  where
    F: FnMut(T) + Send + 'static, {
    let request = {
      let mut state = self.shared.state.lock();
      if state.phase.is_terminal() {
        return;
      }
      state.item_handler = Some(Box::new(handler));
      state.handler_epoch += 1;
      if state.phase == StreamPhase::Idle {
        state.phase = StreamPhase::Active;
      }
      state.replenish()
    };
    issue(request);
  }

  /// Clears the item handler.
  ///
  /// Rows still in flight arrive with no handler and are dropped.
  pub fn clear_handler(&self) {
    let mut state = self.shared.state.lock();
    state.item_handler = None;
    state.handler_epoch += 1;
  }

  /// Registers the error handler.
  ///
  /// Accepted but ignored after the stream reached a terminal phase.
  pub fn exception_handler<F>(&self, handler: F)
  where
    F: FnMut(ResultError) + Send + 'static, {
    let mut state = self.shared.state.lock();
    if state.phase.is_terminal() {
      return;
    }
    state.error_handler = Some(Box::new(handler));
  }

  /// Registers the end handler.
  ///
  /// Accepted but ignored after the stream reached a terminal phase.
  pub fn end_handler<F>(&self, handler: F)
  where
    F: FnOnce() + Send + 'static, {
    let mut state = self.shared.state.lock();
    if state.phase.is_terminal() {
      return;
    }
    state.end_handler = Some(Box::new(handler));
  }

  /// Starts the stream without waiting for a handler registration.
  ///
  /// Demand is still only issued once an item handler is registered.
  pub fn start(&self) {
    let request = {
      let mut state = self.shared.state.lock();
      if state.phase != StreamPhase::Idle {
        return;
      }
      state.phase = StreamPhase::Active;
      state.replenish()
    };
    issue(request);
  }

  /// Freezes automatic demand.
  ///
  /// Rows already granted to the producer are still delivered; pausing stops
  /// future requests, it does not cancel granted demand.
  pub fn pause(&self) {
    let mut state = self.shared.state.lock();
    if matches!(state.phase, StreamPhase::Idle | StreamPhase::Active) {
      state.phase = StreamPhase::Paused;
    }
  }

  /// Resumes automatic demand, replenishing up to the configured batch size.
  pub fn resume(&self) {
    let request = {
      let mut state = self.shared.state.lock();
      if state.phase != StreamPhase::Paused {
        return;
      }
      state.phase = StreamPhase::Active;
      state.replenish()
    };
    issue(request);
  }

  /// Requests `count` additional rows regardless of pause state.
  ///
  /// Additive to automatic replenishment while active; silently ignored
  /// after a terminal phase.
  ///
  /// # Errors
  ///
  /// Returns [`ResultError::InvalidDemand`] when `count` is zero.
  pub fn fetch(&self, count: u64) -> Result<(), ResultError> {
    if count == 0 {
      return Err(ResultError::InvalidDemand);
    }
    let request = {
      let mut state = self.shared.state.lock();
      if state.phase.is_terminal() {
        return Ok(());
      }
      state.outstanding.request(count)?;
      state.handle.clone().map(|handle| (handle, count))
    };
    issue(request);
    Ok(())
  }

  /// Returns the current phase.
  #[must_use]
  pub fn phase(&self) -> StreamPhase {
    self.shared.state.lock().phase
  }

  /// Returns the demand currently granted but undelivered.
  #[must_use]
  pub fn outstanding(&self) -> Demand {
    self.shared.state.lock().outstanding.current()
  }

  /// Returns the stream's flow-control configuration.
  #[must_use]
  pub fn config(&self) -> RowStreamConfig {
    self.shared.state.lock().config
  }

  /// Converts this stream into a pull-based reader.
  #[must_use]
  pub fn into_reader(self) -> RowStreamReader<T> {
    RowStreamReader::new(self)
  }
}

impl<T> RowStream<T> {
  /// Cancels the attachment and drops every handler.
  ///
  /// Disposal is a deliberate, silent unsubscription: no further callbacks
  /// are delivered and no error is raised. Safe to call from any phase, any
  /// number of times.
  pub fn dispose(&self) {
    let handle = {
      let mut state = self.shared.state.lock();
      if state.phase == StreamPhase::Disposed {
        return;
      }
      state.phase = StreamPhase::Disposed;
      state.drop_handlers();
      state.handle.take()
    };
    if let Some(handle) = handle {
      handle.cancel();
    }
  }
}

struct StreamConsumer<T> {
  shared: Arc<RowStreamShared<T>>,
}

impl<T> RowConsumer<T> for StreamConsumer<T>
where
  T: Send + 'static,
{
  fn on_item(&self, item: T) {
    let shared = self.shared.clone();
    self.shared.executor.execute(Box::new(move || shared.deliver_item(item)));
  }

  fn on_complete(&self) {
    let shared = self.shared.clone();
    self.shared.executor.execute(Box::new(move || shared.deliver_complete()));
  }

  fn on_error(&self, error: ResultError) {
    let shared = self.shared.clone();
    self.shared.executor.execute(Box::new(move || shared.deliver_error(error)));
  }
}

impl<T> RowStreamShared<T>
where
  T: Send + 'static,
{
  fn deliver_item(&self, item: T) {
    let (mut handler, epoch) = {
      let mut state = self.state.lock();
      if state.phase.is_terminal() {
        // A row already in flight when the stream was cancelled; drop it.
        return;
      }
      let _ = state.outstanding.consume_one();
      match state.item_handler.take() {
        | Some(handler) => (handler, state.handler_epoch),
        | None => {
          warn!("row delivered with no handler registered; dropping");
          return;
        },
      }
    };
    handler(item);
    let request = {
      let mut state = self.state.lock();
      if state.handler_epoch == epoch && state.item_handler.is_none() && !state.phase.is_terminal()
      {
        state.item_handler = Some(handler);
      }
      state.replenish()
    };
    issue(request);
  }

  fn deliver_complete(&self) {
    let handler = {
      let mut state = self.state.lock();
      if state.phase.is_terminal() {
        return;
      }
      state.phase = StreamPhase::Ended;
      let handler = state.end_handler.take();
      state.drop_handlers();
      state.handle = None;
      handler
    };
    if let Some(handler) = handler {
      handler();
    }
  }

  fn deliver_error(&self, error: ResultError) {
    let handler = {
      let mut state = self.state.lock();
      if state.phase.is_terminal() {
        return;
      }
      state.phase = StreamPhase::Failed;
      let handler = state.error_handler.take();
      state.drop_handlers();
      state.handle = None;
      handler
    };
    match handler {
      | Some(mut handler) => handler(error),
      | None => error!(%error, "row stream failed with no error handler registered"),
    }
  }
}
