use std::sync::Arc;

use brook_dispatch_rs::core::{InlineExecutor, ManualExecutor, SharedExecutor};
use brook_results_rs::core::{
  Completion, QueryResults, ResultError, SourceError, StreamPhase,
  testing::{ManualSource, VecSource},
};
use parking_lot::Mutex;

fn inline() -> SharedExecutor {
  Arc::new(InlineExecutor::new())
}

#[test]
fn three_row_producer_supports_every_consumption_shape() {
  // first() takes one row and cancels the rest.
  let source = VecSource::new([1, 2, 3]);
  let probe = source.probe();
  let first = QueryResults::new(source.boxed(), inline()).first();
  assert_eq!(first.poll_now(), Completion::Ready(Ok(Some(1))));
  assert!(probe.is_cancelled());

  // all() drains the producer in emission order.
  let source = VecSource::new([1, 2, 3]);
  let all = QueryResults::new(source.boxed(), inline()).all();
  assert_eq!(all.poll_now(), Completion::Ready(Ok(vec![1, 2, 3])));

  // take(2) stops and cancels after the second row.
  let source = VecSource::new([1, 2, 3]);
  let probe = source.probe();
  let some = QueryResults::new(source.boxed(), inline()).take(2);
  assert_eq!(some.poll_now(), Completion::Ready(Ok(vec![1, 2])));
  assert!(probe.is_cancelled());
}

#[test]
fn empty_producer_resolves_successfully() {
  let source = VecSource::<u32>::new([]);
  let first = QueryResults::new(source.boxed(), inline()).first();
  assert_eq!(first.poll_now(), Completion::Ready(Ok(None)));

  let source = VecSource::<u32>::new([]);
  let all = QueryResults::new(source.boxed(), inline()).all();
  assert_eq!(all.poll_now(), Completion::Ready(Ok(Vec::new())));
}

#[test]
fn mid_stream_failure_discards_accumulated_rows() {
  let source = VecSource::failing([1], SourceError::new("cursor lost"));
  let all = QueryResults::new(source.boxed(), inline()).all();
  assert_eq!(
    all.poll_now(),
    Completion::Ready(Err(ResultError::Source(SourceError::new("cursor lost"))))
  );
}

#[test]
fn settlement_is_exactly_once_under_adversarial_signals() {
  // Emission, completion, failure, and extra rows all race through one pump
  // pass; only the first applicable outcome may win.
  let executor = ManualExecutor::new();
  let source = ManualSource::new();
  let probe = source.probe();
  let future =
    QueryResults::new(source.boxed(), Arc::new(executor.clone()) as SharedExecutor).take(2);

  probe.emit(1);
  probe.emit(2);
  probe.complete();
  probe.emit(3);
  probe.fail(SourceError::new("late"));
  executor.run_all();

  assert_eq!(future.poll_now(), Completion::Ready(Ok(vec![1, 2])));
}

#[test]
fn failure_beats_later_rows() {
  let executor = ManualExecutor::new();
  let source = ManualSource::new();
  let probe = source.probe();
  let future =
    QueryResults::new(source.boxed(), Arc::new(executor.clone()) as SharedExecutor).all();

  probe.emit(1);
  probe.fail(SourceError::new("cursor lost"));
  probe.emit(2);
  probe.complete();
  executor.run_all();

  assert_eq!(
    future.poll_now(),
    Completion::Ready(Err(ResultError::Source(SourceError::new("cursor lost"))))
  );
}

#[test]
fn push_stream_walkthrough() {
  let executor = ManualExecutor::new();
  let source = ManualSource::new();
  let probe = source.probe();
  let stream = QueryResults::new(source.boxed(), Arc::new(executor.clone()) as SharedExecutor)
    .stream()
    .expect("stream");

  let seen = Arc::new(Mutex::new(Vec::new()));
  let ended = Arc::new(Mutex::new(false));
  let sink = seen.clone();
  stream.handler(move |row| sink.lock().push(row));
  let end_flag = ended.clone();
  stream.end_handler(move || *end_flag.lock() = true);

  probe.emit(1);
  executor.run_all();
  stream.pause();
  probe.emit(2);
  executor.run_all();
  assert_eq!(*seen.lock(), vec![1, 2]);
  assert_eq!(stream.phase(), StreamPhase::Paused);

  assert!(stream.fetch(1).is_ok());
  probe.emit(3);
  executor.run_all();
  assert_eq!(*seen.lock(), vec![1, 2, 3]);
  assert_eq!(stream.phase(), StreamPhase::Paused);

  stream.resume();
  probe.emit(4);
  probe.complete();
  executor.run_all();
  assert_eq!(*seen.lock(), vec![1, 2, 3, 4]);
  assert!(*ended.lock());
  assert_eq!(stream.phase(), StreamPhase::Ended);

  // Disposal after natural completion stays silent.
  stream.dispose();
  assert!(!probe.is_cancelled());
}
