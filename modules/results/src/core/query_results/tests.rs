use std::sync::Arc;

use brook_dispatch_rs::core::{InlineExecutor, ManualExecutor, SharedExecutor};
use parking_lot::Mutex;

use super::QueryResults;
use crate::core::{
  completion::Completion,
  result_error::ResultError,
  row_stream_config::RowStreamConfig,
  source_error::SourceError,
  stream_phase::StreamPhase,
  testing::VecSource,
};

fn inline() -> SharedExecutor {
  Arc::new(InlineExecutor::new())
}

#[test]
fn first_takes_one_row_and_cancels() {
  let source = VecSource::new([1, 2, 3]);
  let probe = source.probe();
  let future = QueryResults::new(source.boxed(), inline()).first();
  assert_eq!(future.poll_now(), Completion::Ready(Ok(Some(1))));
  assert_eq!(probe.requests(), vec![1]);
  assert!(probe.is_cancelled());
}

#[test]
fn first_on_an_empty_result_set_is_success() {
  let source = VecSource::<u32>::new([]);
  let future = QueryResults::new(source.boxed(), inline()).first();
  assert_eq!(future.poll_now(), Completion::Ready(Ok(None)));
}

#[test]
fn all_returns_rows_in_emission_order() {
  let source = VecSource::new([1, 2, 3]);
  let future = QueryResults::new(source.boxed(), inline()).all();
  assert_eq!(future.poll_now(), Completion::Ready(Ok(vec![1, 2, 3])));
}

#[test]
fn take_caps_the_row_count() {
  let source = VecSource::new([1, 2, 3]);
  let probe = source.probe();
  let future = QueryResults::new(source.boxed(), inline()).take(2);
  assert_eq!(future.poll_now(), Completion::Ready(Ok(vec![1, 2])));
  assert!(probe.is_cancelled());
}

#[test]
fn take_zero_resolves_immediately() {
  let source = VecSource::new([1, 2, 3]);
  let probe = source.probe();
  let future = QueryResults::new(source.boxed(), inline()).take(0);
  assert_eq!(future.poll_now(), Completion::Ready(Ok(Vec::new())));
  assert!(probe.requests().is_empty());
}

#[test]
fn map_transforms_every_row() {
  let source = VecSource::new([1, 2, 3]);
  let future = QueryResults::new(source.boxed(), inline()).map(|row| row * 2).all();
  assert_eq!(future.poll_now(), Completion::Ready(Ok(vec![2, 4, 6])));
}

#[test]
fn map_composes_with_first() {
  let source = VecSource::new([5, 6]);
  let probe = source.probe();
  let future = QueryResults::new(source.boxed(), inline()).map(|row| row + 1).first();
  assert_eq!(future.poll_now(), Completion::Ready(Ok(Some(6))));
  assert_eq!(probe.requests(), vec![1]);
}

#[test]
fn try_map_failure_fails_the_attachment() {
  let source = VecSource::new([1, 2]);
  let future = QueryResults::new(source.boxed(), inline())
    .try_map(|row| {
      if row == 2 {
        return Err(SourceError::new("bad document"));
      }
      Ok(row)
    })
    .all();
  assert_eq!(
    future.poll_now(),
    Completion::Ready(Err(ResultError::Transform(SourceError::new("bad document"))))
  );
}

#[test]
fn stream_shape_consumes_the_execution() {
  let executor = ManualExecutor::new();
  let source = VecSource::new([1, 2, 3]);
  let results =
    QueryResults::new(source.boxed(), Arc::new(executor.clone()));
  let stream = results.stream().expect("stream");

  let seen = Arc::new(Mutex::new(Vec::new()));
  let sink = seen.clone();
  stream.handler(move |row| sink.lock().push(row));
  executor.run_all();

  assert_eq!(*seen.lock(), vec![1, 2, 3]);
  assert_eq!(stream.phase(), StreamPhase::Ended);
}

#[test]
fn stream_honors_the_configured_batch_size() {
  let source = VecSource::new([1, 2, 3, 4]);
  let probe = source.probe();
  let config = RowStreamConfig::new().with_batch_size(4).expect("batch size");
  let executor = ManualExecutor::new();
  let stream = QueryResults::new(source.boxed(), Arc::new(executor.clone()))
    .with_config(config)
    .stream()
    .expect("stream");
  stream.handler(|_row| {});
  executor.run_all();
  assert_eq!(probe.requests().first(), Some(&4));
}
