use std::sync::Arc;

use brook_dispatch_rs::core::{InlineExecutor, ManualExecutor, SharedExecutor};

use super::HeadSink;
use crate::core::{
  completion::Completion,
  result_error::ResultError,
  source_error::SourceError,
  testing::{ManualSource, VecSource},
};

fn inline() -> SharedExecutor {
  Arc::new(InlineExecutor::new())
}

#[test]
fn resolves_with_the_first_row() {
  let source = VecSource::new([1, 2, 3]);
  let probe = source.probe();
  let future = HeadSink::run(source.boxed(), inline());
  assert_eq!(future.poll_now(), Completion::Ready(Ok(Some(1))));
  assert_eq!(probe.requests(), vec![1]);
  assert!(probe.is_cancelled());
}

#[test]
fn empty_source_resolves_absent() {
  let source = VecSource::<u32>::new([]);
  let future = HeadSink::run(source.boxed(), inline());
  assert_eq!(future.poll_now(), Completion::Ready(Ok(None)));
}

#[test]
fn source_failure_fails_the_future() {
  let source = VecSource::<u32>::failing([], SourceError::new("connection reset"));
  let future = HeadSink::run(source.boxed(), inline());
  assert_eq!(
    future.poll_now(),
    Completion::Ready(Err(ResultError::Source(SourceError::new("connection reset"))))
  );
}

#[test]
fn row_racing_completion_wins() {
  let executor = ManualExecutor::new();
  let source = ManualSource::new();
  let probe = source.probe();
  let future = HeadSink::run(source.boxed(), Arc::new(executor.clone()));
  assert_eq!(probe.requests(), vec![1]);

  // Row and completion land in the same pump pass; the row arrived first.
  probe.emit(7);
  probe.complete();
  executor.run_all();

  assert_eq!(future.poll_now(), Completion::Ready(Ok(Some(7))));
  assert!(probe.is_cancelled());
}

#[test]
fn late_error_after_settlement_is_dropped() {
  let executor = ManualExecutor::new();
  let source = ManualSource::new();
  let probe = source.probe();
  let future = HeadSink::run(source.boxed(), Arc::new(executor.clone()));

  probe.emit(1);
  probe.fail(SourceError::new("late failure"));
  executor.run_all();

  assert_eq!(future.poll_now(), Completion::Ready(Ok(Some(1))));
}

#[test]
fn extra_rows_after_the_first_are_dropped() {
  let executor = ManualExecutor::new();
  let source = ManualSource::new();
  let probe = source.probe();
  let future = HeadSink::run(source.boxed(), Arc::new(executor.clone()));

  probe.emit(1);
  probe.emit(2);
  probe.emit(3);
  executor.run_all();

  assert_eq!(future.poll_now(), Completion::Ready(Ok(Some(1))));
}
