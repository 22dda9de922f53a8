use std::sync::Arc;

use parking_lot::Mutex;

use super::VecSource;
use crate::core::{
  result_error::ResultError, row_consumer::RowConsumer, row_source::RowSource,
  source_error::SourceError,
};

#[derive(Debug, PartialEq, Eq)]
enum Event {
  Item(u32),
  Complete,
  Error(ResultError),
}

#[derive(Default)]
struct RecordingConsumer {
  events: Mutex<Vec<Event>>,
}

impl RowConsumer<u32> for RecordingConsumer {
  fn on_item(&self, item: u32) {
    self.events.lock().push(Event::Item(item));
  }

  fn on_complete(&self) {
    self.events.lock().push(Event::Complete);
  }

  fn on_error(&self, error: ResultError) {
    self.events.lock().push(Event::Error(error));
  }
}

#[test]
fn emits_only_under_granted_demand() {
  let mut source = VecSource::new([1, 2, 3]);
  let consumer = Arc::new(RecordingConsumer::default());
  let handle = source.attach(consumer.clone()).expect("attach");

  assert!(consumer.events.lock().is_empty());
  assert!(handle.request(1).is_ok());
  assert_eq!(*consumer.events.lock(), vec![Event::Item(1)]);

  assert!(handle.request(2).is_ok());
  assert_eq!(
    *consumer.events.lock(),
    vec![Event::Item(1), Event::Item(2), Event::Item(3), Event::Complete]
  );
}

#[test]
fn fails_after_the_last_row_when_configured() {
  let mut source = VecSource::failing([1], SourceError::new("boom"));
  let consumer = Arc::new(RecordingConsumer::default());
  let handle = source.attach(consumer.clone()).expect("attach");
  assert!(handle.request(5).is_ok());
  assert_eq!(
    *consumer.events.lock(),
    vec![
      Event::Item(1),
      Event::Error(ResultError::Source(SourceError::new("boom")))
    ]
  );
}

#[test]
fn cancellation_stops_emission() {
  let mut source = VecSource::new([1, 2, 3]);
  let probe = source.probe();
  let consumer = Arc::new(RecordingConsumer::default());
  let handle = source.attach(consumer.clone()).expect("attach");
  assert!(handle.request(1).is_ok());
  handle.cancel();
  assert!(handle.request(5).is_ok());
  assert_eq!(*consumer.events.lock(), vec![Event::Item(1)]);
  assert!(probe.is_cancelled());
  assert_eq!(probe.requests(), vec![1]);
}

#[test]
fn records_requests_in_order() {
  let mut source = VecSource::new([1, 2, 3, 4, 5, 6]);
  let probe = source.probe();
  let consumer = Arc::new(RecordingConsumer::default());
  let handle = source.attach(consumer).expect("attach");
  assert!(handle.request(2).is_ok());
  assert!(handle.request(3).is_ok());
  assert_eq!(probe.requests(), vec![2, 3]);
}

#[test]
fn rejects_a_second_attachment() {
  let mut source = VecSource::new([1]);
  let consumer = Arc::new(RecordingConsumer::default());
  assert!(source.attach(consumer.clone()).is_ok());
  assert_eq!(source.attach(consumer).err(), Some(ResultError::AlreadyAttached));
}

#[test]
fn first_view_serves_at_most_one_row() {
  let source = VecSource::new([1, 2, 3]);
  let mut narrowed = source.boxed().first_view();
  let consumer = Arc::new(RecordingConsumer::default());
  let handle = narrowed.attach(consumer.clone()).expect("attach");
  assert!(handle.request(10).is_ok());
  assert_eq!(*consumer.events.lock(), vec![Event::Item(1), Event::Complete]);
}
