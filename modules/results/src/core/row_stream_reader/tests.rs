use std::sync::Arc;

use brook_dispatch_rs::core::InlineExecutor;
use futures_util::StreamExt;

use crate::core::{
  result_error::ResultError,
  row_stream::RowStream,
  row_stream_config::RowStreamConfig,
  source_error::SourceError,
  testing::{ManualSource, VecSource},
};

fn reader_over<T: Send + 'static>(
  source: crate::core::row_source::BoxSource<T>,
  config: RowStreamConfig,
) -> super::RowStreamReader<T> {
  RowStream::attach(source, Arc::new(InlineExecutor::new()), config)
    .expect("attach")
    .into_reader()
}

#[tokio::test]
async fn yields_rows_in_order_then_ends() {
  let source = VecSource::new([1, 2, 3]);
  let mut reader = reader_over(source.boxed(), RowStreamConfig::default());
  assert_eq!(reader.next().await, Some(Ok(1)));
  assert_eq!(reader.next().await, Some(Ok(2)));
  assert_eq!(reader.next().await, Some(Ok(3)));
  assert_eq!(reader.next().await, None);
}

#[tokio::test]
async fn fetches_in_batch_increments() {
  let source = VecSource::new([1, 2]);
  let probe = source.probe();
  let config = RowStreamConfig::new().with_batch_size(2).expect("batch size");
  let mut reader = reader_over(source.boxed(), config);
  assert_eq!(reader.next().await, Some(Ok(1)));
  // The second row was prefetched with the first batch.
  assert_eq!(probe.requests(), vec![2]);
  assert_eq!(reader.next().await, Some(Ok(2)));
  assert_eq!(reader.next().await, None);
}

#[tokio::test]
async fn failure_is_yielded_once_then_the_stream_ends() {
  let source = VecSource::failing([1], SourceError::new("cursor lost"));
  let mut reader = reader_over(source.boxed(), RowStreamConfig::default());
  assert_eq!(reader.next().await, Some(Ok(1)));
  assert_eq!(
    reader.next().await,
    Some(Err(ResultError::Source(SourceError::new("cursor lost"))))
  );
  assert_eq!(reader.next().await, None);
}

#[tokio::test]
async fn collects_through_stream_combinators() {
  let source = VecSource::new([1, 2, 3, 4]);
  let reader = reader_over(source.boxed(), RowStreamConfig::default());
  let rows: Vec<_> = reader.map(|entry| entry.expect("row")).collect().await;
  assert_eq!(rows, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn dropping_the_reader_disposes_the_stream() {
  let source = ManualSource::<u32>::new();
  let probe = source.probe();
  let reader = reader_over(source.boxed(), RowStreamConfig::default());
  assert!(!probe.is_cancelled());
  drop(reader);
  assert!(probe.is_cancelled());
}
