use brook_dispatch_rs::core::SharedExecutor;

use crate::core::{
  collect_sink::CollectSink,
  head_sink::HeadSink,
  mapped_source::MappedSource,
  result_error::ResultError,
  result_future::ResultFuture,
  row_source::{BoxSource, RowSource},
  row_stream::RowStream,
  row_stream_config::RowStreamConfig,
  source_error::SourceError,
};

#[cfg(test)]
mod tests;

/// One query execution's results, ready to be consumed in exactly one shape.
///
/// The facade owns the source for its single attachment; each consumption
/// method takes `self`, so one logical execution is consumed through exactly
/// one of the future shapes or the push stream.
pub struct QueryResults<T> {
  source:   BoxSource<T>,
  executor: SharedExecutor,
  config:   RowStreamConfig,
}

impl<T> QueryResults<T>
where
  T: Send + 'static,
{
  /// Binds a source to the executor its callbacks are delivered on.
  #[must_use]
  pub fn new(source: BoxSource<T>, executor: SharedExecutor) -> Self {
    Self { source, executor, config: RowStreamConfig::default() }
  }

  /// Replaces the stream flow-control configuration.
  #[must_use]
  pub fn with_config(mut self, config: RowStreamConfig) -> Self {
    self.config = config;
    self
  }

  /// Applies an infallible per-row transform.
  #[must_use]
  pub fn map<O, F>(self, transform: F) -> QueryResults<O>
  where
    O: Send + 'static,
    F: Fn(T) -> O + Send + Sync + 'static, {
    self.try_map(move |item| Ok(transform(item)))
  }

  /// Applies a fallible per-row transform.
  ///
  /// A transform failure fails the attachment; see
  /// [`MappedSource`](crate::core::MappedSource).
  #[must_use]
  pub fn try_map<O, F>(self, transform: F) -> QueryResults<O>
  where
    O: Send + 'static,
    F: Fn(T) -> Result<O, SourceError> + Send + Sync + 'static, {
    QueryResults {
      source:   Box::new(MappedSource::new(self.source, transform)),
      executor: self.executor,
      config:   self.config,
    }
  }

  /// Resolves with the first row, or `None` when the query matched nothing.
  ///
  /// The source is narrowed through its first-row view and cancelled as soon
  /// as one row arrives.
  #[must_use]
  pub fn first(self) -> ResultFuture<Option<T>> {
    HeadSink::run(self.source.first_view(), self.executor)
  }

  /// Resolves with every row in emission order.
  #[must_use]
  pub fn all(self) -> ResultFuture<Vec<T>> {
    CollectSink::run(self.source, None, self.executor)
  }

  /// Resolves with up to `limit` rows in emission order.
  ///
  /// The source is cancelled once the limit is reached; a limit of zero
  /// resolves immediately with an empty list.
  #[must_use]
  pub fn take(self, limit: u64) -> ResultFuture<Vec<T>> {
    CollectSink::run(self.source, Some(limit), self.executor)
  }

  /// Exposes the results as a pausable push stream.
  ///
  /// # Errors
  ///
  /// Returns [`ResultError::AlreadyAttached`] when the source was attached
  /// elsewhere.
  pub fn stream(self) -> Result<RowStream<T>, ResultError> {
    RowStream::attach(self.source, self.executor, self.config)
  }
}
