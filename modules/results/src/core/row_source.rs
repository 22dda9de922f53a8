use std::sync::Arc;

use crate::core::{
  demand_handle::DemandHandle, result_error::ResultError, row_consumer::RowConsumer,
};

/// Boxed row source.
pub type BoxSource<T> = Box<dyn RowSource<T>>;

/// Demand-based source of query result rows.
///
/// A source emits nothing until granted demand through the handle returned
/// from [`attach`](Self::attach), delivers rows in emission order, and
/// accepts exactly one attachment per logical execution.
pub trait RowSource<T>: Send {
  /// Attaches the consumer for this source's single execution.
  ///
  /// # Errors
  ///
  /// Returns [`ResultError::AlreadyAttached`] when a consumer was already
  /// attached.
  fn attach(&mut self, consumer: Arc<dyn RowConsumer<T>>) -> Result<DemandHandle, ResultError>;

  /// Narrows this source to a view yielding at most its first row.
  ///
  /// Sources that can serve a single row more cheaply return a narrowed
  /// source; others return themselves unchanged and let the consumer bound
  /// demand. Decorators forward the capability to their inner source.
  fn first_view(self: Box<Self>) -> BoxSource<T>;
}
