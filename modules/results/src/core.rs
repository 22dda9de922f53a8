/// Bounded and unbounded list collector.
mod collect_sink;
/// Completion polling types.
mod completion;
/// Demand model types.
mod demand;
/// Producer-side demand operations.
mod demand_control;
/// Consumer-owned demand handle.
mod demand_handle;
/// Outstanding-demand accounting.
mod demand_tracker;
/// First-row collector.
mod head_sink;
/// Mapped one-shot future adapter.
mod mapped_future;
/// Per-row transform decorator.
mod mapped_source;
/// Caller facade binding a source to one consumption shape.
mod query_results;
/// Result bridge error definitions.
mod result_error;
/// One-shot result future.
mod result_future;
/// One-shot result promise.
mod result_promise;
/// Row consumer callbacks.
mod row_consumer;
/// Row source abstraction.
mod row_source;
/// Pausable push stream.
mod row_stream;
/// Stream flow-control configuration.
mod row_stream_config;
/// Pull adapter over a row stream.
mod row_stream_reader;
/// Failure payload for sources and transforms.
mod source_error;
/// Stream lifecycle phases.
mod stream_phase;
/// In-memory sources for tests and demos.
pub mod testing;

pub use collect_sink::CollectSink;
pub use completion::Completion;
pub use demand::Demand;
pub use demand_control::DemandControl;
pub use demand_handle::DemandHandle;
pub use demand_tracker::DemandTracker;
pub use head_sink::HeadSink;
pub use mapped_future::MappedFuture;
pub use mapped_source::{MappedSource, RowTransform};
pub use query_results::QueryResults;
pub use result_error::ResultError;
pub use result_future::ResultFuture;
pub use result_promise::ResultPromise;
pub use row_consumer::RowConsumer;
pub use row_source::{BoxSource, RowSource};
pub use row_stream::RowStream;
pub use row_stream_config::RowStreamConfig;
pub use row_stream_reader::RowStreamReader;
pub use source_error::SourceError;
pub use stream_phase::StreamPhase;
