use std::sync::Arc;

use brook_dispatch_rs::std::TokioExecutor;
use brook_results_rs::{
  core::{QueryResults, RowStreamConfig},
  std::TaskSource,
};
use futures_util::StreamExt;
use tokio::runtime::Handle;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
  tracing_subscriber::fmt().with_env_filter("info").init();

  // The producer lives on its own task, the way a driver's I/O loop would.
  let source = TaskSource::new(Handle::current(), |emitter| async move {
    for row in 1..=10_u32 {
      emitter.emit(row).await?;
    }
    Ok(())
  });

  let executor = Arc::new(TokioExecutor::current());
  let config = RowStreamConfig::new().with_batch_size(3).expect("batch size");
  let stream = QueryResults::new(source.boxed(), executor)
    .map(|row| row * 100)
    .with_config(config)
    .stream()
    .expect("stream");

  let mut reader = stream.into_reader();
  while let Some(row) = reader.next().await {
    match row {
      | Ok(row) => tracing::info!(row, "received"),
      | Err(error) => tracing::error!(%error, "stream failed"),
    }
  }
  tracing::info!("stream ended");
}
