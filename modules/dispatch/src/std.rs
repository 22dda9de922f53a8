/// Tokio-backed callback executor.
mod tokio_executor;

pub use tokio_executor::TokioExecutor;
