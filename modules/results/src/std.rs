/// Tokio-task-backed row source.
mod task_source;

pub use task_source::{Emitter, TaskSource};
