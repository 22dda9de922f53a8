use std::sync::Arc;

use brook_dispatch_rs::core::InlineExecutor;
use brook_results_rs::core::{Completion, QueryResults, testing::VecSource};

fn main() {
  let source = VecSource::new(["ada", "grace", "edsger"].map(String::from));
  let probe = source.probe();

  let results = QueryResults::new(source.boxed(), Arc::new(InlineExecutor::new()));
  let first = results.map(|name| name.to_uppercase()).first();

  match first.poll_now() {
    | Completion::Ready(Ok(Some(name))) => println!("first row: {name}"),
    | Completion::Ready(Ok(None)) => println!("no rows matched"),
    | Completion::Ready(Err(error)) => eprintln!("query failed: {error}"),
    | Completion::Pending => unreachable!("inline executor settles synchronously"),
  }
  println!("producer observed requests {:?}, cancelled: {}", probe.requests(), probe.is_cancelled());
}
