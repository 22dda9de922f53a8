/// Script-driven producer for interleaving tests.
mod manual_source;
/// Demand-correct in-memory source with a negotiation probe.
mod vec_source;

pub use manual_source::{ManualSource, ManualSourceProbe};
pub use vec_source::{SourceProbe, VecSource};
