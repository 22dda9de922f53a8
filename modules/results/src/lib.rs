//! Demand-negotiated bridge from pull-based row sources to push-style
//! consumption shapes.
//!
//! A query execution hands over a [`core::RowSource`]: a source that emits
//! nothing until granted demand and that can be cancelled mid-flight. This
//! crate turns one such source into exactly one of three shapes (a one-shot
//! future for the first row, a one-shot future for a bounded row list, or a
//! long-lived pausable push stream) while marshaling every producer callback
//! onto a caller-owned execution context and settling each logical request
//! exactly once.

pub mod core;
pub mod std;
