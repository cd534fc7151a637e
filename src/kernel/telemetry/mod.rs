//! Observability surface for the UI layer.
//!
//! The journal is a side-effect layer: it is written by the analyzer and the
//! director, and must never be read back inside decision logic.

pub mod event;
pub mod metrics;
pub mod recorder;
