//! Application layer: the launch loop and its retry classifier.
//!
//! - [`orchestrator`] - State-machine driven launch loop
//! - [`classifier`] - Healthy-node count and retry/abort decision

pub mod classifier;
pub mod orchestrator;

pub use classifier::{classify, Classification, RetryDecision};
pub use orchestrator::{AttemptOutcome, AttemptRecord, LoopState, Orchestrator};
