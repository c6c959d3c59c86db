//! Change-stream ingestion.
//!
//! The ingestion loop is generic over a [`ClaimStreamCaller`] (how records
//! arrive) and a [`crate::sink::ClaimSink`] (where they go). The
//! [`IngestionOrchestrator`] composes the two for normal streaming;
//! [`DeadLetterReprocessor`] replays parked sequence numbers one at a time.

pub mod caller;
pub mod dlq;
pub mod orchestrator;
pub mod stream;

pub use caller::ClaimStreamCaller;
pub use dlq::DeadLetterReprocessor;
pub use orchestrator::{IngestionOrchestrator, OrchestratorSettings};
pub use stream::ResponseStream;
