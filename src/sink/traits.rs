//! Sink trait seam.
//!
//! The orchestrator writes batches through [`ClaimSink`] without knowing
//! whether the implementation writes synchronously or queues work to
//! background writers.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{IngestError, SequenceNumberRange};

/// Destination for validated claim batches.
///
/// `M` is the wire message type written by the source; implementations own
/// the transformation from wire to storage form.
#[async_trait]
pub trait ClaimSink<M: Send + 'static>: Send + Sync {
    /// Writes one coalesced batch and returns how many records were
    /// persisted synchronously.
    ///
    /// Queueing sinks may return 0 here and report the drained count later
    /// through [`ClaimSink::processed_count_since_start`].
    async fn write_batch(&self, api_version: &str, batch: Vec<M>) -> Result<u64, IngestError>;

    /// Highest sequence number already persisted, or `None` on first run.
    async fn read_max_sequence_number(&self) -> Result<Option<u64>, IngestError>;

    /// Records the sequence range the upstream currently serves, captured
    /// just before a batch is written. Comparing it against the sink's own
    /// checkpoint exposes how far ingestion lags the source.
    async fn update_sequence_range(
        &self,
        range: SequenceNumberRange,
    ) -> Result<(), IngestError>;

    /// Drains in-flight work, waiting at most `timeout`.
    async fn shutdown(&self, timeout: Duration) -> Result<(), IngestError>;

    /// Records persisted asynchronously since startup that were not counted
    /// by a `write_batch` return value. Synchronous sinks return 0.
    fn processed_count_since_start(&self) -> u64;
}
