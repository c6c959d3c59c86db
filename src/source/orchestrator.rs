//! Ingestion orchestration.
//!
//! [`IngestionOrchestrator`] drives one caller/sink pair: it gates on the
//! upstream API version, resolves the starting cursor, reads the change
//! stream, coalesces records into batches, and classifies how the stream
//! ended. Teardown always runs; a partial batch survives a dropped
//! connection but not an interrupt.

use std::sync::Arc;
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::domain::{
    starting_sequence_number, IngestError, ProcessingError, StreamError, VersionRequirement,
};
use crate::metrics::{SourceMetrics, UptimeState};
use crate::sink::ClaimSink;
use crate::source::caller::ClaimStreamCaller;

/// Upper bound on waiting for a sink to drain at teardown.
const SINK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(300);

/// Number of records sampled by a smoke test.
const SMOKE_TEST_SAMPLES: usize = 3;

/// Tuning knobs for one orchestrator.
#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    /// Version range the upstream must satisfy.
    pub version_requirement: VersionRequirement,
    /// Operator override for the starting cursor. `None` resumes from the
    /// sink's checkpoint.
    pub starting_sequence_number: Option<u64>,
    /// Connections dropped after at least this much idle time are benign.
    pub min_idle_before_connection_drop: Duration,
    /// Maximum records coalesced into one batch.
    pub max_per_batch: usize,
    /// Whether the upstream is a remote server, enabling smoke-test calls.
    pub remote_server: bool,
}

/// Drives ingestion from one [`ClaimStreamCaller`] into a [`ClaimSink`].
pub struct IngestionOrchestrator<C: ClaimStreamCaller> {
    caller: C,
    settings: OrchestratorSettings,
    metrics: Arc<SourceMetrics>,
    shutdown: watch::Receiver<bool>,
}

impl<C: ClaimStreamCaller> IngestionOrchestrator<C> {
    pub fn new(
        caller: C,
        settings: OrchestratorSettings,
        metrics: Arc<SourceMetrics>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            caller,
            settings,
            metrics,
            shutdown,
        }
    }

    pub fn metrics(&self) -> &Arc<SourceMetrics> {
        &self.metrics
    }

    /// Verifies connectivity without ingesting anything durable.
    ///
    /// Always reads the sink checkpoint. Against a remote server it also
    /// gates the API version, opens a stream at the resume cursor, samples a
    /// few records, and cancels the call.
    pub async fn smoke_test<S: ClaimSink<C::Message>>(&self, sink: &S) -> Result<(), IngestError> {
        let checkpoint = sink.read_max_sequence_number().await?;
        if !self.settings.remote_server {
            return Ok(());
        }
        let version = self.check_api_version().await?;
        info!(claim_type = %self.caller.claim_type(), version, "smoke test: version accepted");
        let range = self.caller.call_sequence_range_service().await?;
        info!(
            upstream_min = range.min,
            upstream_max = range.max,
            checkpoint,
            "smoke test: upstream sequence range"
        );
        let since = starting_sequence_number(self.settings.starting_sequence_number, checkpoint);
        let mut stream = self
            .caller
            .call_service(since, self.shutdown.clone())
            .await?;
        for _ in 0..SMOKE_TEST_SAMPLES {
            match stream.next().await {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(StreamError::Interrupted) => break,
                Err(error) => {
                    stream.cancel("smoke test failed");
                    return Err(IngestError::Stream(error));
                }
            }
        }
        stream.cancel("smoke test complete");
        Ok(())
    }

    /// Runs one full ingestion pass and returns the number of records
    /// persisted.
    ///
    /// Teardown always runs: the stream is cancelled, any flushable partial
    /// batch is written, and the sink is drained with a bounded wait.
    /// Records persisted before a failure are reported inside the error.
    pub async fn retrieve_and_process<S: ClaimSink<C::Message>>(
        &self,
        sink: &S,
    ) -> Result<u64, ProcessingError> {
        self.metrics.record_call();
        self.metrics.set_uptime(UptimeState::Running);
        let mut processed: u64 = 0;

        let mut error = match self.ingest(sink, &mut processed).await {
            Ok(interrupted) => {
                if interrupted {
                    info!(claim_type = %self.caller.claim_type(), "ingestion interrupted by shutdown");
                }
                None
            }
            Err(error) => Some(error),
        };

        self.metrics.set_uptime(UptimeState::Stopped);
        if let Err(shutdown_error) = sink.shutdown(SINK_SHUTDOWN_TIMEOUT).await {
            if error.is_none() {
                error = Some(shutdown_error);
            } else {
                error!(error = %shutdown_error, "sink shutdown failed during teardown");
            }
        }
        processed += sink.processed_count_since_start();

        match error {
            None => {
                self.metrics.record_success();
                info!(claim_type = %self.caller.claim_type(), processed, "ingestion pass complete");
                Ok(processed)
            }
            Some(error) => {
                self.metrics.record_failure();
                Err(ProcessingError::new(error, processed))
            }
        }
    }

    async fn ingest<S: ClaimSink<C::Message>>(
        &self,
        sink: &S,
        processed: &mut u64,
    ) -> Result<bool, IngestError> {
        let api_version = self.check_api_version().await?;
        let checkpoint = sink.read_max_sequence_number().await?;
        let since = starting_sequence_number(self.settings.starting_sequence_number, checkpoint);
        info!(
            claim_type = %self.caller.claim_type(),
            since,
            checkpoint,
            "opening change stream"
        );

        let mut stream = self
            .caller
            .call_service(since, self.shutdown.clone())
            .await?;
        let mut batch: IndexMap<String, C::Message> = IndexMap::new();
        let mut last_received = Instant::now();
        let mut flush_batch = true;
        let mut interrupted = false;
        let mut error: Option<IngestError> = None;

        loop {
            match stream.next().await {
                Ok(Some(message)) => {
                    self.metrics.set_uptime(UptimeState::Receiving);
                    last_received = Instant::now();
                    self.metrics.record_objects_received(1);
                    if self.caller.is_delete_message(&message) {
                        self.metrics.record_delete_skipped();
                        warn!(
                            sequence_number = self.caller.sequence_number_for(&message),
                            "skipping delete record"
                        );
                        continue;
                    }
                    if !self.caller.is_valid_message(&message) {
                        self.metrics.record_invalid_skipped();
                        warn!(
                            sequence_number = self.caller.sequence_number_for(&message),
                            "skipping structurally invalid record"
                        );
                        continue;
                    }
                    // Last write wins per claim id within a batch.
                    batch.insert(self.caller.claim_id_for(&message), message);
                    if batch.len() >= self.settings.max_per_batch {
                        match self.submit_batch(sink, &api_version, &mut batch).await {
                            Ok(written) => *processed += written,
                            Err(submit_error) => {
                                error = Some(submit_error);
                                flush_batch = false;
                                break;
                            }
                        }
                    }
                }
                Ok(None) => break,
                Err(StreamError::Interrupted) => {
                    interrupted = true;
                    flush_batch = false;
                    break;
                }
                Err(StreamError::DroppedConnection(message)) => {
                    // The partial batch is still flushed either way.
                    let idle = last_received.elapsed();
                    if idle >= self.settings.min_idle_before_connection_drop {
                        info!(
                            idle_millis = idle.as_millis() as u64,
                            "connection dropped after idle period, ending pass"
                        );
                    } else {
                        error = Some(IngestError::Stream(StreamError::DroppedConnection(
                            message,
                        )));
                    }
                    break;
                }
                Err(stream_error) => {
                    error = Some(IngestError::Stream(stream_error));
                    flush_batch = false;
                    break;
                }
            }
        }

        stream.cancel("ingestion pass ending");
        if flush_batch && !batch.is_empty() {
            match self.submit_batch(sink, &api_version, &mut batch).await {
                Ok(written) => *processed += written,
                Err(flush_error) => {
                    if error.is_none() {
                        error = Some(flush_error);
                    } else {
                        error!(error = %flush_error, "final batch flush failed during teardown");
                    }
                }
            }
        }

        match error {
            Some(error) => Err(error),
            None => Ok(interrupted),
        }
    }

    async fn submit_batch<S: ClaimSink<C::Message>>(
        &self,
        sink: &S,
        api_version: &str,
        batch: &mut IndexMap<String, C::Message>,
    ) -> Result<u64, IngestError> {
        if batch.is_empty() {
            return Ok(0);
        }
        let records: Vec<C::Message> = batch.drain(..).map(|(_, message)| message).collect();
        // The upstream's currently served range, so the sink can observe lag.
        let served = self.caller.call_sequence_range_service().await?;
        sink.update_sequence_range(served).await?;
        let written = sink.write_batch(api_version, records).await?;
        self.metrics.record_batch();
        self.metrics.record_objects_stored(written);
        self.metrics.set_uptime(UptimeState::Running);
        info!(
            written,
            upstream_min = served.min,
            upstream_max = served.max,
            "batch written"
        );
        Ok(written)
    }

    async fn check_api_version(&self) -> Result<String, IngestError> {
        let observed = self.caller.call_version_service().await?;
        if self.settings.version_requirement.allows(&observed) {
            Ok(observed)
        } else {
            Err(IngestError::VersionMismatch {
                observed,
                required: self.settings.version_requirement.to_string(),
            })
        }
    }
}
