//! Dead-letter reprocessing.
//!
//! Replays parked sequence numbers one record at a time. For each unresolved
//! ledger entry the reprocessor opens a fresh stream positioned just before
//! the parked sequence, reads a single record, and either re-writes it
//! (resolved) or discovers the upstream no longer serves it (obsolete).

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::domain::{IngestError, ProcessingError, StreamError, VersionRequirement};
use crate::metrics::SourceMetrics;
use crate::sink::{ClaimSink, DeadLetterStatus, ErrorLedger};
use crate::source::caller::ClaimStreamCaller;

const SINK_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(300);

/// Replays dead-letter entries for one claim type.
pub struct DeadLetterReprocessor<C: ClaimStreamCaller, L: ErrorLedger> {
    caller: C,
    ledger: L,
    version_requirement: VersionRequirement,
    /// Entries older than this many days are pruned after a pass.
    max_age_days: i64,
    metrics: Arc<SourceMetrics>,
    shutdown: watch::Receiver<bool>,
}

impl<C: ClaimStreamCaller, L: ErrorLedger> DeadLetterReprocessor<C, L> {
    pub fn new(
        caller: C,
        ledger: L,
        version_requirement: VersionRequirement,
        max_age_days: i64,
        metrics: Arc<SourceMetrics>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            caller,
            ledger,
            version_requirement,
            max_age_days,
            metrics,
            shutdown,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Runs one repair pass over every unresolved entry, then prunes stale
    /// ones. Returns the number of records re-written.
    pub async fn reprocess<S: ClaimSink<C::Message>>(
        &self,
        sink: &S,
    ) -> Result<u64, ProcessingError> {
        self.metrics.record_call();
        let mut processed: u64 = 0;
        let mut error = match self.run(sink, &mut processed).await {
            Ok(()) => None,
            Err(error) => Some(error),
        };

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
                Ok(processed)
            }
            Some(error) => {
                self.metrics.record_failure();
                Err(ProcessingError::new(error, processed))
            }
        }
    }

    async fn run<S: ClaimSink<C::Message>>(
        &self,
        sink: &S,
        processed: &mut u64,
    ) -> Result<(), IngestError> {
        let claim_type = self.caller.claim_type();
        let entries = self
            .ledger
            .find_by_claim_type_and_status(claim_type, DeadLetterStatus::Unresolved)
            .await?;
        if entries.is_empty() {
            info!(%claim_type, "no unresolved dead-letter entries");
        } else {
            let api_version = self.check_api_version().await?;
            let served = self.caller.call_sequence_range_service().await?;
            info!(
                %claim_type,
                entries = entries.len(),
                upstream_min = served.min,
                upstream_max = served.max,
                "reprocessing dead-letter entries"
            );
            for entry in &entries {
                // Below the retained window there is nothing left to fetch.
                if entry.sequence_number < served.min {
                    self.ledger
                        .update_status(
                            claim_type,
                            entry.sequence_number,
                            DeadLetterStatus::Obsolete,
                        )
                        .await?;
                    self.metrics.record_dead_letter_obsolete();
                    continue;
                }
                match self
                    .reprocess_entry(sink, &api_version, entry.sequence_number)
                    .await
                {
                    Ok(Outcome::Resolved(written)) => {
                        *processed += written;
                        self.ledger
                            .update_status(
                                claim_type,
                                entry.sequence_number,
                                DeadLetterStatus::Resolved,
                            )
                            .await?;
                        self.metrics.record_dead_letter_resolved();
                    }
                    Ok(Outcome::Obsolete) => {
                        self.ledger
                            .update_status(
                                claim_type,
                                entry.sequence_number,
                                DeadLetterStatus::Obsolete,
                            )
                            .await?;
                        self.metrics.record_dead_letter_obsolete();
                    }
                    Ok(Outcome::Interrupted) => {
                        info!(%claim_type, "dead-letter pass interrupted by shutdown");
                        break;
                    }
                    Err(error) => {
                        // Leave the entry unresolved for the next pass.
                        warn!(
                            sequence_number = entry.sequence_number,
                            error = %error,
                            "dead-letter entry failed to reprocess"
                        );
                    }
                }
            }
        }

        let cutoff = Utc::now() - chrono::Duration::days(self.max_age_days);
        let pruned = self.ledger.delete_older_than(claim_type, cutoff).await?;
        if pruned > 0 {
            info!(%claim_type, pruned, "pruned stale dead-letter entries");
        }
        Ok(())
    }

    async fn reprocess_entry<S: ClaimSink<C::Message>>(
        &self,
        sink: &S,
        api_version: &str,
        sequence_number: u64,
    ) -> Result<Outcome, IngestError> {
        let since = sequence_number.saturating_sub(1);
        let mut stream = self
            .caller
            .call_service(since, self.shutdown.clone())
            .await?;
        let result = stream.next().await;
        stream.cancel("single record repair complete");
        match result {
            Ok(Some(message)) => {
                if self.caller.sequence_number_for(&message) == sequence_number {
                    let written = sink.write_batch(api_version, vec![message]).await?;
                    self.metrics.record_objects_stored(written);
                    Ok(Outcome::Resolved(written))
                } else {
                    // The upstream skipped past the parked sequence.
                    Ok(Outcome::Obsolete)
                }
            }
            Ok(None) => Ok(Outcome::Obsolete),
            Err(StreamError::Interrupted) => Ok(Outcome::Interrupted),
            Err(error) => Err(IngestError::Stream(error)),
        }
    }

    async fn check_api_version(&self) -> Result<String, IngestError> {
        let observed = self.caller.call_version_service().await?;
        if self.version_requirement.allows(&observed) {
            Ok(observed)
        } else {
            Err(IngestError::VersionMismatch {
                observed,
                required: self.version_requirement.to_string(),
            })
        }
    }
}

enum Outcome {
    Resolved(u64),
    Obsolete,
    Interrupted,
}
