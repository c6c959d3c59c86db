//! Dead-letter reprocessing tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use futures::StreamExt;
use tokio::sync::watch;

use claimflow::domain::{ClaimType, IngestError, SequenceNumberRange, TransportError};
use claimflow::metrics::SourceMetrics;
use claimflow::sink::{ClaimSink, DeadLetterEntry, DeadLetterStatus, ErrorLedger};
use claimflow::source::{ClaimStreamCaller, DeadLetterReprocessor, ResponseStream};

#[derive(Clone, Debug, PartialEq)]
struct Record {
    sequence_number: u64,
    claim_id: String,
}

/// Caller whose stream contents depend on the requested cursor.
struct ReplayCaller {
    version: String,
    served_range: SequenceNumberRange,
    by_since: HashMap<u64, Vec<Result<Record, TransportError>>>,
}

#[async_trait]
impl ClaimStreamCaller for ReplayCaller {
    type Message = Record;

    fn claim_type(&self) -> ClaimType {
        ClaimType::Institutional
    }

    async fn call_version_service(&self) -> Result<String, IngestError> {
        Ok(self.version.clone())
    }

    async fn call_sequence_range_service(&self) -> Result<SequenceNumberRange, IngestError> {
        Ok(self.served_range)
    }

    async fn call_service(
        &self,
        since: u64,
        shutdown: watch::Receiver<bool>,
    ) -> Result<ResponseStream<Record>, IngestError> {
        let items = self.by_since.get(&since).cloned().unwrap_or_default();
        Ok(ResponseStream::new(
            futures::stream::iter(items).boxed(),
            shutdown,
            |_| {},
        ))
    }

    fn is_delete_message(&self, _message: &Record) -> bool {
        false
    }

    fn is_valid_message(&self, _message: &Record) -> bool {
        true
    }

    fn claim_id_for(&self, message: &Record) -> String {
        message.claim_id.clone()
    }

    fn sequence_number_for(&self, message: &Record) -> u64 {
        message.sequence_number
    }
}

#[derive(Default)]
struct MemoryLedger {
    entries: Mutex<Vec<DeadLetterEntry>>,
}

impl MemoryLedger {
    fn with_unresolved(sequences: &[u64]) -> Self {
        let ledger = Self::default();
        {
            let mut entries = ledger.entries.lock().unwrap();
            for &sequence_number in sequences {
                entries.push(DeadLetterEntry {
                    sequence_number,
                    claim_type: ClaimType::Institutional,
                    status: DeadLetterStatus::Unresolved,
                    updated_at: Utc::now(),
                });
            }
        }
        ledger
    }

    fn status_of(&self, sequence_number: u64) -> DeadLetterStatus {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.sequence_number == sequence_number)
            .map(|e| e.status)
            .unwrap()
    }
}

#[async_trait]
impl ErrorLedger for MemoryLedger {
    async fn find_by_claim_type_and_status(
        &self,
        claim_type: ClaimType,
        status: DeadLetterStatus,
    ) -> Result<Vec<DeadLetterEntry>, IngestError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.claim_type == claim_type && e.status == status)
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        claim_type: ClaimType,
        sequence_number: u64,
        status: DeadLetterStatus,
    ) -> Result<u64, IngestError> {
        let mut entries = self.entries.lock().unwrap();
        let mut updated = 0;
        for entry in entries.iter_mut() {
            if entry.claim_type == claim_type && entry.sequence_number == sequence_number {
                entry.status = status;
                entry.updated_at = Utc::now();
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete_older_than(
        &self,
        claim_type: ClaimType,
        cutoff: chrono::DateTime<Utc>,
    ) -> Result<u64, IngestError> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.claim_type != claim_type || e.updated_at >= cutoff);
        Ok((before - entries.len()) as u64)
    }
}

#[derive(Default)]
struct MemorySink {
    written: Mutex<Vec<Record>>,
}

#[async_trait]
impl ClaimSink<Record> for MemorySink {
    async fn write_batch(
        &self,
        _api_version: &str,
        batch: Vec<Record>,
    ) -> Result<u64, IngestError> {
        let written = batch.len() as u64;
        self.written.lock().unwrap().extend(batch);
        Ok(written)
    }

    async fn read_max_sequence_number(&self) -> Result<Option<u64>, IngestError> {
        Ok(None)
    }

    async fn update_sequence_range(&self, _range: SequenceNumberRange) -> Result<(), IngestError> {
        Ok(())
    }

    async fn shutdown(&self, _timeout: Duration) -> Result<(), IngestError> {
        Ok(())
    }

    fn processed_count_since_start(&self) -> u64 {
        0
    }
}

fn reprocessor(
    caller: ReplayCaller,
    ledger: MemoryLedger,
) -> DeadLetterReprocessor<ReplayCaller, MemoryLedger> {
    let (_tx, rx) = watch::channel(false);
    DeadLetterReprocessor::new(
        caller,
        ledger,
        "^0.15.0".parse().unwrap(),
        60,
        Arc::new(SourceMetrics::new()),
        rx,
    )
}

fn record(sequence_number: u64, claim_id: &str) -> Result<Record, TransportError> {
    Ok(Record {
        sequence_number,
        claim_id: claim_id.to_string(),
    })
}

#[tokio::test]
async fn test_entry_resolved_when_upstream_still_serves_it() {
    let caller = ReplayCaller {
        version: "0.15.1".to_string(),
        served_range: SequenceNumberRange::new(0, 200),
        by_since: HashMap::from([(41, vec![record(42, "A")])]),
    };
    let ledger = MemoryLedger::with_unresolved(&[42]);
    let reprocessor = reprocessor(caller, ledger);
    let sink = MemorySink::default();

    let processed = reprocessor.reprocess(&sink).await.unwrap();

    assert_eq!(processed, 1);
    assert_eq!(sink.written.lock().unwrap().len(), 1);
    assert_eq!(reprocessor.ledger().status_of(42), DeadLetterStatus::Resolved);
}

#[tokio::test]
async fn test_entry_obsolete_when_upstream_skips_it() {
    // The upstream's first record past since=41 is 45, so 42 is gone.
    let caller = ReplayCaller {
        version: "0.15.1".to_string(),
        served_range: SequenceNumberRange::new(0, 200),
        by_since: HashMap::from([(41, vec![record(45, "A")])]),
    };
    let ledger = MemoryLedger::with_unresolved(&[42]);
    let reprocessor = reprocessor(caller, ledger);
    let sink = MemorySink::default();

    let processed = reprocessor.reprocess(&sink).await.unwrap();

    assert_eq!(processed, 0);
    assert!(sink.written.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_entry_obsolete_on_empty_stream() {
    let caller = ReplayCaller {
        version: "0.15.1".to_string(),
        served_range: SequenceNumberRange::new(0, 200),
        by_since: HashMap::from([(41, vec![])]),
    };
    let ledger = MemoryLedger::with_unresolved(&[42]);
    let reprocessor = reprocessor(caller, ledger);
    let sink = MemorySink::default();

    reprocessor.reprocess(&sink).await.unwrap();
    assert_eq!(reprocessor.ledger().status_of(42), DeadLetterStatus::Obsolete);
}

#[tokio::test]
async fn test_transport_error_leaves_entry_unresolved() {
    let caller = ReplayCaller {
        version: "0.15.1".to_string(),
        served_range: SequenceNumberRange::new(0, 200),
        by_since: HashMap::from([
            (
                41,
                vec![Err::<Record, _>(TransportError::new(
                    claimflow::domain::TransportErrorKind::Other,
                    "boom",
                ))],
            ),
            (99, vec![record(100, "B")]),
        ]),
    };
    let ledger = MemoryLedger::with_unresolved(&[42, 100]);
    let reprocessor = reprocessor(caller, ledger);
    let sink = MemorySink::default();

    // The pass continues past the failed entry and resolves the next one.
    let processed = reprocessor.reprocess(&sink).await.unwrap();
    assert_eq!(processed, 1);
    assert_eq!(
        reprocessor.ledger().status_of(42),
        DeadLetterStatus::Unresolved
    );
    assert_eq!(
        reprocessor.ledger().status_of(100),
        DeadLetterStatus::Resolved
    );
}

#[tokio::test]
async fn test_version_mismatch_fails_pass() {
    let caller = ReplayCaller {
        version: "0.99.0".to_string(),
        served_range: SequenceNumberRange::new(0, 200),
        by_since: HashMap::new(),
    };
    let ledger = MemoryLedger::with_unresolved(&[42]);
    let reprocessor = reprocessor(caller, ledger);
    let sink = MemorySink::default();

    let err = reprocessor.reprocess(&sink).await.unwrap_err();
    assert!(matches!(*err.source, IngestError::VersionMismatch { .. }));
}

#[tokio::test]
async fn test_stale_entries_are_pruned() {
    let caller = ReplayCaller {
        version: "0.15.1".to_string(),
        served_range: SequenceNumberRange::new(0, 200),
        by_since: HashMap::new(),
    };
    let ledger = MemoryLedger::default();
    {
        let mut entries = ledger.entries.lock().unwrap();
        entries.push(DeadLetterEntry {
            sequence_number: 7,
            claim_type: ClaimType::Institutional,
            status: DeadLetterStatus::Resolved,
            updated_at: Utc::now() - ChronoDuration::days(90),
        });
        entries.push(DeadLetterEntry {
            sequence_number: 8,
            claim_type: ClaimType::Institutional,
            status: DeadLetterStatus::Obsolete,
            updated_at: Utc::now(),
        });
    }
    let reprocessor = reprocessor(caller, ledger);
    let sink = MemorySink::default();

    reprocessor.reprocess(&sink).await.unwrap();

    let remaining = reprocessor.ledger().entries.lock().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].sequence_number, 8);
}

#[tokio::test]
async fn test_statuses_after_mixed_pass() {
    let caller = ReplayCaller {
        version: "0.15.1".to_string(),
        served_range: SequenceNumberRange::new(0, 200),
        by_since: HashMap::from([
            (41, vec![record(42, "A")]),
            (49, vec![record(55, "B")]),
        ]),
    };
    let ledger = MemoryLedger::with_unresolved(&[42, 50]);
    let reprocessor = reprocessor(caller, ledger);
    let sink = MemorySink::default();

    reprocessor.reprocess(&sink).await.unwrap();

    let ledger = reprocessor.ledger();
    assert_eq!(ledger.status_of(42), DeadLetterStatus::Resolved);
    assert_eq!(ledger.status_of(50), DeadLetterStatus::Obsolete);
}

// Interrupted shutdown stops the pass without touching remaining entries.
#[tokio::test]
async fn test_shutdown_before_pass_leaves_entries_untouched() {
    let caller = ReplayCaller {
        version: "0.15.1".to_string(),
        served_range: SequenceNumberRange::new(0, 200),
        by_since: HashMap::from([(41, vec![record(42, "A")])]),
    };
    let ledger = MemoryLedger::with_unresolved(&[42]);
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();
    let reprocessor = DeadLetterReprocessor::new(
        caller,
        ledger,
        "^0.15.0".parse().unwrap(),
        60,
        Arc::new(SourceMetrics::new()),
        rx,
    );
    let sink = MemorySink::default();

    let processed = reprocessor.reprocess(&sink).await.unwrap();
    assert_eq!(processed, 0);
    assert_eq!(
        reprocessor.ledger().status_of(42),
        DeadLetterStatus::Unresolved
    );
}

#[tokio::test]
async fn test_entry_below_retained_window_is_obsolete_without_fetching() {
    let caller = ReplayCaller {
        version: "0.15.1".to_string(),
        served_range: SequenceNumberRange::new(50, 200),
        by_since: HashMap::new(),
    };
    let ledger = MemoryLedger::with_unresolved(&[42]);
    let reprocessor = reprocessor(caller, ledger);
    let sink = MemorySink::default();

    let processed = reprocessor.reprocess(&sink).await.unwrap();

    assert_eq!(processed, 0);
    assert!(sink.written.lock().unwrap().is_empty());
    assert_eq!(reprocessor.ledger().status_of(42), DeadLetterStatus::Obsolete);
}
