//! Dead-letter ledger.
//!
//! Records that failed ingestion are parked in an error ledger keyed by
//! claim type and sequence number. The reprocessor re-fetches each parked
//! sequence one at a time and marks the entry resolved or obsolete.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ClaimType, IngestError};

/// Lifecycle state of a dead-letter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeadLetterStatus {
    /// Parked and awaiting repair.
    Unresolved,
    /// Re-fetched and written successfully.
    Resolved,
    /// The upstream no longer serves this sequence number.
    Obsolete,
}

impl std::fmt::Display for DeadLetterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeadLetterStatus::Unresolved => write!(f, "UNRESOLVED"),
            DeadLetterStatus::Resolved => write!(f, "RESOLVED"),
            DeadLetterStatus::Obsolete => write!(f, "OBSOLETE"),
        }
    }
}

/// One parked record in the error ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadLetterEntry {
    pub sequence_number: u64,
    pub claim_type: ClaimType,
    pub status: DeadLetterStatus,
    pub updated_at: DateTime<Utc>,
}

/// Storage for dead-letter entries.
#[async_trait]
pub trait ErrorLedger: Send + Sync {
    /// Entries of the given type and status, ordered by sequence number.
    async fn find_by_claim_type_and_status(
        &self,
        claim_type: ClaimType,
        status: DeadLetterStatus,
    ) -> Result<Vec<DeadLetterEntry>, IngestError>;

    /// Moves one entry to a new status, returning how many rows changed.
    async fn update_status(
        &self,
        claim_type: ClaimType,
        sequence_number: u64,
        status: DeadLetterStatus,
    ) -> Result<u64, IngestError>;

    /// Prunes entries last updated before `cutoff`, returning the count
    /// removed.
    async fn delete_older_than(
        &self,
        claim_type: ClaimType,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, IngestError>;
}
