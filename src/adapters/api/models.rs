//! Wire-level record types received from the upstream change-stream API.
//!
//! These mirror the upstream payload shape before validation: required fields
//! arrive as plain strings that may still violate length rules, coded fields
//! arrive as enum/raw-string pairs, and amounts and dates arrive as strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::transform::enums::CanonicalEnum;

/// Change kind as carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WireChangeType {
    Insert,
    Update,
    Delete,
}

/// Upstream claim status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimStatusCode {
    Move,
    Active,
    Suspend,
    Rtp,
    Reject,
    Unrecognized,
}

impl CanonicalEnum for ClaimStatusCode {
    fn canonical(&self) -> Option<&'static str> {
        match self {
            ClaimStatusCode::Move => Some("M"),
            ClaimStatusCode::Active => Some("A"),
            ClaimStatusCode::Suspend => Some("S"),
            ClaimStatusCode::Rtp => Some("T"),
            ClaimStatusCode::Reject => Some("R"),
            ClaimStatusCode::Unrecognized => None,
        }
    }
}

/// Upstream processing-type code for the first current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingTypeCode {
    Batch,
    Manual,
    Offline,
    Suspense,
    Unrecognized,
}

impl CanonicalEnum for ProcessingTypeCode {
    fn canonical(&self) -> Option<&'static str> {
        match self {
            ProcessingTypeCode::Batch => Some("B"),
            ProcessingTypeCode::Manual => Some("M"),
            ProcessingTypeCode::Offline => Some("O"),
            ProcessingTypeCode::Suspense => Some("S"),
            ProcessingTypeCode::Unrecognized => None,
        }
    }
}

/// Upstream current-location code for the second current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentLocationCode {
    Cable,
    Driver,
    Unrecognized,
}

impl CanonicalEnum for CurrentLocationCode {
    fn canonical(&self) -> Option<&'static str> {
        match self {
            CurrentLocationCode::Cable => Some("CABLE"),
            CurrentLocationCode::Driver => Some("DRIVR"),
            CurrentLocationCode::Unrecognized => None,
        }
    }
}

/// Provenance metadata attached by the upstream extract process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSource {
    pub phase: Option<String>,
    pub phase_seq_number: Option<u32>,
    pub transmission_timestamp: Option<DateTime<Utc>>,
    pub extract_date: Option<String>,
}

/// An institutional claim as received on the wire.
///
/// Coded fields carry an enum slot and a raw-string fallback; exactly one is
/// normally populated per record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalClaimRecord {
    pub claim_id: Option<String>,
    pub hic_number: Option<String>,
    pub curr_status_enum: Option<ClaimStatusCode>,
    pub curr_status_unrecognized: Option<String>,
    pub curr_location1_enum: Option<ProcessingTypeCode>,
    pub curr_location1_unrecognized: Option<String>,
    pub curr_location2_enum: Option<CurrentLocationCode>,
    pub curr_location2_unrecognized: Option<String>,
    pub medicare_provider_id: Option<String>,
    pub provider_state: Option<String>,
    pub total_charge_amount: Option<String>,
    pub received_date: Option<String>,
    pub curr_tran_date: Option<String>,
    pub admit_diag_code: Option<String>,
    pub principle_diag: Option<String>,
    pub npi_number: Option<String>,
    pub federal_tax_number: Option<String>,
}

/// One change-stream record: a sequence position plus the claim payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimChangeRecord {
    pub sequence_number: u64,
    pub change_type: WireChangeType,
    pub timestamp: Option<DateTime<Utc>>,
    pub claim: InstitutionalClaimRecord,
    #[serde(default)]
    pub source: RecordSource,
}

impl ClaimChangeRecord {
    /// True for records that carry a claim payload worth storing.
    pub fn is_claim_bearing(&self) -> bool {
        self.change_type != WireChangeType::Delete
    }
}
