//! Normalized claim model
//!
//! The normalized claim is the validated, typed projection of a raw change
//! record from the source API. It is created fresh per transformation, never
//! mutated after the transformer returns it, and its ownership passes to the
//! sink.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Claim types served by the source API.
///
/// Each claim type runs its own orchestrator/reprocessor instance; the type
/// is also the partition key of the error ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimType {
    /// Institutional (facility) claims
    Institutional,
    /// Professional claims
    Professional,
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClaimType::Institutional => write!(f, "institutional"),
            ClaimType::Professional => write!(f, "professional"),
        }
    }
}

/// The kind of change a record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Insert,
    Update,
    Delete,
}

/// A normalized claim plus its change-envelope metadata.
///
/// Generic over the claim payload so the envelope can be shared across claim
/// types.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimChange<T> {
    /// Sequence number assigned by the source API
    pub sequence_number: u64,
    /// Kind of change the record represents
    pub change_type: ChangeType,
    /// The validated claim payload
    pub claim: T,
    /// Timestamp the change was emitted upstream, when present
    pub timestamp: Option<DateTime<Utc>>,
}

/// Validated institutional claim.
///
/// A representative field set: the transformation engine is generic and an
/// exhaustive field catalogue is a non-goal. Required string fields default
/// to empty until the transformer populates them; a claim with transform
/// errors is never handed to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionalClaim {
    /// Claim control number, the claim identifier
    pub claim_id: String,
    /// Health insurance claim number
    pub hic_number: String,
    /// Current claim status code
    pub curr_status: String,
    /// Current processing location, first component
    pub curr_location1: String,
    /// Current processing location, second component
    pub curr_location2: String,
    /// Medicare provider identifier
    pub medicare_provider_id: Option<String>,
    /// Provider state code
    pub provider_state: Option<String>,
    /// Total submitted charge amount
    pub total_charge_amount: Option<Decimal>,
    /// Date the claim was received
    pub received_date: Option<NaiveDate>,
    /// Date of the most recent claim transaction
    pub curr_tran_date: Option<NaiveDate>,
    /// Admitting diagnosis code
    pub admit_diag_code: Option<String>,
    /// Principal diagnosis code
    pub principle_diag: Option<String>,
    /// National provider identifier
    pub npi_number: Option<String>,
    /// Federal tax number of the billing provider
    pub federal_tax_number: Option<String>,
    /// Source system phase
    pub phase: Option<String>,
    /// Source system phase sequence
    pub phase_seq_number: Option<u32>,
    /// Timestamp the source system transmitted the record
    pub transmission_timestamp: Option<DateTime<Utc>>,
    /// Date the record was extracted from the source system
    pub extract_date: Option<NaiveDate>,
    /// When this projection was produced
    pub last_updated: DateTime<Utc>,
}

impl InstitutionalClaim {
    /// Create an empty claim scaffold stamped with the given time.
    ///
    /// Intended for the claim transformer, which fills fields in as each
    /// copy succeeds.
    pub fn new(last_updated: DateTime<Utc>) -> Self {
        Self {
            claim_id: String::new(),
            hic_number: String::new(),
            curr_status: String::new(),
            curr_location1: String::new(),
            curr_location2: String::new(),
            medicare_provider_id: None,
            provider_state: None,
            total_charge_amount: None,
            received_date: None,
            curr_tran_date: None,
            admit_diag_code: None,
            principle_diag: None,
            npi_number: None,
            federal_tax_number: None,
            phase: None,
            phase_seq_number: None,
            transmission_timestamp: None,
            extract_date: None,
            last_updated,
        }
    }
}
