//! Institutional claim transformation.
//!
//! Converts wire-level [`ClaimChangeRecord`]s into validated domain
//! [`ClaimChange`]s, reporting every field failure in one pass.

use chrono::{DateTime, Utc};

use crate::adapters::api::models::{
    ClaimChangeRecord, ClaimStatusCode, CurrentLocationCode, InstitutionalClaimRecord,
    ProcessingTypeCode, WireChangeType,
};
use crate::domain::claim::{ChangeType, ClaimChange, InstitutionalClaim};
use crate::transform::engine::{FieldTransformer, TransformError};
use crate::transform::enums::EnumExtractor;

/// Clock source, injectable for deterministic tests.
pub type Clock = fn() -> DateTime<Utc>;

/// Transforms wire institutional claim records into domain claims.
pub struct InstitutionalClaimTransformer {
    clock: Clock,
    curr_status: EnumExtractor<InstitutionalClaimRecord, ClaimStatusCode>,
    curr_location1: EnumExtractor<InstitutionalClaimRecord, ProcessingTypeCode>,
    curr_location2: EnumExtractor<InstitutionalClaimRecord, CurrentLocationCode>,
}

impl Default for InstitutionalClaimTransformer {
    fn default() -> Self {
        Self::new(Utc::now)
    }
}

impl InstitutionalClaimTransformer {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            curr_status: EnumExtractor::new(
                |m: &InstitutionalClaimRecord| m.curr_status_enum.is_some(),
                |m: &InstitutionalClaimRecord| m.curr_status_enum.unwrap_or(ClaimStatusCode::Unrecognized),
                |m: &InstitutionalClaimRecord| m.curr_status_unrecognized.is_some(),
                |m: &InstitutionalClaimRecord| m.curr_status_unrecognized.clone().unwrap_or_default(),
            ),
            curr_location1: EnumExtractor::new(
                |m: &InstitutionalClaimRecord| m.curr_location1_enum.is_some(),
                |m: &InstitutionalClaimRecord| {
                    m.curr_location1_enum.unwrap_or(ProcessingTypeCode::Unrecognized)
                },
                |m: &InstitutionalClaimRecord| m.curr_location1_unrecognized.is_some(),
                |m: &InstitutionalClaimRecord| {
                    m.curr_location1_unrecognized.clone().unwrap_or_default()
                },
            ),
            curr_location2: EnumExtractor::new(
                |m: &InstitutionalClaimRecord| m.curr_location2_enum.is_some(),
                |m: &InstitutionalClaimRecord| {
                    m.curr_location2_enum.unwrap_or(CurrentLocationCode::Unrecognized)
                },
                |m: &InstitutionalClaimRecord| m.curr_location2_unrecognized.is_some(),
                |m: &InstitutionalClaimRecord| {
                    m.curr_location2_unrecognized.clone().unwrap_or_default()
                },
            ),
        }
    }

    /// Validates and converts one change record.
    ///
    /// Every field is checked before returning, so the error lists all
    /// failures at once.
    pub fn transform(
        &self,
        record: &ClaimChangeRecord,
    ) -> Result<ClaimChange<InstitutionalClaim>, TransformError> {
        let wire = &record.claim;
        let mut claim = InstitutionalClaim::new((self.clock)());
        let mut t = FieldTransformer::new();

        t.copy_string("claimId", false, 1, 23, wire.claim_id.as_deref(), |v| {
            claim.claim_id = v;
        });
        t.copy_string("hicNo", false, 1, 12, wire.hic_number.as_deref(), |v| {
            claim.hic_number = v;
        });
        t.copy_enum_as_string(
            "currStatus",
            false,
            1,
            1,
            self.curr_status.extract(wire),
            |v| claim.curr_status = v,
        );
        t.copy_enum_as_string(
            "currLoc1",
            false,
            1,
            1,
            self.curr_location1.extract(wire),
            |v| claim.curr_location1 = v,
        );
        t.copy_enum_as_string(
            "currLoc2",
            false,
            1,
            5,
            self.curr_location2.extract(wire),
            |v| claim.curr_location2 = v,
        );
        t.copy_string(
            "medaProvId",
            true,
            1,
            13,
            wire.medicare_provider_id.as_deref(),
            |v| claim.medicare_provider_id = Some(v),
        );
        t.copy_string(
            "provStateCd",
            true,
            1,
            2,
            wire.provider_state.as_deref(),
            |v| claim.provider_state = Some(v),
        );
        t.copy_optional_amount(
            "totalChargeAmount",
            wire.total_charge_amount.is_some(),
            wire.total_charge_amount.as_deref().unwrap_or(""),
            |v| claim.total_charge_amount = Some(v),
        );
        t.copy_optional_date(
            "recdDtCymd",
            wire.received_date.is_some(),
            wire.received_date.as_deref().unwrap_or(""),
            |v| claim.received_date = Some(v),
        );
        t.copy_optional_date(
            "currTranDtCymd",
            wire.curr_tran_date.is_some(),
            wire.curr_tran_date.as_deref().unwrap_or(""),
            |v| claim.curr_tran_date = Some(v),
        );
        t.copy_string(
            "admDiagCode",
            true,
            1,
            7,
            wire.admit_diag_code.as_deref(),
            |v| claim.admit_diag_code = Some(v),
        );
        t.copy_string(
            "principleDiag",
            true,
            1,
            7,
            wire.principle_diag.as_deref(),
            |v| claim.principle_diag = Some(v),
        );
        t.copy_string("npiNumber", true, 1, 10, wire.npi_number.as_deref(), |v| {
            claim.npi_number = Some(v);
        });
        t.copy_string(
            "fedTaxNb",
            true,
            1,
            10,
            wire.federal_tax_number.as_deref(),
            |v| claim.federal_tax_number = Some(v),
        );
        t.fail_if_errors()?;

        claim.phase = record.source.phase.clone();
        claim.phase_seq_number = record.source.phase_seq_number;
        claim.transmission_timestamp = record.source.transmission_timestamp;
        if let Some(extract_date) = record.source.extract_date.as_deref() {
            claim.extract_date = chrono::NaiveDate::parse_from_str(extract_date, "%Y-%m-%d").ok();
        }

        Ok(ClaimChange {
            sequence_number: record.sequence_number,
            change_type: match record.change_type {
                WireChangeType::Insert => ChangeType::Insert,
                WireChangeType::Update => ChangeType::Update,
                WireChangeType::Delete => ChangeType::Delete,
            },
            claim,
            timestamp: record.timestamp,
        })
    }
}
