//! Sequence number types and cursor resolution
//!
//! Every change record carries a monotonically increasing sequence number
//! assigned by the source API. The sequence number doubles as the durable
//! resumption cursor: the sink persists the highest sequence number it has
//! ingested and the next invocation resumes strictly after it.

use serde::{Deserialize, Serialize};

/// Lowest sequence number the source API will ever assign.
///
/// Requesting a stream since this value returns the full history.
pub const MIN_SEQUENCE_NUMBER: u64 = 0;

/// The upstream sequence number bounds reported by the range-info service.
///
/// Pushed to the sink before each batch submission so ingestion lag can be
/// observed downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceNumberRange {
    /// Lowest sequence number currently retained upstream
    pub min: u64,
    /// Highest sequence number currently assigned upstream
    pub max: u64,
}

impl SequenceNumberRange {
    /// Create a new range
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Whether the given sequence number falls within the range (inclusive)
    pub fn contains(&self, sequence_number: u64) -> bool {
        sequence_number >= self.min && sequence_number <= self.max
    }
}

/// Resolve the starting sequence number for an ingestion run.
///
/// The source API's "since" parameter is exclusive: requesting `since = N`
/// returns records after `N`, never `N` itself. An operator-supplied
/// override names the first sequence number the operator wants back, so it
/// must be decremented by one. A checkpoint read from the sink is already
/// the highest ingested value and is passed through unchanged. With neither,
/// ingestion starts from the beginning of the retained stream.
pub fn starting_sequence_number(operator_override: Option<u64>, checkpoint: Option<u64>) -> u64 {
    match operator_override {
        Some(sequence_number) => sequence_number
            .saturating_sub(1)
            .max(MIN_SEQUENCE_NUMBER),
        None => checkpoint.unwrap_or(MIN_SEQUENCE_NUMBER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_is_decremented() {
        assert_eq!(starting_sequence_number(Some(100), None), 99);
        assert_eq!(starting_sequence_number(Some(100), Some(5000)), 99);
    }

    #[test]
    fn test_override_never_underflows() {
        assert_eq!(starting_sequence_number(Some(0), None), MIN_SEQUENCE_NUMBER);
    }

    #[test]
    fn test_checkpoint_passed_through_unchanged() {
        assert_eq!(starting_sequence_number(None, Some(250)), 250);
    }

    #[test]
    fn test_defaults_to_minimum() {
        assert_eq!(starting_sequence_number(None, None), MIN_SEQUENCE_NUMBER);
    }

    #[test]
    fn test_range_contains() {
        let range = SequenceNumberRange::new(10, 20);
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }
}
