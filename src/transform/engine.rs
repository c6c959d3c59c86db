//! Field-level validation and copying engine.
//!
//! [`FieldTransformer`] accumulates validation errors across every field of a
//! record instead of failing on the first one, so a single transformation pass
//! reports everything wrong with an incoming claim at once.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::transform::enums::EnumResult;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the field that failed validation.
    pub field: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Aggregated validation failure for one record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transformation failed with {} errors", .errors.len())]
pub struct TransformError {
    pub errors: Vec<FieldError>,
}

impl TransformError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

/// Accumulates field copies and validation errors for one record.
///
/// Each `copy_*` method validates its input and, when valid, hands the parsed
/// value to a caller-supplied setter closure. Invalid inputs record a
/// [`FieldError`] and skip the setter. Call [`FieldTransformer::fail_if_errors`]
/// once all fields have been copied.
#[derive(Default)]
pub struct FieldTransformer {
    errors: Vec<FieldError>,
}

impl FieldTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field has failed validation so far.
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors accumulated so far, in field order.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Records an error produced outside the `copy_*` helpers.
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Consumes the transformer, returning `Err` when any field failed.
    pub fn fail_if_errors(self) -> Result<(), TransformError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(TransformError::new(self.errors))
        }
    }

    /// Copies a string field, enforcing nullability and length bounds.
    pub fn copy_string(
        &mut self,
        field: &str,
        nullable: bool,
        min_length: usize,
        max_length: usize,
        value: Option<&str>,
        copier: impl FnOnce(String),
    ) -> &mut Self {
        match value {
            None => {
                if !nullable {
                    self.add_error(field, "is null");
                }
            }
            Some(value) => {
                if self.length_ok(field, min_length, max_length, value) {
                    copier(value.to_string());
                }
            }
        }
        self
    }

    /// Copies an optional string field only when the source reports it present.
    pub fn copy_optional_string(
        &mut self,
        field: &str,
        min_length: usize,
        max_length: usize,
        exists: bool,
        value: &str,
        copier: impl FnOnce(String),
    ) -> &mut Self {
        if exists {
            self.copy_string(field, true, min_length, max_length, Some(value), copier);
        }
        self
    }

    /// Copies a string field that must match an expected value exactly.
    ///
    /// On mismatch the error carries a masked diff rather than the raw values,
    /// keeping claim identifiers out of logs.
    pub fn copy_string_with_expected(
        &mut self,
        field: &str,
        nullable: bool,
        min_length: usize,
        max_length: usize,
        value: Option<&str>,
        expected: &str,
        copier: impl FnOnce(String),
    ) -> &mut Self {
        let mut matched = true;
        if let Some(actual) = value {
            if actual != expected {
                matched = false;
                self.add_error(
                    field,
                    format!("value mismatch: masked={}", masked_diff(expected, actual)),
                );
            }
        }
        if matched {
            self.copy_string(field, nullable, min_length, max_length, value, copier);
        }
        self
    }

    /// Parses and copies a required decimal amount field.
    pub fn copy_amount(
        &mut self,
        field: &str,
        nullable: bool,
        value: Option<&str>,
        copier: impl FnOnce(Decimal),
    ) -> &mut Self {
        match value {
            None => {
                if !nullable {
                    self.add_error(field, "is null");
                }
            }
            Some(value) => match value.parse::<Decimal>() {
                Ok(amount) => copier(amount),
                Err(_) => self.add_error(field, "invalid amount"),
            },
        }
        self
    }

    /// Parses and copies an optional decimal amount field.
    pub fn copy_optional_amount(
        &mut self,
        field: &str,
        exists: bool,
        value: &str,
        copier: impl FnOnce(Decimal),
    ) -> &mut Self {
        if exists {
            self.copy_amount(field, true, Some(value), copier);
        }
        self
    }

    /// Parses and copies a required ISO-8601 date field.
    pub fn copy_date(
        &mut self,
        field: &str,
        nullable: bool,
        value: Option<&str>,
        copier: impl FnOnce(NaiveDate),
    ) -> &mut Self {
        match value {
            None => {
                if !nullable {
                    self.add_error(field, "is null");
                }
            }
            Some(value) => match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
                Ok(date) => copier(date),
                Err(_) => self.add_error(field, "invalid date"),
            },
        }
        self
    }

    /// Parses and copies an optional ISO-8601 date field.
    pub fn copy_optional_date(
        &mut self,
        field: &str,
        exists: bool,
        value: &str,
        copier: impl FnOnce(NaiveDate),
    ) -> &mut Self {
        if exists {
            self.copy_date(field, true, Some(value), copier);
        }
        self
    }

    /// Copies the outcome of an enum-or-raw-string extraction as a string.
    pub fn copy_enum_as_string(
        &mut self,
        field: &str,
        nullable: bool,
        min_length: usize,
        max_length: usize,
        result: EnumResult,
        copier: impl FnOnce(String),
    ) -> &mut Self {
        match result {
            EnumResult::NoValue => {
                if !nullable {
                    self.add_error(field, "no value set");
                }
            }
            EnumResult::InvalidValue => {
                self.add_error(field, "unrecognized enum value");
            }
            EnumResult::Value(value) => {
                if self.length_ok(field, min_length, max_length, &value) {
                    copier(value);
                }
            }
        }
        self
    }

    fn length_ok(&mut self, field: &str, min_length: usize, max_length: usize, value: &str) -> bool {
        let actual = value.chars().count();
        if actual < min_length || actual > max_length {
            self.add_error(
                field,
                format!(
                    "invalid length: expected=[{},{}] actual={}",
                    min_length, max_length, actual
                ),
            );
            false
        } else {
            true
        }
    }
}

/// Produces a character-by-character masked comparison of two strings.
///
/// Matching positions render as `.`, mismatches as `#`, characters only in
/// `actual` as `+`, and characters only in `expected` as `-`. Neither input
/// appears in the output.
pub fn masked_diff(expected: &str, actual: &str) -> String {
    let expected: Vec<char> = expected.chars().collect();
    let actual: Vec<char> = actual.chars().collect();
    let common = expected.len().min(actual.len());
    let mut out = String::with_capacity(expected.len().max(actual.len()));
    for i in 0..common {
        out.push(if expected[i] == actual[i] { '.' } else { '#' });
    }
    for _ in common..actual.len() {
        out.push('+');
    }
    for _ in common..expected.len() {
        out.push('-');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_string_valid() {
        let mut out = None;
        let mut t = FieldTransformer::new();
        t.copy_string("claimId", false, 1, 23, Some("ABC123"), |v| out = Some(v));
        assert!(t.is_successful());
        assert_eq!(out, Some("ABC123".to_string()));
    }

    #[test]
    fn test_copy_string_null_required() {
        let mut t = FieldTransformer::new();
        t.copy_string("claimId", false, 1, 23, None, |_| {});
        assert_eq!(t.errors(), &[FieldError::new("claimId", "is null")]);
    }

    #[test]
    fn test_copy_string_null_allowed() {
        let mut t = FieldTransformer::new();
        t.copy_string("provState", true, 1, 2, None, |_| {});
        assert!(t.is_successful());
    }

    #[test]
    fn test_copy_string_too_long() {
        let mut called = false;
        let mut t = FieldTransformer::new();
        t.copy_string("currStatus", false, 1, 1, Some("AB"), |_| called = true);
        assert!(!called);
        assert_eq!(
            t.errors(),
            &[FieldError::new(
                "currStatus",
                "invalid length: expected=[1,1] actual=2"
            )]
        );
    }

    #[test]
    fn test_copy_optional_string_absent() {
        let mut called = false;
        let mut t = FieldTransformer::new();
        t.copy_optional_string("provState", 1, 2, false, "ZZ", |_| called = true);
        assert!(t.is_successful());
        assert!(!called);
    }

    #[test]
    fn test_copy_string_with_expected_mismatch() {
        let mut t = FieldTransformer::new();
        t.copy_string_with_expected("dcn", false, 1, 23, Some("ABCX"), "ABCD", |_| {});
        assert_eq!(t.errors().len(), 1);
        assert!(t.errors()[0].message.contains("...#"));
    }

    #[test]
    fn test_copy_amount() {
        let mut out = None;
        let mut t = FieldTransformer::new();
        t.copy_amount("totalCharge", false, Some("1234.56"), |v| out = Some(v));
        assert!(t.is_successful());
        assert_eq!(out, Some(Decimal::new(123_456, 2)));
    }

    #[test]
    fn test_copy_amount_invalid() {
        let mut t = FieldTransformer::new();
        t.copy_amount("totalCharge", false, Some("12x.00"), |_| {});
        assert_eq!(
            t.errors(),
            &[FieldError::new("totalCharge", "invalid amount")]
        );
    }

    #[test]
    fn test_copy_date_invalid() {
        let mut t = FieldTransformer::new();
        t.copy_date("recdDate", false, Some("2024-13-40"), |_| {});
        assert_eq!(t.errors(), &[FieldError::new("recdDate", "invalid date")]);
    }

    #[test]
    fn test_copy_date_valid() {
        let mut out = None;
        let mut t = FieldTransformer::new();
        t.copy_date("recdDate", false, Some("2024-02-29"), |v| out = Some(v));
        assert_eq!(out, NaiveDate::from_ymd_opt(2024, 2, 29));
    }

    #[test]
    fn test_copy_enum_as_string_invalid() {
        let mut t = FieldTransformer::new();
        t.copy_enum_as_string("currStatus", false, 1, 1, EnumResult::InvalidValue, |_| {});
        assert_eq!(
            t.errors(),
            &[FieldError::new("currStatus", "unrecognized enum value")]
        );
    }

    #[test]
    fn test_copy_enum_as_string_no_value_nullable() {
        let mut t = FieldTransformer::new();
        t.copy_enum_as_string("currLoc2", true, 1, 5, EnumResult::NoValue, |_| {});
        assert!(t.is_successful());
    }

    #[test]
    fn test_errors_accumulate_in_field_order() {
        let mut t = FieldTransformer::new();
        t.copy_string("a", false, 1, 1, None, |_| {});
        t.copy_string("b", false, 1, 1, Some("XY"), |_| {});
        t.copy_amount("c", false, Some("bad"), |_| {});
        let err = t.fail_if_errors().unwrap_err();
        assert_eq!(err.to_string(), "transformation failed with 3 errors");
        let fields: Vec<&str> = err.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_masked_diff() {
        assert_eq!(masked_diff("ABCD", "ABCD"), "....");
        assert_eq!(masked_diff("ABCD", "ABXD"), "..#.");
        assert_eq!(masked_diff("AB", "ABCD"), "..++");
        assert_eq!(masked_diff("ABCD", "AB"), "..--");
        assert_eq!(masked_diff("", ""), "");
    }
}
