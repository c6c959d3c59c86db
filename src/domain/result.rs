//! Result type alias for claimflow
//!
//! This module provides a convenient Result type alias that uses IngestError
//! as the error type.

use super::errors::IngestError;

/// Result type alias for claimflow operations
///
/// This is a convenience type alias that uses `IngestError` as the error type.
/// Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use claimflow::domain::result::Result;
/// use claimflow::domain::errors::IngestError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(IngestError::Configuration("missing endpoint".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, IngestError>;
