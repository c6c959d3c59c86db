//! Domain models and types for claimflow.
//!
//! This module contains the core domain models, types, and business rules.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Claim model** ([`InstitutionalClaim`], [`ClaimChange`], [`ClaimType`])
//! - **Sequence types** ([`SequenceNumberRange`], cursor resolution)
//! - **Version gating** ([`VersionRequirement`])
//! - **Error types** ([`IngestError`], [`StreamError`], [`ProcessingError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, IngestError>`]:
//!
//! ```rust
//! use claimflow::domain::{IngestError, Result};
//!
//! fn example() -> Result<u64> {
//!     Err(IngestError::Configuration("missing endpoint".to_string()))
//! }
//! ```

pub mod claim;
pub mod errors;
pub mod result;
pub mod sequence;
pub mod version;

// Re-export commonly used types for convenience
pub use claim::{ChangeType, ClaimChange, ClaimType, InstitutionalClaim};
pub use errors::{IngestError, ProcessingError, StreamError, TransportError, TransportErrorKind};
pub use result::Result;
pub use sequence::{starting_sequence_number, SequenceNumberRange, MIN_SEQUENCE_NUMBER};
pub use version::{Compatibility, VersionRequirement};
