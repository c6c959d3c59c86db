//! Record transformation and validation.
//!
//! Wire records are validated field by field and converted into domain
//! claims before batching. Validation errors are aggregated per record so a
//! bad claim reports everything wrong with it at once.

pub mod claim;
pub mod engine;
pub mod enums;

pub use claim::InstitutionalClaimTransformer;
pub use engine::{masked_diff, FieldError, FieldTransformer, TransformError};
pub use enums::{CanonicalEnum, EnumExtractor, EnumResult};
