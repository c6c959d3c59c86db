//! Upstream change-stream API adapter.

pub mod caller;
pub mod models;
pub mod transport;

pub use caller::InstitutionalClaimCaller;
pub use models::{ClaimChangeRecord, InstitutionalClaimRecord, RecordSource, WireChangeType};
pub use transport::{ClaimStreamHandle, SourceTransport};
