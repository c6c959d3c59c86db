//! Transport seam for the upstream change-stream API.
//!
//! [`SourceTransport`] hides the concrete RPC client behind an async trait so
//! the caller logic and every test run against the same surface.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::adapters::api::models::ClaimChangeRecord;
use crate::domain::{SequenceNumberRange, TransportError};

/// An open upstream call: the record stream plus a cancel hook that tears
/// down the underlying connection.
pub struct ClaimStreamHandle {
    pub records: BoxStream<'static, Result<ClaimChangeRecord, TransportError>>,
    pub cancel: Box<dyn FnOnce(String) + Send>,
}

/// Low-level client for the upstream API.
#[async_trait]
pub trait SourceTransport: Send + Sync {
    /// Fetches the server's API version string.
    async fn fetch_version(&self) -> Result<String, TransportError>;

    /// Fetches the sequence range the server currently serves.
    async fn fetch_sequence_range(&self) -> Result<SequenceNumberRange, TransportError>;

    /// Opens the institutional claim stream starting after `since`
    /// (exclusive).
    async fn open_claim_stream(&self, since: u64) -> Result<ClaimStreamHandle, TransportError>;
}
