//! Upstream call seam.
//!
//! [`ClaimStreamCaller`] is everything the ingestion loop needs from the
//! upstream API: version and range lookups, opening the change stream, and a
//! few per-message accessors. Concrete callers live under `adapters::api`;
//! tests implement this trait directly.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{ClaimType, IngestError, SequenceNumberRange};
use crate::source::stream::ResponseStream;

/// Opens and interrogates change streams for one claim type.
#[async_trait]
pub trait ClaimStreamCaller: Send + Sync {
    /// Wire message type produced by the stream.
    type Message: Send + 'static;

    /// Claim type served by this caller.
    fn claim_type(&self) -> ClaimType;

    /// Fetches the upstream's API version string.
    async fn call_version_service(&self) -> Result<String, IngestError>;

    /// Fetches the sequence range the upstream currently serves.
    async fn call_sequence_range_service(&self) -> Result<SequenceNumberRange, IngestError>;

    /// Opens the change stream starting after `since` (exclusive).
    async fn call_service(
        &self,
        since: u64,
        shutdown: watch::Receiver<bool>,
    ) -> Result<ResponseStream<Self::Message>, IngestError>;

    /// True for delete records, which are skipped rather than stored.
    fn is_delete_message(&self, message: &Self::Message) -> bool;

    /// True when the message passes structural validation.
    fn is_valid_message(&self, message: &Self::Message) -> bool;

    /// Claim identifier used for last-write-wins coalescing.
    fn claim_id_for(&self, message: &Self::Message) -> String;

    /// Sequence number carried by the message.
    fn sequence_number_for(&self, message: &Self::Message) -> u64;
}
