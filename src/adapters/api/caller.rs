//! Institutional claim caller.
//!
//! Binds the generic [`ClaimStreamCaller`] seam to the upstream API's
//! institutional claim stream via a [`SourceTransport`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::adapters::api::models::ClaimChangeRecord;
use crate::adapters::api::transport::SourceTransport;
use crate::domain::{ClaimType, IngestError, SequenceNumberRange, StreamError};
use crate::source::caller::ClaimStreamCaller;
use crate::source::stream::ResponseStream;

/// [`ClaimStreamCaller`] for institutional claims.
pub struct InstitutionalClaimCaller {
    transport: Arc<dyn SourceTransport>,
}

impl InstitutionalClaimCaller {
    pub fn new(transport: Arc<dyn SourceTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ClaimStreamCaller for InstitutionalClaimCaller {
    type Message = ClaimChangeRecord;

    fn claim_type(&self) -> ClaimType {
        ClaimType::Institutional
    }

    async fn call_version_service(&self) -> Result<String, IngestError> {
        self.transport
            .fetch_version()
            .await
            .map_err(|error| IngestError::Stream(StreamError::classify(error)))
    }

    async fn call_sequence_range_service(&self) -> Result<SequenceNumberRange, IngestError> {
        self.transport
            .fetch_sequence_range()
            .await
            .map_err(|error| IngestError::Stream(StreamError::classify(error)))
    }

    async fn call_service(
        &self,
        since: u64,
        shutdown: watch::Receiver<bool>,
    ) -> Result<ResponseStream<ClaimChangeRecord>, IngestError> {
        let handle = self
            .transport
            .open_claim_stream(since)
            .await
            .map_err(|error| IngestError::Stream(StreamError::classify(error)))?;
        let cancel = handle.cancel;
        Ok(ResponseStream::new(handle.records, shutdown, move |reason| {
            cancel(reason)
        }))
    }

    fn is_delete_message(&self, message: &ClaimChangeRecord) -> bool {
        !message.is_claim_bearing()
    }

    fn is_valid_message(&self, message: &ClaimChangeRecord) -> bool {
        message
            .claim
            .claim_id
            .as_deref()
            .is_some_and(|id| !id.is_empty())
    }

    fn claim_id_for(&self, message: &ClaimChangeRecord) -> String {
        message.claim.claim_id.clone().unwrap_or_default()
    }

    fn sequence_number_for(&self, message: &ClaimChangeRecord) -> u64 {
        message.sequence_number
    }
}
