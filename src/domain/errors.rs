//! Domain error types
//!
//! This module defines the error hierarchy for claimflow. All errors are
//! domain-specific and don't expose third-party types.
//!
//! Stream failures deserve special attention: the source API server drops
//! idle connections abruptly, and the external scheduler interrupts long
//! running invocations. Both arrive at the transport layer looking like
//! generic failures, so [`StreamError`] reclassifies them into variants the
//! orchestrator can match on independently.

use thiserror::Error;

use crate::transform::engine::TransformError;

/// Main claimflow error type
///
/// This is the primary error type used throughout the crate.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The source API reported a version this build is not compatible with.
    /// This is a configuration fault, never retried automatically.
    #[error("Version mismatch: server version '{observed}' does not satisfy requirement '{required}'")]
    VersionMismatch { observed: String, required: String },

    /// Errors reading the response stream
    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    /// Per-record validation failures from the field transformer
    #[error("Transform error: {0}")]
    Transform(#[from] TransformError),

    /// Errors raised by the claim sink
    #[error("Sink error: {0}")]
    Sink(String),

    /// Errors raised by the error ledger
    #[error("Error ledger error: {0}")]
    Ledger(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Transport error categories
///
/// Concrete transports map their failures onto these kinds so the stream
/// wrapper can classify without knowing the RPC library involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    /// Peer closed the connection abruptly (not a clean stream end)
    ConnectionReset,
    /// Call was cancelled by the client
    Cancelled,
    /// Any other transport failure
    Other,
}

/// A failure reported by the underlying transport
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Failure category assigned by the transport adapter
    pub kind: TransportErrorKind,
    /// Human readable detail, safe to log
    pub message: String,
}

impl TransportError {
    /// Create a new transport error
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Convenience constructor for a peer-initiated abrupt close
    pub fn connection_reset(message: impl Into<String>) -> Self {
        Self::new(TransportErrorKind::ConnectionReset, message)
    }
}

/// Errors surfaced while reading a wrapped response stream
///
/// The three variants are independently matchable so the consumer loop can
/// apply different dispositions: a shutdown interrupt is a clean stop, a
/// dropped connection may be a benign idle timeout, and anything else is a
/// genuine fault.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The shutdown signal fired while waiting for the next record
    #[error("stream interrupted by shutdown signal")]
    Interrupted,

    /// The peer closed the connection abruptly
    #[error("connection dropped by peer: {0}")]
    DroppedConnection(String),

    /// Any other transport-level failure
    #[error("transport error: {0}")]
    Transport(TransportError),
}

impl StreamError {
    /// Reclassify a raw transport error into a stream error.
    ///
    /// Abrupt peer closes become [`StreamError::DroppedConnection`] so the
    /// orchestrator can decide whether the drop was an expected idle timeout.
    pub fn classify(err: TransportError) -> Self {
        match err.kind {
            TransportErrorKind::ConnectionReset => StreamError::DroppedConnection(err.message),
            _ => StreamError::Transport(err),
        }
    }
}

/// Failure wrapper returned by the orchestrator and the dead-letter
/// reprocessor.
///
/// Carries the count of records that were durably processed before the
/// failure so the external scheduler can log accurately. Resumption does not
/// depend on this count: the next invocation derives its cursor from the
/// sink's durable checkpoint.
#[derive(Debug, Error)]
#[error("processing failed after {processed} records: {source}")]
pub struct ProcessingError {
    /// Records successfully processed before the failure
    pub processed: u64,
    /// The underlying failure
    #[source]
    pub source: Box<IngestError>,
}

impl ProcessingError {
    /// Wrap an error together with the partial processed count
    pub fn new(source: IngestError, processed: u64) -> Self {
        Self {
            processed,
            source: Box::new(source),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        IngestError::Io(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for IngestError {
    fn from(err: toml::de::Error) -> Self {
        IngestError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_display() {
        let err = IngestError::Configuration("missing endpoint".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing endpoint");
    }

    #[test]
    fn test_version_mismatch_display() {
        let err = IngestError::VersionMismatch {
            observed: "0.9.1".to_string(),
            required: "^0.10.0".to_string(),
        };
        assert!(err.to_string().contains("0.9.1"));
        assert!(err.to_string().contains("^0.10.0"));
    }

    #[test]
    fn test_classify_connection_reset() {
        let err = TransportError::connection_reset("connection reset by peer");
        match StreamError::classify(err) {
            StreamError::DroppedConnection(msg) => {
                assert_eq!(msg, "connection reset by peer");
            }
            other => panic!("expected DroppedConnection, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_other_is_transport() {
        let err = TransportError::new(TransportErrorKind::Other, "deadline exceeded");
        assert!(matches!(
            StreamError::classify(err),
            StreamError::Transport(_)
        ));
    }

    #[test]
    fn test_stream_error_conversion() {
        let err: IngestError = StreamError::Interrupted.into();
        assert!(matches!(err, IngestError::Stream(StreamError::Interrupted)));
    }

    #[test]
    fn test_processing_error_carries_count() {
        let err = ProcessingError::new(IngestError::Sink("write failed".to_string()), 42);
        assert_eq!(err.processed, 42);
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: IngestError = io_err.into();
        assert!(matches!(err, IngestError::Io(_)));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let err = IngestError::Other("test".to_string());
        let _: &dyn std::error::Error = &err;
        let err = StreamError::Interrupted;
        let _: &dyn std::error::Error = &err;
    }
}
