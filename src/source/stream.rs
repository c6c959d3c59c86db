//! Change-stream response handle.
//!
//! Wraps the transport's message stream with shutdown observation and an
//! explicit cancel hook. The ingestion loop only ever sees three outcomes
//! per read: a message, a clean end of stream, or a classified
//! [`StreamError`].

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::watch;

use crate::domain::{StreamError, TransportError};

type CancelFn = Box<dyn FnOnce(String) + Send>;

/// An open change-stream call.
pub struct ResponseStream<M> {
    inner: BoxStream<'static, Result<M, TransportError>>,
    shutdown: watch::Receiver<bool>,
    shutdown_closed: bool,
    cancel: Option<CancelFn>,
}

impl<M> ResponseStream<M> {
    pub fn new(
        inner: BoxStream<'static, Result<M, TransportError>>,
        shutdown: watch::Receiver<bool>,
        cancel: impl FnOnce(String) + Send + 'static,
    ) -> Self {
        Self {
            inner,
            shutdown,
            shutdown_closed: false,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Reads the next message.
    ///
    /// Returns `Ok(None)` on clean end of stream,
    /// `Err(StreamError::Interrupted)` when shutdown is signalled, and a
    /// classified error for transport failures. A sender that drops without
    /// signalling shutdown is ignored and reads continue.
    pub async fn next(&mut self) -> Result<Option<M>, StreamError> {
        if *self.shutdown.borrow() {
            return Err(StreamError::Interrupted);
        }
        loop {
            tokio::select! {
                changed = self.shutdown.changed(), if !self.shutdown_closed => {
                    match changed {
                        Ok(()) => {
                            if *self.shutdown.borrow() {
                                return Err(StreamError::Interrupted);
                            }
                        }
                        Err(_) => {
                            self.shutdown_closed = true;
                        }
                    }
                }
                item = self.inner.next() => {
                    return match item {
                        None => Ok(None),
                        Some(Ok(message)) => Ok(Some(message)),
                        Some(Err(error)) => Err(StreamError::classify(error)),
                    };
                }
            }
        }
    }

    /// Tears down the underlying call. Safe to call more than once.
    pub fn cancel(&mut self, reason: &str) {
        if let Some(cancel) = self.cancel.take() {
            cancel(reason.to_string());
        }
    }
}

impl<M> Drop for ResponseStream<M> {
    fn drop(&mut self) {
        self.cancel("response stream dropped");
    }
}
