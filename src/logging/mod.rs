//! Structured logging.

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
