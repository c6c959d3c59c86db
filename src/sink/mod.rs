//! Sink abstractions.
//!
//! Trait seams separating the ingestion loop from storage: [`ClaimSink`] for
//! batch writes and checkpointing, [`ErrorLedger`] for dead-letter records.

pub mod dead_letter;
pub mod traits;

pub use dead_letter::{DeadLetterEntry, DeadLetterStatus, ErrorLedger};
pub use traits::ClaimSink;
