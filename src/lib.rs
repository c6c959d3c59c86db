// Claimflow - Insurance Claim Change-Stream Ingestion Pipeline
// Copyright (c) 2026 Claimflow Contributors
// Licensed under the MIT License

//! # Claimflow - Claim Change-Stream Ingestion
//!
//! Claimflow is a resumable, fault-tolerant ingestion pipeline that pulls
//! insurance claim change events from a streaming upstream API, validates and
//! transforms them, and writes them to a pluggable sink in coalesced batches.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Resuming** from a durable sequence-number checkpoint after any stop
//! - **Validating** every claim field with aggregated per-record errors
//! - **Batching** records with last-write-wins coalescing per claim id
//! - **Repairing** failed records one at a time through a dead-letter ledger
//!
//! ## Architecture
//!
//! Claimflow follows a layered architecture:
//!
//! - [`source`] - The ingestion loop, stream handling, and dead-letter replay
//! - [`sink`] - Trait seams for batch storage and the error ledger
//! - [`transform`] - Field validation and wire-to-domain conversion
//! - [`adapters`] - The upstream API transport and concrete callers
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`metrics`] - Injected ingestion counters and gauges
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use claimflow::config::load_config;
//! use claimflow::metrics::SourceMetrics;
//! use claimflow::source::IngestionOrchestrator;
//! use tokio::sync::watch;
//!
//! # async fn example(
//! #     caller: impl claimflow::source::ClaimStreamCaller<
//! #         Message = claimflow::adapters::api::ClaimChangeRecord,
//! #     >,
//! #     sink: impl claimflow::sink::ClaimSink<claimflow::adapters::api::ClaimChangeRecord>,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("claimflow.toml")?;
//! let (shutdown_tx, shutdown_rx) = watch::channel(false);
//! let orchestrator = IngestionOrchestrator::new(
//!     caller,
//!     config.orchestrator_settings()?,
//!     Arc::new(SourceMetrics::new()),
//!     shutdown_rx,
//! );
//! let processed = orchestrator.retrieve_and_process(&sink).await?;
//! println!("Processed {} records", processed);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Claimflow uses the [`domain::IngestError`] type for all errors:
//!
//! ```rust
//! use claimflow::domain::{IngestError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(IngestError::Configuration("missing host".to_string()))
//! }
//! ```
//!
//! ## Logging
//!
//! Claimflow uses structured logging with the `tracing` crate:
//!
//! ```rust
//! use tracing::{info, warn};
//!
//! info!(since = 41u64, "opening change stream");
//! warn!(sequence_number = 42u64, "skipping delete record");
//! ```

pub mod adapters;
pub mod config;
pub mod domain;
pub mod logging;
pub mod metrics;
pub mod sink;
pub mod source;
pub mod transform;
