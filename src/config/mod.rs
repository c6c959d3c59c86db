//! Configuration management.
//!
//! TOML-backed configuration with `${VAR}` environment substitution, secrets
//! held in zeroizing containers, and bearer token expiry inspection.

pub mod auth;
pub mod loader;
pub mod schema;
pub mod secret;

pub use auth::{log_token_expiry, token_expiry};
pub use loader::load_config;
pub use schema::{ClaimflowConfig, IngestionConfig, LoggingConfig, ServerMode, SourceApiConfig};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
