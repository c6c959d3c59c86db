//! Bearer token expiry inspection.
//!
//! The upstream issues long-lived JWT bearer tokens. At startup the pipeline
//! peeks at the token's `exp` claim and logs escalating reminders as the
//! expiry approaches, so a token rotation never comes as a surprise. The
//! token is never validated here; the upstream does that.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::config::SecretString;

/// Expiry is an error within this many days.
const ERROR_THRESHOLD_DAYS: i64 = 14;

/// Expiry is a warning within this many days.
const WARN_THRESHOLD_DAYS: i64 = 31;

#[derive(Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
}

/// Extracts the expiry timestamp from a JWT bearer token, if present.
///
/// Returns `None` for tokens that are not JWTs or carry no `exp` claim.
pub fn token_expiry(token: &SecretString) -> Option<DateTime<Utc>> {
    let raw = token.expose_secret();
    let payload = raw.as_ref().split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&decoded).ok()?;
    let exp = claims.exp?;
    Utc.timestamp_opt(exp, 0).single()
}

/// Logs the token's remaining lifetime at a severity matching its urgency.
pub fn log_token_expiry(token: &SecretString, now: DateTime<Utc>) {
    let Some(expiry) = token_expiry(token) else {
        debug!("bearer token carries no readable expiry claim");
        return;
    };
    let remaining_days = (expiry - now).num_days();
    if expiry <= now {
        error!(expiry = %expiry, "bearer token has expired");
    } else if remaining_days < ERROR_THRESHOLD_DAYS {
        error!(expiry = %expiry, remaining_days, "bearer token expires very soon");
    } else if remaining_days < WARN_THRESHOLD_DAYS {
        warn!(expiry = %expiry, remaining_days, "bearer token expires soon");
    } else {
        debug!(expiry = %expiry, remaining_days, "bearer token expiry checked");
    }
}
