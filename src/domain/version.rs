//! Source API version compatibility
//!
//! The source API version is gated at the start of every ingestion run. The
//! requirement is parsed once from configuration in the form
//! `[~|^]?MAJOR.MINOR.PATCH`:
//!
//! - `^` accepts any server version with the same major component
//! - `~` accepts any server version with the same major and minor components
//! - no prefix requires an exact match
//!
//! Observed version strings may carry a deployment label prefix in the form
//! `"<label>:MAJOR.MINOR.PATCH"`; the label is ignored for matching.

use std::fmt;
use std::str::FromStr;

use crate::domain::errors::IngestError;

/// How loosely an observed version may differ from the required one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compatibility {
    /// Major component must match
    Major,
    /// Major and minor components must match
    Minor,
    /// All three components must match
    Patch,
}

/// A parsed, immutable version requirement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRequirement {
    major: u32,
    minor: u32,
    patch: u32,
    compatibility: Compatibility,
}

impl VersionRequirement {
    /// Test an observed server version string against this requirement.
    ///
    /// Unparseable version strings never satisfy any requirement.
    pub fn allows(&self, observed: &str) -> bool {
        // Strip an optional "<label>:" deployment prefix.
        let version = match observed.rsplit_once(':') {
            Some((_, v)) => v,
            None => observed,
        };
        let Some((major, minor, patch)) = parse_components(version.trim()) else {
            return false;
        };
        match self.compatibility {
            Compatibility::Major => major == self.major,
            Compatibility::Minor => major == self.major && minor == self.minor,
            Compatibility::Patch => {
                major == self.major && minor == self.minor && patch == self.patch
            }
        }
    }
}

impl FromStr for VersionRequirement {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (compatibility, rest) = match s.strip_prefix('^') {
            Some(rest) => (Compatibility::Major, rest),
            None => match s.strip_prefix('~') {
                Some(rest) => (Compatibility::Minor, rest),
                None => (Compatibility::Patch, s),
            },
        };
        let (major, minor, patch) = parse_components(rest).ok_or_else(|| {
            IngestError::Configuration(format!(
                "invalid version requirement '{s}': expected [~|^]?MAJOR.MINOR.PATCH"
            ))
        })?;
        Ok(Self {
            major,
            minor,
            patch,
            compatibility,
        })
    }
}

impl fmt::Display for VersionRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.compatibility {
            Compatibility::Major => "^",
            Compatibility::Minor => "~",
            Compatibility::Patch => "",
        };
        write!(f, "{prefix}{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn parse_components(s: &str) -> Option<(u32, u32, u32)> {
    let mut parts = s.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}
