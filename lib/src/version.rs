//! Version tokens and migration ranges.
//!
//! The compatibility docs identify each release by a `"<major>.0"`
//! token; a migration request is a pair of major versions expanded
//! into the intermediate tokens to scrape.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Major version assumed when `sourceVersion` is absent or unparseable.
pub const DEFAULT_SOURCE_MAJOR: u32 = 8;

/// Major version assumed when `targetVersion` is absent or unparseable.
pub const DEFAULT_TARGET_MAJOR: u32 = 10;

/// One documentation edition, rendered as `"<major>.0"`.
///
/// Tokens exist only for the duration of an aggregation call; they are
/// derived mechanically from the requested range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionToken(u32);

impl VersionToken {
    /// Token for the given major version.
    pub fn new(major: u32) -> Self {
        Self(major)
    }

    /// The major version number this token names.
    pub fn major(self) -> u32 {
        self.0
    }

    /// Token of the predecessor release, as a string.
    ///
    /// Numeric decrement of the major component, saturating at zero.
    pub fn based_on(self) -> String {
        format!("{}.0", self.0.saturating_sub(1))
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.0", self.0)
    }
}

/// Failure to read a `"<major>.0"` token back from a string.
#[derive(Debug, thiserror::Error)]
#[error("invalid version token: {0:?}")]
pub struct ParseVersionError(String);

impl FromStr for VersionToken {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let major = s.split('.').next().unwrap_or(s);
        major
            .trim()
            .parse()
            .map(Self)
            .map_err(|_| ParseVersionError(s.to_string()))
    }
}

impl Serialize for VersionToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// The `(from, to]` pair of major versions a migration request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub from: u32,
    pub to: u32,
}

impl VersionRange {
    pub fn new(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    /// Builds a range from the raw query parameters.
    ///
    /// Integer-parse-with-fallback: a missing or non-numeric value
    /// takes the corresponding default (8 for the source, 10 for the
    /// target).
    pub fn from_params(source: Option<&str>, target: Option<&str>) -> Self {
        let from = source
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_SOURCE_MAJOR);
        let to = target
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_TARGET_MAJOR);
        Self { from, to }
    }

    /// Every major strictly greater than `from` up to and including
    /// `to`, ascending. Empty when `to <= from`; that is a vacuously
    /// successful migration, not an error.
    pub fn expand(self) -> Vec<VersionToken> {
        if self.to <= self.from {
            return Vec::new();
        }
        (self.from + 1..=self.to).map(VersionToken::new).collect()
    }
}

impl Default for VersionRange {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_MAJOR, DEFAULT_TARGET_MAJOR)
    }
}
