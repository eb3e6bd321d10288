//! Multi-version aggregation of scraped breaking changes.
//!
//! Expands a `(from, to]` range into version tokens, drives the
//! fetcher and extractor once per token in ascending order, then
//! merges the accumulated records by title. Fetches run strictly
//! sequentially; latency is linear in the size of the range.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::extract::{BreakingChange, extract_changes};
use crate::fetch::DocsClient;
use crate::version::{VersionRange, VersionToken};

/// How the aggregator reacts to a failed page fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPolicy {
    /// The first failing version aborts the whole aggregation;
    /// nothing gathered so far is returned.
    #[default]
    FailFast,
    /// A failing version is recorded in the report and the remaining
    /// versions still run.
    BestEffort,
}

/// A version whose page could not be fetched under
/// [`FetchPolicy::BestEffort`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionFailure {
    pub version: VersionToken,
    pub reason: String,
}

/// Result of one aggregation call.
///
/// `data` holds the deduplicated records: one survivor per title, its
/// content taken from the last occurrence across the scanned pages,
/// its position from the first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Every version token the call fetched (or attempted), ascending.
    #[serde(rename = "versionsChecked")]
    pub versions_checked: Vec<VersionToken>,
    /// Number of unique records in `data`.
    pub count: usize,
    pub data: Vec<BreakingChange>,
    /// Versions skipped under best-effort aggregation. Absent from
    /// the serialized report when every fetch succeeded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<VersionFailure>,
}

/// Fetches and extracts every intermediate version of `range`, then
/// deduplicates by title.
///
/// An empty range (`to <= from`) yields an empty report, not an
/// error.
///
/// ## Errors
///
/// Under [`FetchPolicy::FailFast`] the first fetch failure propagates
/// unmodified and aborts the remaining versions. Under
/// [`FetchPolicy::BestEffort`] fetch failures are captured in the
/// report instead and the call only fails if the client itself is
/// misconfigured.
#[instrument(name = "aggregate_changes", skip(client, range), fields(from = range.from, to = range.to))]
pub async fn aggregate_changes(
    client: &DocsClient,
    range: VersionRange,
    policy: FetchPolicy,
) -> Result<MigrationReport> {
    let versions = range.expand();
    debug!(versions = versions.len(), ?policy, "expanding migration range");

    let mut scraped = Vec::new();
    let mut failures = Vec::new();

    for &version in &versions {
        match client.fetch_page(version).await {
            Ok(markup) => {
                let records = extract_changes(&markup, version);
                debug!(%version, records = records.len(), "extracted page records");
                scraped.extend(records);
            }
            Err(err) => match policy {
                FetchPolicy::FailFast => return Err(err),
                FetchPolicy::BestEffort => {
                    warn!(%version, error = %err, "skipping version after failed fetch");
                    failures.push(VersionFailure {
                        version,
                        reason: err.to_string(),
                    });
                }
            },
        }
    }

    // Title-keyed merge with Map semantics: insertion keeps the slot
    // of the first occurrence while the stored value is the last one
    // written.
    let mut unique: IndexMap<String, BreakingChange> = IndexMap::with_capacity(scraped.len());
    for record in scraped {
        unique.insert(record.title.clone(), record);
    }

    let data: Vec<BreakingChange> = unique.into_values().collect();
    info!(
        count = data.len(),
        failed = failures.len(),
        "aggregation complete"
    );

    Ok(MigrationReport {
        versions_checked: versions,
        count: data.len(),
        data,
        failures,
    })
}
