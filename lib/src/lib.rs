//! leapfrog - breaking-change scout for .NET version migrations.
//!
//! Given a source and target major version, leapfrog scrapes the
//! official compatibility documentation for every intermediate
//! version and returns a deduplicated list of structured
//! breaking-change records. The upstream pages are unversioned
//! third-party HTML, so extraction is best effort by design.
//!
//! ## Modules
//!
//! - [`version`] - version tokens and range expansion
//! - [`fetch`] - retrieval of compatibility pages
//! - [`extract`] - table-row scraping heuristics
//! - [`aggregate`] - multi-version merge and deduplication
//! - [`error`] - error taxonomy

pub mod aggregate;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod version;

pub use aggregate::{FetchPolicy, MigrationReport, VersionFailure, aggregate_changes};
pub use error::{FetchError, Result};
pub use extract::{BreakingChange, extract_changes};
pub use fetch::{DOCS_HOST, DocsClient};
pub use version::{VersionRange, VersionToken};
