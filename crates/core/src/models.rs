use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One repository as observed at fetch time. Immutable once fetched; a new
/// scan produces a whole new set of values. Archived repositories are
/// excluded by the fetchers and never appear here.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    /// Time of the most recent push; source of truth for freshness.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
    pub html_url: String,
}

/// The persisted cache unit: one organization's repository list plus the
/// time it was fetched. `fetched_at` is stamped by the cache at save time,
/// never trusted from the caller.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct OrgSnapshot {
    pub organization: String,
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
    pub repositories: Vec<Repository>,
}

/// Scan behaviour toggles.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct ScanOptions {
    /// Fetch fresh data even if a valid cached snapshot exists.
    pub refresh: bool,
}

/// Result of scanning an organization. Transient; the [`OrgSnapshot`] is
/// the persisted form.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScanResult {
    pub organization: String,
    pub repositories: Vec<Repository>,
    pub fetched_at: OffsetDateTime,
    pub from_cache: bool,
}

/// Repository counts per freshness bucket. The buckets always sum to
/// `total` since classification is exhaustive.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize)]
pub struct FreshnessSummary {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
    pub total: usize,
}
