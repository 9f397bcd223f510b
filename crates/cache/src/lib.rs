//! On-disk snapshot cache. One pretty-printed JSON document per
//! organization, replaced wholesale on every save. No file locking;
//! concurrent writers are last-writer-wins.

use std::{
    io,
    path::{Path, PathBuf},
};

use time::{Duration, OffsetDateTime};
use verdigris_core::{config::CacheConfig, models::OrgSnapshot};

const CACHE_DIR_NAME: &str = "verdigris";
const CACHE_VALIDITY: Duration = Duration::days(30);

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("no cached snapshot for {org}")]
    NotFound { org: String },
    #[error("cached snapshot for {org} is older than {} days", CACHE_VALIDITY.whole_days())]
    Expired { org: String },
    #[error("cache I/O failed for {org}")]
    Io {
        org: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed cache document for {org}")]
    Malformed {
        org: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value persistence for [`OrgSnapshot`]s, keyed by organization name.
#[derive(Debug, Clone)]
pub struct Cache {
    root: PathBuf,
}

impl Cache {
    /// Cache rooted at the platform's per-user cache directory.
    pub fn new() -> Result<Self, CacheError> {
        let base = dirs::cache_dir().ok_or_else(|| CacheError::Io {
            org: String::new(),
            source: io::Error::new(io::ErrorKind::NotFound, "no user cache directory"),
        })?;
        Ok(Self { root: base.join(CACHE_DIR_NAME) })
    }

    /// Cache rooted at a custom directory, for isolated or test use.
    pub fn with_root(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        match &config.root {
            Some(root) => Ok(Self::with_root(root)),
            None => Self::new(),
        }
    }

    pub fn root(&self) -> &Path { &self.root }

    fn snapshot_path(&self, org: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_org(org)))
    }

    /// Persist a snapshot, replacing any prior one for the organization.
    /// `fetched_at` is re-stamped with the current time; the caller's value
    /// is ignored.
    pub fn save(&self, snapshot: &OrgSnapshot) -> Result<(), CacheError> {
        let org = &snapshot.organization;
        let io_err = |source| CacheError::Io { org: org.clone(), source };
        std::fs::create_dir_all(&self.root).map_err(io_err)?;
        let stamped = OrgSnapshot { fetched_at: OffsetDateTime::now_utc(), ..snapshot.clone() };
        let json = serde_json::to_vec_pretty(&stamped)
            .map_err(|source| CacheError::Malformed { org: org.clone(), source })?;
        std::fs::write(self.snapshot_path(org), json).map_err(io_err)
    }

    /// Load the snapshot for an organization, validated against the current
    /// time. See [`Cache::load_at`].
    pub fn load(&self, org: &str) -> Result<OrgSnapshot, CacheError> {
        self.load_at(org, OffsetDateTime::now_utc())
    }

    /// Load the snapshot for an organization, validated against a caller
    /// supplied reference time. An expired snapshot is withheld even though
    /// it was read; callers must treat [`CacheError::Expired`] as a refetch
    /// signal.
    pub fn load_at(&self, org: &str, now: OffsetDateTime) -> Result<OrgSnapshot, CacheError> {
        let json = match std::fs::read(self.snapshot_path(org)) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CacheError::NotFound { org: org.to_string() });
            }
            Err(source) => return Err(CacheError::Io { org: org.to_string(), source }),
        };
        let snapshot: OrgSnapshot = serde_json::from_slice(&json)
            .map_err(|source| CacheError::Malformed { org: org.to_string(), source })?;
        if now - snapshot.fetched_at > CACHE_VALIDITY {
            return Err(CacheError::Expired { org: org.to_string() });
        }
        Ok(snapshot)
    }

    /// Whether a valid (present, readable, unexpired) snapshot exists.
    pub fn is_valid(&self, org: &str) -> bool { self.load(org).is_ok() }

    pub fn is_valid_at(&self, org: &str, now: OffsetDateTime) -> bool {
        self.load_at(org, now).is_ok()
    }

    /// Delete one organization's snapshot. No-op if none exists.
    pub fn clear(&self, org: &str) -> Result<(), CacheError> {
        match std::fs::remove_file(self.snapshot_path(org)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { org: org.to_string(), source }),
        }
    }

    /// Delete every cached snapshot.
    pub fn clear_all(&self) -> Result<(), CacheError> {
        match std::fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io { org: String::new(), source }),
        }
    }
}

/// Reduce an organization name to a safe file stem. Anything outside
/// alphanumerics, `-`, `_` and `.` becomes `_`, so a hostile name cannot
/// escape the cache root.
fn sanitize_org(org: &str) -> String {
    org.chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}
