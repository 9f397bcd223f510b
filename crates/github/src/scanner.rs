use anyhow::{Context, Result};
use time::OffsetDateTime;
use verdigris_cache::{Cache, CacheError};
use verdigris_core::{
    config::Config,
    models::{OrgSnapshot, ScanOptions, ScanResult},
};

use crate::{RepoFetcher, fetcher_from_config};

/// Orchestrates one scan: serve a valid cached snapshot, or fetch and
/// persist a fresh one. Holds no state across calls beyond what the cache
/// persists.
pub struct Scanner {
    fetcher: Box<dyn RepoFetcher>,
    cache: Cache,
}

impl Scanner {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher: fetcher_from_config(config)?,
            cache: Cache::from_config(&config.cache).context("Failed to open cache")?,
        })
    }

    /// Scanner with injected dependencies, for testing.
    pub fn with_deps(fetcher: Box<dyn RepoFetcher>, cache: Cache) -> Self {
        Self { fetcher, cache }
    }

    pub fn cache(&self) -> &Cache { &self.cache }

    /// Retrieve repository data for an organization, using the cache when
    /// it holds a valid snapshot. Any cache load failure falls through to a
    /// fetch; a cache save failure is reported but does not fail the scan.
    pub async fn scan(&self, org: &str, opts: ScanOptions) -> Result<ScanResult> {
        let now = OffsetDateTime::now_utc();

        if !opts.refresh {
            match self.cache.load_at(org, now) {
                Ok(snapshot) => {
                    tracing::debug!("Using cached snapshot for {}", org);
                    return Ok(ScanResult {
                        organization: org.to_string(),
                        repositories: snapshot.repositories,
                        fetched_at: snapshot.fetched_at,
                        from_cache: true,
                    });
                }
                Err(e @ (CacheError::NotFound { .. } | CacheError::Expired { .. })) => {
                    tracing::debug!("Cache miss for {}: {}", org, e);
                }
                Err(e) => {
                    // Corruption must not block the scan
                    tracing::warn!("Discarding unreadable cache for {}: {:?}", org, e);
                }
            }
        }

        let repositories = self
            .fetcher
            .fetch_repositories(org)
            .await
            .with_context(|| format!("Failed to fetch repositories for {org}"))?;

        let snapshot = OrgSnapshot {
            organization: org.to_string(),
            fetched_at: now,
            repositories: repositories.clone(),
        };
        if let Err(e) = self.cache.save(&snapshot) {
            tracing::warn!("Failed to save cache for {}: {:?}", org, e);
        }

        Ok(ScanResult { organization: org.to_string(), repositories, fetched_at: now, from_cache: false })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use anyhow::anyhow;
    use async_trait::async_trait;
    use tempfile::TempDir;
    use time::Duration;
    use verdigris_core::models::Repository;

    use super::*;

    struct MockFetcher {
        repos: Vec<Repository>,
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl RepoFetcher for MockFetcher {
        async fn fetch_repositories(&self, _org: &str) -> Result<Vec<Repository>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(anyhow!("fetch failed"));
            }
            Ok(self.repos.clone())
        }
    }

    fn sample_repos() -> Vec<Repository> {
        let now = OffsetDateTime::now_utc();
        vec![
            Repository {
                name: "repo1".to_string(),
                full_name: "org/repo1".to_string(),
                last_updated: now - Duration::days(30),
                html_url: "https://github.com/org/repo1".to_string(),
            },
            Repository {
                name: "repo2".to_string(),
                full_name: "org/repo2".to_string(),
                last_updated: now - Duration::days(365),
                html_url: "https://github.com/org/repo2".to_string(),
            },
        ]
    }

    fn mock_scanner(cache: Cache, fail: bool) -> (Scanner, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let fetcher = MockFetcher { repos: sample_repos(), calls: calls.clone(), fail };
        (Scanner::with_deps(Box::new(fetcher), cache), calls)
    }

    #[tokio::test]
    async fn test_scan_fetches_then_serves_cache() {
        let dir = TempDir::new().unwrap();
        let (scanner, calls) = mock_scanner(Cache::with_root(dir.path()), false);

        let first = scanner.scan("org", ScanOptions::default()).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(first.repositories.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = scanner.scan("org", ScanOptions::default()).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(second.repositories, first.repositories);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "cached scan must not fetch");

        let third = scanner.scan("org", ScanOptions { refresh: true }).await.unwrap();
        assert!(!third.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_and_cache_is_untouched() {
        let dir = TempDir::new().unwrap();
        let (scanner, calls) = mock_scanner(Cache::with_root(dir.path()), true);

        let err = scanner.scan("org", ScanOptions::default()).await.unwrap_err();
        assert!(err.to_string().contains("org"), "error lacks org context: {err}");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!scanner.cache().is_valid("org"));
    }

    #[tokio::test]
    async fn test_corrupt_cache_triggers_refetch() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("org.json"), b"not json at all").unwrap();
        let (scanner, calls) = mock_scanner(Cache::with_root(dir.path()), false);

        let result = scanner.scan("org", ScanOptions::default()).await.unwrap();
        assert!(!result.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        // The fresh snapshot replaced the corrupt one
        assert!(scanner.cache().is_valid("org"));
    }

    #[tokio::test]
    async fn test_save_failure_is_not_fatal() {
        // A regular file as cache root makes every save fail
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let (scanner, calls) = mock_scanner(Cache::with_root(&blocker), false);

        let result = scanner.scan("org", ScanOptions::default()).await.unwrap();
        assert!(!result.from_cache);
        assert_eq!(result.repositories.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
