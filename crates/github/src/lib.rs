pub mod scanner;

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::Deserialize;
use time::OffsetDateTime;
use tokio::process::Command;
use verdigris_core::{config::Config, models::Repository};

pub use crate::scanner::Scanner;

const PER_PAGE: u8 = 100;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("GitHub API request for {org} failed")]
    Api {
        org: String,
        #[source]
        source: octocrab::Error,
    },
    #[error("failed to run gh for {org} (is the GitHub CLI installed?)")]
    GhSpawn {
        org: String,
        #[source]
        source: std::io::Error,
    },
    #[error("gh api for {org} exited with {status}: {stderr}")]
    GhExit {
        org: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("failed to parse repository listing for {org}")]
    Parse {
        org: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Capability to list an organization's repositories. Implementations must
/// exclude archived repositories and handle pagination internally, so the
/// caller receives the complete list in one call.
#[async_trait]
pub trait RepoFetcher: Send + Sync {
    async fn fetch_repositories(&self, org: &str) -> Result<Vec<Repository>>;
}

/// Repository fields we consume from the GitHub API.
#[derive(Debug, Deserialize)]
struct ApiRepo {
    name: String,
    full_name: String,
    html_url: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pushed_at: Option<OffsetDateTime>,
    #[serde(default)]
    archived: bool,
}

fn collect_repositories(repos: Vec<ApiRepo>, out: &mut Vec<Repository>) {
    for repo in repos {
        if repo.archived {
            continue;
        }
        out.push(Repository {
            name: repo.name,
            full_name: repo.full_name,
            // Repositories without a push classify as maximally stale
            last_updated: repo.pushed_at.unwrap_or(OffsetDateTime::UNIX_EPOCH),
            html_url: repo.html_url,
        });
    }
}

/// Fetches directly from the REST API with a personal access token.
pub struct TokenFetcher {
    client: Octocrab,
}

impl TokenFetcher {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.into())
            .build()
            .context("Failed to create GitHub client")?;
        Ok(Self { client })
    }
}

#[derive(serde::Serialize)]
struct ListReposParams {
    r#type: &'static str,
    per_page: u8,
    page: u32,
}

#[async_trait]
impl RepoFetcher for TokenFetcher {
    async fn fetch_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        let route = format!("/orgs/{org}/repos");
        let mut all = Vec::new();
        let mut page = 1u32;
        loop {
            let repos: Vec<ApiRepo> = self
                .client
                .get(&route, Some(&ListReposParams { r#type: "all", per_page: PER_PAGE, page }))
                .await
                .map_err(|source| FetchError::Api { org: org.to_string(), source })?;
            if repos.is_empty() {
                break;
            }
            let full_page = repos.len() == PER_PAGE as usize;
            collect_repositories(repos, &mut all);
            if !full_page {
                break;
            }
            page += 1;
        }
        tracing::debug!("Fetched {} repositories for {} via API", all.len(), org);
        Ok(all)
    }
}

/// Delegates fetching to an authenticated `gh` CLI.
pub struct GhCliFetcher;

#[async_trait]
impl RepoFetcher for GhCliFetcher {
    async fn fetch_repositories(&self, org: &str) -> Result<Vec<Repository>> {
        let output = Command::new("gh")
            .args([
                "api",
                &format!("/orgs/{org}/repos"),
                "--paginate",
                "--slurp",
                "-F",
                &format!("per_page={PER_PAGE}"),
                "-F",
                "type=all",
            ])
            .output()
            .await
            .map_err(|source| FetchError::GhSpawn { org: org.to_string(), source })?;
        if !output.status.success() {
            return Err(FetchError::GhExit {
                org: org.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        // --slurp wraps each result page in an outer array
        let pages: Vec<Vec<ApiRepo>> = serde_json::from_slice(&output.stdout)
            .map_err(|source| FetchError::Parse { org: org.to_string(), source })?;
        let mut all = Vec::new();
        for repos in pages {
            collect_repositories(repos, &mut all);
        }
        tracing::debug!("Fetched {} repositories for {} via gh", all.len(), org);
        Ok(all)
    }
}

/// Select a fetcher implementation: direct API access when a token is
/// configured, otherwise the `gh` CLI.
pub fn fetcher_from_config(config: &Config) -> Result<Box<dyn RepoFetcher>> {
    match &config.github.token {
        Some(token) => {
            tracing::debug!("Using token-authenticated API fetcher");
            Ok(Box::new(TokenFetcher::new(token.clone())?))
        }
        None => {
            tracing::debug!("No token configured, delegating to gh");
            Ok(Box::new(GhCliFetcher))
        }
    }
}
