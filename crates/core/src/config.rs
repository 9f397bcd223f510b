use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// Personal access token. When present, repositories are fetched
    /// directly from the REST API; otherwise the `gh` CLI is used.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Cache root override. Defaults to the per-user cache directory.
    pub root: Option<PathBuf>,
}

impl Config {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Self {
        let token = std::env::var(GITHUB_TOKEN_ENV).ok().filter(|t| !t.is_empty());
        Self { github: GitHubConfig { token }, cache: CacheConfig::default() }
    }
}
