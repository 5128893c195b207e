//! Client configuration: environment variables with defaults, or a YAML profile
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ClientResult;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token_file: None,
        }
    }
}

impl ClientConfig {
    /// Read `BGV_API_URL`, `BGV_API_TIMEOUT_SECS` and `BGV_TOKEN_FILE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup("BGV_API_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }
        if let Some(secs) = lookup("BGV_API_TIMEOUT_SECS").and_then(|s| s.trim().parse().ok()) {
            config.timeout_secs = secs;
        }
        if let Some(path) = lookup("BGV_TOKEN_FILE").filter(|p| !p.trim().is_empty()) {
            config.token_file = Some(PathBuf::from(path));
        }
        config
    }

    pub fn from_yaml_str(yaml: &str) -> ClientResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_yaml(path: impl AsRef<Path>) -> ClientResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Base URL without a trailing slash
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_env_empty() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("BGV_API_URL", "https://onboarding.acme.test/api/"),
            ("BGV_API_TIMEOUT_SECS", "5"),
            ("BGV_TOKEN_FILE", "/tmp/bgv-token"),
        ]
        .into_iter()
        .collect();
        let config = ClientConfig::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_root(), "https://onboarding.acme.test/api");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.token_file, Some(PathBuf::from("/tmp/bgv-token")));
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = ClientConfig::from_lookup(|k| (k == "BGV_API_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_yaml_profile() {
        let config = ClientConfig::from_yaml_str("base_url: http://staging:5000/api\n").unwrap();
        assert_eq!(config.base_url, "http://staging:5000/api");
        assert_eq!(config.timeout_secs, 30);
        assert!(ClientConfig::from_yaml_str("timeout_secs: [").is_err());
    }
}
