//! Client configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use lastplanner_domain::UserId;

use crate::infrastructure::http_client::DEFAULT_TIMEOUT;

const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub api_url: Url,
    pub timeout: Duration,
    /// Account id forwarded to the engine; anonymous when unset
    pub user_id: Option<UserId>,
    /// Overrides the platform data directory
    pub storage_path: Option<PathBuf>,
}

impl PlayerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// A malformed API URL is an error; other malformed values fall back to
    /// their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let raw_url = lookup("LASTPLANNER_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url)
            .map_err(|e| anyhow::anyhow!("LASTPLANNER_API_URL '{raw_url}' is not a valid URL: {e}"))?;

        let timeout = match lookup("LASTPLANNER_API_TIMEOUT_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => Duration::from_millis(ms),
                _ => {
                    tracing::warn!(value = %raw, "LASTPLANNER_API_TIMEOUT_MS must be a positive integer, using default");
                    DEFAULT_TIMEOUT
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        let user_id = lookup("LASTPLANNER_USER_ID").and_then(|raw| UserId::new(raw).ok());

        let storage_path = lookup("LASTPLANNER_STORAGE_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_url,
            timeout,
            user_id,
            storage_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<PlayerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PlayerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config(&[]).expect("defaults");
        assert_eq!(config.api_url.as_str(), "http://localhost:3000/");
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert!(config.user_id.is_none());
        assert!(config.storage_path.is_none());
    }

    #[test]
    fn values_are_read() {
        let config = config(&[
            ("LASTPLANNER_API_URL", "https://planner.example.com/base/"),
            ("LASTPLANNER_API_TIMEOUT_MS", "1500"),
            ("LASTPLANNER_USER_ID", "user-42"),
            ("LASTPLANNER_STORAGE_PATH", "/tmp/planner.json"),
        ])
        .expect("config");
        assert_eq!(config.api_url.path(), "/base/");
        assert_eq!(config.timeout, Duration::from_millis(1500));
        assert_eq!(config.user_id.map(String::from).as_deref(), Some("user-42"));
        assert_eq!(config.storage_path, Some(PathBuf::from("/tmp/planner.json")));
    }

    #[test]
    fn bad_timeout_and_blank_user_fall_back() {
        let config = config(&[
            ("LASTPLANNER_API_TIMEOUT_MS", "0"),
            ("LASTPLANNER_USER_ID", "   "),
        ])
        .expect("config");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.user_id.is_none());
    }

    #[test]
    fn invalid_url_is_an_error() {
        assert!(config(&[("LASTPLANNER_API_URL", "not a url")]).is_err());
    }
}
