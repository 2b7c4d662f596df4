//! Server configuration from environment variables.

/// Where saves and leaderboard entries are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub storage: StorageBackend,
    pub leaderboard_limit: u32,
    /// Raw `CORS_ALLOWED_ORIGINS`; CORS is disabled when unset or blank.
    pub cors_allowed_origins: Option<String>,
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB: &str = "lastplanner.db";
const DEFAULT_LEADERBOARD_LIMIT: u32 = 10;

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back
    /// to the defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .map(|raw| {
                raw.trim().parse().unwrap_or_else(|_| {
                    tracing::warn!(value = %raw, "SERVER_PORT is not a valid port, using {DEFAULT_PORT}");
                    DEFAULT_PORT
                })
            })
            .unwrap_or(DEFAULT_PORT);

        let storage = match lookup("GAME_DB").map(|s| s.trim().to_string()) {
            Some(db) if db.eq_ignore_ascii_case("memory") => StorageBackend::Memory,
            Some(db) if !db.is_empty() => StorageBackend::Sqlite(db),
            _ => StorageBackend::Sqlite(DEFAULT_DB.into()),
        };

        let leaderboard_limit = match lookup("LEADERBOARD_LIMIT") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    tracing::warn!(value = %raw, "LEADERBOARD_LIMIT must be a positive integer, ignoring");
                    DEFAULT_LEADERBOARD_LIMIT
                }
            },
            None => DEFAULT_LEADERBOARD_LIMIT,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            storage,
            leaderboard_limit,
            cors_allowed_origins,
        }
    }
}
