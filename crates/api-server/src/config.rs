//! Server configuration read from the environment

use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = ".taskdash-data";
const DEFAULT_PORT: u16 = 8081;
const DEFAULT_JWT_SECRET: &str = "dev-jwt-secret-change-me";
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 60 * 60 * 8;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_seconds: i64,
    pub seed_demo: bool,
    pub activity_log: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            port: DEFAULT_PORT,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            seed_demo: true,
            activity_log: true,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: std::env::var("TASKDASH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            port: std::env::var("TASKDASH_PORT")
                .ok()
                .and_then(|raw| raw.trim().parse::<u16>().ok())
                .unwrap_or(defaults.port),
            jwt_secret: std::env::var("TASKDASH_JWT_SECRET")
                .ok()
                .filter(|secret| !secret.trim().is_empty())
                .unwrap_or(defaults.jwt_secret),
            token_ttl_seconds: std::env::var("TASKDASH_TOKEN_TTL_SECONDS")
                .ok()
                .and_then(|raw| raw.trim().parse::<i64>().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(defaults.token_ttl_seconds),
            seed_demo: env_flag("TASKDASH_SEED_DEMO", defaults.seed_demo),
            activity_log: env_flag("TASKDASH_ACTIVITY_LOG", defaults.activity_log),
        }
    }

    /// A configuration rooted at `data_dir` with every other value at its default
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => parse_flag(&raw).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("ON"), Some(true));
        assert_eq!(parse_flag(" yes "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::with_data_dir("/tmp/taskdash");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/taskdash"));
        assert_eq!(config.port, 8081);
        assert_eq!(config.token_ttl_seconds, 28_800);
        assert!(config.seed_demo);
        assert!(config.activity_log);
    }
}
