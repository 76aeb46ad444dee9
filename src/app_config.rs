//! Runtime configuration read from the environment.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;

use crate::core::{ConfigError, EngineConfig, FileHighScoreStore, GameSession, SimpleRng};

pub const CONFIG_ENV: &str = "BLOCK_PARTY_CONFIG";
pub const SCORE_PATH_ENV: &str = "BLOCK_PARTY_SCORE_PATH";
pub const SEED_ENV: &str = "BLOCK_PARTY_SEED";
pub const LOG_ENV: &str = "BLOCK_PARTY_LOG";
pub const LOG_PATH_ENV: &str = "BLOCK_PARTY_LOG_PATH";

pub const DEFAULT_LOG_PATH: &str = "block-party.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    /// High score file; `None` disables high score tracking
    pub score_path: Option<PathBuf>,
    /// Fixed seed for a reproducible game; `None` draws one from the OS
    pub seed: Option<u32>,
    pub log_level: LevelFilter,
    pub log_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            score_path: None,
            seed: None,
            log_level: LevelFilter::Info,
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl AppConfig {
    /// Read the process environment.
    ///
    /// Malformed scalar values fall back to their defaults. A config file that
    /// is named but cannot be read or parsed is an error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let engine = match non_empty(CONFIG_ENV) {
            Some(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading engine config {}", path))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing engine config {}", path))?
            }
            None => EngineConfig::default(),
        };

        let score_path = non_empty(SCORE_PATH_ENV).map(PathBuf::from);
        let seed = non_empty(SEED_ENV).and_then(|s| s.parse().ok());
        let log_level = non_empty(LOG_ENV)
            .and_then(|s| s.parse().ok())
            .unwrap_or(LevelFilter::Info);
        let log_path = non_empty(LOG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));

        Ok(Self {
            engine,
            score_path,
            seed,
            log_level,
            log_path,
        })
    }

    /// Seed to use: the configured one, or a fresh random one
    pub fn resolve_seed(&self) -> u32 {
        self.seed.unwrap_or_else(rand::random)
    }

    /// Build a session from this configuration. The session starts `Idle`.
    pub fn build_session(&self) -> Result<GameSession, ConfigError> {
        let session = GameSession::new(self.engine, SimpleRng::new(self.resolve_seed()))?;
        Ok(match &self.score_path {
            Some(path) => session.with_high_score_store(Box::new(FileHighScoreStore::new(path))),
            None => session,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn malformed_scalars_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            (SEED_ENV, "not-a-number"),
            (LOG_ENV, "chatty"),
            (SCORE_PATH_ENV, "   "),
        ]))
        .unwrap();
        assert_eq!(config.seed, None);
        assert_eq!(config.log_level, LevelFilter::Info);
        assert_eq!(config.score_path, None);
    }

    #[test]
    fn values_are_read() {
        let config = AppConfig::from_lookup(lookup(&[
            (SEED_ENV, "42"),
            (LOG_ENV, "debug"),
            (SCORE_PATH_ENV, "/tmp/scores"),
            (LOG_PATH_ENV, "/tmp/bp.log"),
        ]))
        .unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.resolve_seed(), 42);
        assert_eq!(config.log_level, LevelFilter::Debug);
        assert_eq!(config.score_path, Some(PathBuf::from("/tmp/scores")));
        assert_eq!(config.log_path, PathBuf::from("/tmp/bp.log"));
    }

    #[test]
    fn engine_config_file_is_loaded() {
        let path = std::env::temp_dir()
            .join(format!("block-party-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"width": 8, "height": 16}"#).unwrap();
        let config =
            AppConfig::from_lookup(lookup(&[(CONFIG_ENV, path.to_str().unwrap())])).unwrap();
        assert_eq!(config.engine.width, 8);
        assert_eq!(config.engine.height, 16);
        assert_eq!(config.engine.max_level, 9);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = AppConfig::from_lookup(lookup(&[(CONFIG_ENV, "/nonexistent/block-party.json")]))
            .unwrap_err();
        assert!(err.to_string().contains("reading engine config"));
    }

    #[test]
    fn invalid_engine_config_fails_session_build() {
        let config = AppConfig {
            engine: EngineConfig {
                width: 2,
                ..EngineConfig::default()
            },
            seed: Some(1),
            ..AppConfig::default()
        };
        assert_eq!(config.build_session().unwrap_err(), ConfigError::Width(2));
    }
}
