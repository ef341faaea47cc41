//! Host configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

pub const SEED_VAR: &str = "BLOCKFALL_SEED";
pub const SCORES_PATH_VAR: &str = "BLOCKFALL_SCORES_PATH";
pub const INPUT_QUEUE_VAR: &str = "BLOCKFALL_INPUT_QUEUE";
pub const INPUT_INTERVAL_VAR: &str = "BLOCKFALL_INPUT_INTERVAL_MS";
pub const MAX_SECONDS_VAR: &str = "BLOCKFALL_MAX_SECONDS";
pub const LOG_VAR: &str = "BLOCKFALL_LOG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Engine host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Seed for the uniform piece source
    pub seed: u32,
    /// JSON-lines file receiving run reports; `None` logs them instead
    pub scores_path: Option<PathBuf>,
    /// Capacity of the intent queue (at least 1)
    pub input_queue: usize,
    /// Cadence of the demo input source
    pub input_interval_ms: u64,
    /// Demo run cap before the host quits the run
    pub max_seconds: u64,
    /// `tracing` filter directive
    pub log_filter: Option<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: clock_seed(),
            scores_path: None,
            input_queue: 32,
            input_interval_ms: 60,
            max_seconds: 300,
            log_filter: None,
        }
    }
}

impl EngineConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Create from any variable lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |var: &str| {
            lookup(var)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let defaults = Self::default();

        let seed = match read(SEED_VAR) {
            Some(raw) => parse(SEED_VAR, raw)?,
            None => defaults.seed,
        };

        let scores_path = read(SCORES_PATH_VAR).map(PathBuf::from);

        let input_queue = match read(INPUT_QUEUE_VAR) {
            Some(raw) => parse::<usize>(INPUT_QUEUE_VAR, raw)?.max(1),
            None => defaults.input_queue,
        };

        let input_interval_ms = match read(INPUT_INTERVAL_VAR) {
            Some(raw) => parse(INPUT_INTERVAL_VAR, raw)?,
            None => defaults.input_interval_ms,
        };

        let max_seconds = match read(MAX_SECONDS_VAR) {
            Some(raw) => parse(MAX_SECONDS_VAR, raw)?,
            None => defaults.max_seconds,
        };

        let log_filter = read(LOG_VAR).or_else(|| read("RUST_LOG"));

        Ok(Self {
            seed,
            scores_path,
            input_queue,
            input_interval_ms,
            max_seconds,
            log_filter,
        })
    }
}

fn parse<T>(var: &'static str, raw: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value: raw,
    })
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(1)
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
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.scores_path, None);
        assert_eq!(config.input_queue, 32);
        assert_eq!(config.input_interval_ms, 60);
        assert_eq!(config.max_seconds, 300);
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn reads_every_variable() {
        let config = EngineConfig::from_lookup(lookup(&[
            (SEED_VAR, "42"),
            (SCORES_PATH_VAR, " /tmp/scores.jsonl "),
            (INPUT_QUEUE_VAR, "8"),
            (INPUT_INTERVAL_VAR, "15"),
            (MAX_SECONDS_VAR, "10"),
            (LOG_VAR, "debug"),
        ]))
        .unwrap();

        assert_eq!(config.seed, 42);
        assert_eq!(config.scores_path, Some(PathBuf::from("/tmp/scores.jsonl")));
        assert_eq!(config.input_queue, 8);
        assert_eq!(config.input_interval_ms, 15);
        assert_eq!(config.max_seconds, 10);
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn queue_capacity_is_at_least_one() {
        let config = EngineConfig::from_lookup(lookup(&[(INPUT_QUEUE_VAR, "0")])).unwrap();
        assert_eq!(config.input_queue, 1);
    }

    #[test]
    fn log_filter_falls_back_to_rust_log() {
        let config = EngineConfig::from_lookup(lookup(&[("RUST_LOG", "warn")])).unwrap();
        assert_eq!(config.log_filter.as_deref(), Some("warn"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config =
            EngineConfig::from_lookup(lookup(&[(SCORES_PATH_VAR, "  "), (MAX_SECONDS_VAR, "")]))
                .unwrap();
        assert_eq!(config.scores_path, None);
        assert_eq!(config.max_seconds, 300);
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = EngineConfig::from_lookup(lookup(&[(SEED_VAR, "lots")])).unwrap_err();
        match err {
            ConfigError::Invalid { var, value, .. } => {
                assert_eq!(var, SEED_VAR);
                assert_eq!(value, "lots");
            }
        }
    }
}
