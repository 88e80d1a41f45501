//! CLI defaults from environment.

use std::env;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// `FOREST_EXPANSION_BUDGET`: cap on expanded search nodes.
    pub expansion_budget: Option<usize>,
    /// `FOREST_THRESHOLD`: fixed obstacle threshold.
    pub threshold: Option<u8>,
    /// `FOREST_WEIGHTED`: use the intensity-weighted cost model.
    pub weighted: bool,
    /// `FOREST_LOG_FORMAT=json`: structured log lines on stderr.
    pub json_logs: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            expansion_budget: lookup("FOREST_EXPANSION_BUDGET").and_then(|s| s.parse().ok()),
            threshold: lookup("FOREST_THRESHOLD").and_then(|s| s.parse().ok()),
            weighted: lookup("FOREST_WEIGHTED")
                .map(|s| matches!(s.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            json_logs: lookup("FOREST_LOG_FORMAT")
                .map(|s| s.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }
}
