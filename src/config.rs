use crate::constants;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Runtime configuration, read from `config.toml` with defaults matching
/// the original XenBlocks deployment. Every section may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sources: SourcesConfig,
    pub fetch: FetchConfig,
    pub universe: UniverseConfig,
    pub defaults: FieldDefaults,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// Primary leaderboard feed. A run cannot proceed without it.
    pub primary_url: String,
    /// Whether the primary feed is a rendered page or a JSON payload.
    pub primary_format: SourceFormat,
    /// Secondary leaderboard page carrying per-account hash rates.
    pub secondary_url: Option<String>,
    /// JSON endpoint reporting network stats.
    pub stats_url: Option<String>,
    /// JSON endpoint reporting per-account xuni counts.
    pub xuni_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Page,
    Api,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_seconds: u64,
    pub retries: u32,
    pub backoff_ms: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    /// Contracted length of the accounts artifact.
    pub size: usize,
    /// Maximum rank at which a secondary-only account is still admitted.
    pub rank_cutoff: u32,
    pub overflow: OverflowMode,
}

/// What happens to rows past the universe size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowMode {
    /// Drop them.
    Truncate,
    /// Keep them after the prefix as status-tagged markers.
    Mark,
}

/// Values filled in for fields a source variant does not report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldDefaults {
    pub daily_blocks: String,
    pub hash_rate: String,
    /// Used for xuni counts when no xuni source is configured at all.
    pub xuni: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            primary_url: "https://explorer.xenblocks.io/leaderboard".to_string(),
            primary_format: SourceFormat::Page,
            secondary_url: None,
            stats_url: None,
            xuni_url: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            retries: 2,
            backoff_ms: 1000,
        }
    }
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            size: 25000,
            rank_cutoff: 25000,
            overflow: OverflowMode::Mark,
        }
    }
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            daily_blocks: constants::DAILY_BLOCKS_DEFAULT.to_string(),
            hash_rate: constants::HASH_RATE_DEFAULT.to_string(),
            xuni: constants::XUNI_PENDING_DEFAULT.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config.toml")
    }

    /// Loads configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let config: Config = toml::from_str(&content)?;
        if config.universe.size == 0 {
            return Err(ScraperError::Config(
                "universe.size must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }
}
