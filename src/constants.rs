/// Source name constants to ensure consistency across the codebase

// User-facing source names (used in CLI output and log fields)
pub const EXPLORER_SOURCE: &str = "explorer";
pub const ACCOUNTS_API_SOURCE: &str = "accounts_api";
pub const HASHRATE_SOURCE: &str = "hashrate";
pub const STATS_API_SOURCE: &str = "stats_api";
pub const XUNI_API_SOURCE: &str = "xuni_api";

// Artifact file names
pub const NETWORK_STATS_FILE: &str = "network_stats.json";
pub const ACCOUNTS_FILE: &str = "accounts.json";

// Canonical network-stat labels
pub const TIMESTAMP_KEY: &str = "timestamp";
pub const TOTAL_BLOCKS_LABEL: &str = "Total Blocks";
pub const BLOCKRATE_LABEL: &str = "Mining Blockrate";
pub const MINERS_LABEL: &str = "Current miners";
pub const DIFFICULTY_LABEL: &str = "Current difficulty";

// The explorer reports blockrate as a bare number; the published stat
// carries the unit
pub const BLOCKRATE_SUFFIX: &str = " BLOCKS PER MINUTE";

// Field values used when a source variant does not report the field
pub const DAILY_BLOCKS_DEFAULT: &str = "Sub-500 Rank";
pub const HASH_RATE_DEFAULT: &str = "N/A";
pub const XUNI_PENDING_DEFAULT: &str = "(Coming Soon)";
pub const XUNI_ZERO_DEFAULT: &str = "0";

/// Get all leaderboard source names the pipeline knows about
pub fn get_supported_sources() -> Vec<&'static str> {
    vec![
        EXPLORER_SOURCE,
        ACCOUNTS_API_SOURCE,
        HASHRATE_SOURCE,
        STATS_API_SOURCE,
        XUNI_API_SOURCE,
    ]
}
