use crate::error::Result;
use crate::pipeline::stats::StatSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw leaderboard row as produced by a source, before normalization.
/// Sources emit whatever the page or payload carried; values may be JSON
/// strings (possibly with grouping separators) or numbers.
pub type RawRecord = serde_json::Value;

/// Flat mapping of canonical stat name to value. Always carries a
/// `timestamp` key once the pipeline has stamped it.
pub type NetworkStats = BTreeMap<String, String>;

/// One entrant on the canonical leaderboard.
///
/// A record is either a real entrant (rank and block counts populated) or
/// a placeholder carrying only `account` and `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    pub account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_blocks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_blocks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_blocks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash_rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xuni_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl AccountRecord {
    /// Synthetic entry padding the leaderboard out to its contracted length.
    pub fn placeholder(index: usize, universe_size: usize) -> Self {
        Self::tagged(format!("placeholder_{index}"), universe_size)
    }

    /// Marker for a real account pushed past the universe size.
    pub fn out_of_range(account: String, universe_size: usize) -> Self {
        Self::tagged(account, universe_size)
    }

    fn tagged(account: String, universe_size: usize) -> Self {
        Self {
            rank: None,
            account,
            total_blocks: None,
            super_blocks: None,
            daily_blocks: None,
            hash_rate: None,
            xuni_count: None,
            status: Some(format!("Out of top {universe_size}")),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.status.is_some()
    }
}

/// The accounts artifact: generation time plus the contracted-length
/// record sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsSnapshot {
    pub timestamp: String,
    pub data: Vec<AccountRecord>,
}

/// Everything one fetch of a leaderboard source yields: the table rows,
/// plus whatever network-stat structure the same document carried.
#[derive(Debug, Clone)]
pub struct SourcePage {
    pub records: Vec<RawRecord>,
    pub stats: Option<StatSource>,
}

/// Core trait all leaderboard sources implement.
#[async_trait::async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Unique identifier for this source
    fn source_name(&self) -> &'static str;

    /// Fetch the page or payload and reduce it to rows + raw stats
    async fn fetch(&self) -> Result<SourcePage>;
}
