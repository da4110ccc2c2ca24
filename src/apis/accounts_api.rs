use crate::constants::ACCOUNTS_API_SOURCE;
use crate::error::Result;
use crate::net::HttpFetcher;
use crate::types::{LeaderboardSource, RawRecord, SourcePage};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// JSON leaderboard endpoint, shaped as a sequence of
/// `{rank, address, totalBlocks, superBlocks}` objects. Field names are
/// remapped here so the normalizer sees the same row shape no matter
/// which source produced it.
pub struct AccountsApi {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl AccountsApi {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl LeaderboardSource for AccountsApi {
    fn source_name(&self) -> &'static str {
        ACCOUNTS_API_SOURCE
    }

    async fn fetch(&self) -> Result<SourcePage> {
        info!("Fetching leaderboard payload from {}", self.url);
        let payload = self.fetcher.get_json(&self.url).await?;
        let records = records_from_payload(&payload);
        info!("Parsed {} rows from {}", records.len(), ACCOUNTS_API_SOURCE);
        if records.is_empty() {
            warn!("Leaderboard payload carried no rows");
        }
        Ok(SourcePage {
            records,
            stats: None,
        })
    }
}

pub fn records_from_payload(payload: &Value) -> Vec<RawRecord> {
    let Some(items) = payload.as_array() else {
        warn!("Leaderboard payload is not a sequence; ignoring it");
        return Vec::new();
    };
    items.iter().map(record_from_item).collect()
}

fn record_from_item(item: &Value) -> RawRecord {
    let fields = [
        ("rank", "rank"),
        ("address", "account"),
        ("totalBlocks", "total_blocks"),
        ("superBlocks", "super_blocks"),
    ];
    let mut record = serde_json::Map::new();
    for (key, field) in fields {
        if let Some(value) = item.get(key) {
            record.insert(field.to_string(), value.clone());
        }
    }
    Value::Object(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldDefaults;
    use crate::pipeline::normalize::normalize_record;
    use serde_json::json;

    #[test]
    fn payload_rows_normalize_like_any_other_source() {
        let payload = json!([
            { "rank": 1, "address": "0xabc", "totalBlocks": 1000, "superBlocks": 10 }
        ]);
        let records = records_from_payload(&payload);
        assert_eq!(records.len(), 1);

        let record = normalize_record(&records[0], &FieldDefaults::default()).unwrap();
        assert_eq!(record.account, "0xabc");
        assert_eq!(record.total_blocks, Some(1000));
        assert_eq!(record.super_blocks, Some(10));
    }

    #[test]
    fn items_missing_fields_surface_as_incomplete_rows() {
        let payload = json!([{ "rank": 1, "address": "0xabc" }]);
        let records = records_from_payload(&payload);
        assert!(normalize_record(&records[0], &FieldDefaults::default()).is_err());
    }
}
