use crate::constants::XUNI_API_SOURCE;
use crate::error::Result;
use crate::net::HttpFetcher;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// JSON endpoint reporting per-account xuni counts, shaped as a sequence
/// of `{account, count}` objects.
pub struct XuniApi {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl XuniApi {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    pub async fn fetch_counts(&self) -> Result<HashMap<String, u64>> {
        info!("Fetching xuni counts from {} ({})", self.url, XUNI_API_SOURCE);
        let payload = self.fetcher.get_json(&self.url).await?;
        let counts = parse_xuni_counts(&payload);
        info!("Parsed {} xuni counts", counts.len());
        Ok(counts)
    }
}

pub fn parse_xuni_counts(payload: &Value) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    let Some(items) = payload.as_array() else {
        warn!("Xuni payload is not a sequence; ignoring it");
        return counts;
    };

    for item in items {
        let account = item
            .get("account")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let count = match item.get("count") {
            Some(Value::Number(n)) => n.as_u64(),
            Some(Value::String(s)) => s.trim().replace(',', "").parse().ok(),
            _ => None,
        };
        match (account, count) {
            (Some(account), Some(count)) => {
                counts.insert(account.to_string(), count);
            }
            _ => warn!("Skipping malformed xuni entry: {}", item),
        }
    }
    counts
}
