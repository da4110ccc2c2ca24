use crate::constants::STATS_API_SOURCE;
use crate::error::Result;
use crate::net::HttpFetcher;
use crate::pipeline::stats::StatSource;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// JSON network-stats endpoint. Its payload maps onto the labeled-box
/// shape so the extractor treats it like any other stats surface.
pub struct StatsApi {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl StatsApi {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }

    pub async fn fetch_stats(&self) -> Result<StatSource> {
        info!("Fetching network stats from {} ({})", self.url, STATS_API_SOURCE);
        let payload = self.fetcher.get_json(&self.url).await?;
        let boxes = labeled_boxes_from_payload(&payload);
        if boxes.is_empty() {
            warn!("Stats payload carried no recognizable fields");
        }
        Ok(StatSource::LabeledBoxes(boxes))
    }
}

/// Maps the `{totalBlocks, blockRate, activeMiners, difficulty}` payload
/// onto (title, value) pairs using the titles the synonym table knows.
pub fn labeled_boxes_from_payload(payload: &Value) -> Vec<(String, String)> {
    let fields = [
        ("totalBlocks", "Total Blocks"),
        ("blockRate", "Mining Blockrate"),
        ("activeMiners", "Current Miners"),
        ("difficulty", "Current Difficulty"),
    ];

    let mut boxes = Vec::new();
    for (key, title) in fields {
        if let Some(value) = scalar_to_string(payload.get(key)) {
            boxes.push((title.to_string(), value));
        }
    }
    boxes
}

fn scalar_to_string(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}
