use crate::constants::HASHRATE_SOURCE;
use crate::error::Result;
use crate::net::HttpFetcher;
use crate::pipeline::stats::StatSource;
use crate::types::{LeaderboardSource, RawRecord, SourcePage};
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Secondary source: the hash-rate leaderboard page. Its table carries a
/// fifth column with each account's reported hash rate, and its network
/// stats live in free-text headings instead of stat boxes.
pub struct HashRatePage {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl HashRatePage {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl LeaderboardSource for HashRatePage {
    fn source_name(&self) -> &'static str {
        HASHRATE_SOURCE
    }

    async fn fetch(&self) -> Result<SourcePage> {
        info!("Fetching hash-rate leaderboard from {}", self.url);
        let body = self.fetcher.get_text(&self.url).await?;
        let document = Html::parse_document(&body);

        let records = parse_hashrate_table(&document);
        let lines = parse_heading_lines(&document);
        info!(
            "Parsed {} rows and {} heading lines from {}",
            records.len(),
            lines.len(),
            HASHRATE_SOURCE
        );
        if records.is_empty() {
            warn!("No hash-rate rows found - the page structure may have changed");
        }

        Ok(SourcePage {
            records,
            stats: Some(StatSource::HeadingLines(lines)),
        })
    }
}

/// Table rows with the hash rate in the fifth cell.
pub fn parse_hashrate_table(document: &Html) -> Vec<RawRecord> {
    let row_selector = Selector::parse("table tbody tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut records = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        let mut record = serde_json::Map::new();
        let fields = ["rank", "account", "total_blocks", "super_blocks", "hash_rate"];
        for (field, cell) in fields.iter().zip(cells.iter()) {
            record.insert(field.to_string(), Value::String(cell.clone()));
        }
        records.push(Value::Object(record));
    }
    records
}

/// Heading text above the table. Which headings are actual stats is the
/// extractor's problem; collect them all.
pub fn parse_heading_lines(document: &Html) -> Vec<String> {
    let heading_selector = Selector::parse("h1, h2, h3, h4").unwrap();
    document
        .select(&heading_selector)
        .map(|h| h.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
