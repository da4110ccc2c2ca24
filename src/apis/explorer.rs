use crate::constants::EXPLORER_SOURCE;
use crate::error::Result;
use crate::net::HttpFetcher;
use crate::pipeline::stats::StatSource;
use crate::types::{LeaderboardSource, RawRecord, SourcePage};
use scraper::{Html, Selector};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Primary source: the explorer's server-rendered leaderboard page.
/// One fetch yields both the stat boxes at the top and the account table.
pub struct ExplorerScraper {
    fetcher: Arc<HttpFetcher>,
    url: String,
}

impl ExplorerScraper {
    pub fn new(fetcher: Arc<HttpFetcher>, url: impl Into<String>) -> Self {
        Self {
            fetcher,
            url: url.into(),
        }
    }
}

#[async_trait::async_trait]
impl LeaderboardSource for ExplorerScraper {
    fn source_name(&self) -> &'static str {
        EXPLORER_SOURCE
    }

    async fn fetch(&self) -> Result<SourcePage> {
        info!("Fetching leaderboard from {}", self.url);
        let body = self.fetcher.get_text(&self.url).await?;
        let document = Html::parse_document(&body);

        let records = parse_leaderboard_table(&document);
        let boxes = parse_stat_boxes(&document);
        info!(
            "Parsed {} rows and {} stat boxes from {}",
            records.len(),
            boxes.len(),
            EXPLORER_SOURCE
        );
        if records.is_empty() {
            warn!("No leaderboard rows found - the page structure may have changed");
        }

        Ok(SourcePage {
            records,
            stats: Some(StatSource::LabeledBoxes(boxes)),
        })
    }
}

/// Extracts every table row into a raw record. Rows keep whatever cells
/// they had; deciding whether a short row is usable is the normalizer's
/// call, not ours.
pub fn parse_leaderboard_table(document: &Html) -> Vec<RawRecord> {
    let row_selector = Selector::parse("table tbody tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut records = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_string())
            .collect();

        let mut record = serde_json::Map::new();
        let fields = ["rank", "account", "total_blocks", "super_blocks", "daily_blocks"];
        for (field, cell) in fields.iter().zip(cells.iter()) {
            record.insert(field.to_string(), Value::String(cell.clone()));
        }
        records.push(Value::Object(record));
    }
    records
}

/// Reads the stat boxes at the top of the page. The explorer has shipped
/// two box markups; try the current one first, then the older one.
pub fn parse_stat_boxes(document: &Html) -> Vec<(String, String)> {
    let variants = [
        (".stat", ".stat-title", ".stat-value"),
        (".stats-box", ".title", ".value"),
    ];

    for (box_css, title_css, value_css) in variants {
        let box_selector = Selector::parse(box_css).unwrap();
        let title_selector = Selector::parse(title_css).unwrap();
        let value_selector = Selector::parse(value_css).unwrap();

        let mut boxes = Vec::new();
        for element in document.select(&box_selector) {
            let title = element
                .select(&title_selector)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string());
            let value = element
                .select(&value_selector)
                .next()
                .map(|v| v.text().collect::<String>().trim().to_string());
            if let (Some(title), Some(value)) = (title, value) {
                boxes.push((title, value));
            }
        }
        if !boxes.is_empty() {
            return boxes;
        }
    }
    Vec::new()
}
