pub mod materialize;
pub mod normalize;
pub mod reconcile;
pub mod stats;

use crate::apis::accounts_api::AccountsApi;
use crate::apis::explorer::ExplorerScraper;
use crate::apis::hashrate::HashRatePage;
use crate::apis::stats_api::StatsApi;
use crate::apis::xuni_api::XuniApi;
use crate::config::{Config, SourceFormat};
use crate::constants::{TIMESTAMP_KEY, XUNI_ZERO_DEFAULT};
use crate::error::Result;
use crate::net::HttpFetcher;
use crate::snapshot;
use crate::types::{AccountRecord, AccountsSnapshot, LeaderboardSource, RawRecord, SourcePage};
use metrics::{counter, histogram};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use self::stats::StatSource;

/// Outcome of one complete scrape run, for operator display and tests.
#[derive(Debug, Serialize)]
pub struct PipelineRunResult {
    pub primary_rows: usize,
    pub secondary_rows: usize,
    pub skipped_rows: usize,
    pub skipped_stat_lines: usize,
    pub reconciled_accounts: usize,
    pub published_records: usize,
    pub stats_file: String,
    pub accounts_file: String,
}

pub struct Pipeline {
    config: Config,
    fetcher: Arc<HttpFetcher>,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::from_config(&config.fetch)?);
        Ok(Self { config, fetcher })
    }

    /// Runs one scrape end to end: fetch every configured source, then
    /// normalize, extract stats, reconcile, materialize, write. All
    /// fetches must succeed; the writer runs last so a failed run leaves
    /// no partial artifacts.
    #[instrument(skip(self, output_dir))]
    pub async fn run(&self, output_dir: &Path) -> Result<PipelineRunResult> {
        counter!("hashhead_runs_total").increment(1);
        let t_run = std::time::Instant::now();

        let sources = &self.config.sources;
        let primary: Box<dyn LeaderboardSource> = match sources.primary_format {
            SourceFormat::Page => Box::new(ExplorerScraper::new(
                self.fetcher.clone(),
                &sources.primary_url,
            )),
            SourceFormat::Api => Box::new(AccountsApi::new(
                self.fetcher.clone(),
                &sources.primary_url,
            )),
        };
        let secondary = sources
            .secondary_url
            .as_ref()
            .map(|url| HashRatePage::new(self.fetcher.clone(), url));
        let stats_api = sources
            .stats_url
            .as_ref()
            .map(|url| StatsApi::new(self.fetcher.clone(), url));
        let xuni_api = sources
            .xuni_url
            .as_ref()
            .map(|url| XuniApi::new(self.fetcher.clone(), url));

        // Independent sources fetch concurrently, but reconciliation
        // needs every result, so the run joins them all-or-nothing here.
        info!("📡 Fetching configured sources...");
        println!("📡 Fetching configured sources...");
        let t_fetch = std::time::Instant::now();
        let (primary_page, secondary_page, api_stats, xuni_counts) = tokio::try_join!(
            primary.fetch(),
            async {
                match &secondary {
                    Some(source) => source.fetch().await.map(Some),
                    None => Ok(None),
                }
            },
            async {
                match &stats_api {
                    Some(api) => api.fetch_stats().await.map(Some),
                    None => Ok(None),
                }
            },
            async {
                match &xuni_api {
                    Some(api) => api.fetch_counts().await.map(Some),
                    None => Ok(None),
                }
            },
        )?;
        histogram!("hashhead_fetch_duration_seconds").record(t_fetch.elapsed().as_secs_f64());

        let mut skipped_rows = 0;
        let primary_records =
            self.normalize_rows(&primary_page.records, primary.source_name(), &mut skipped_rows);
        let secondary_rows = secondary_page
            .as_ref()
            .map(|page| page.records.len())
            .unwrap_or(0);
        let secondary_records = match (&secondary, &secondary_page) {
            (Some(source), Some(page)) => {
                self.normalize_rows(&page.records, source.source_name(), &mut skipped_rows)
            }
            _ => Vec::new(),
        };
        info!(
            "✅ Normalized {} primary and {} secondary rows ({} skipped)",
            primary_records.len(),
            secondary_records.len(),
            skipped_rows
        );
        println!(
            "✅ Normalized {} primary and {} secondary rows ({} skipped)",
            primary_records.len(),
            secondary_records.len(),
            skipped_rows
        );

        let (network_stats, skipped_stat_lines) =
            self.collect_stats(api_stats, &primary_page, &secondary_page);

        // A missing xuni feed leaves every count at the deployment
        // default; a present feed defaults absent accounts to zero.
        let (counts, xuni_default) = match xuni_counts {
            Some(counts) => (counts, XUNI_ZERO_DEFAULT.to_string()),
            None => (HashMap::new(), self.config.defaults.xuni.clone()),
        };

        let reconciled = reconcile::reconcile(
            primary_records,
            secondary_records,
            &counts,
            self.config.universe.rank_cutoff,
            &xuni_default,
        );
        let reconciled_accounts = reconciled.len();
        info!("🔗 Reconciled {} accounts", reconciled_accounts);

        let records = materialize::materialize(
            reconciled,
            self.config.universe.size,
            self.config.universe.overflow,
        );
        let published_records = records.len();

        let accounts = AccountsSnapshot {
            timestamp: snapshot::accounts_timestamp(),
            data: records,
        };
        let stats_file = snapshot::write_network_stats(&network_stats, output_dir)?;
        let accounts_file = snapshot::write_accounts(&accounts, output_dir)?;

        counter!("hashhead_rows_skipped_total").increment(skipped_rows as u64);
        histogram!("hashhead_run_duration_seconds").record(t_run.elapsed().as_secs_f64());
        info!("💾 Run complete, artifacts written");

        Ok(PipelineRunResult {
            primary_rows: primary_page.records.len(),
            secondary_rows,
            skipped_rows,
            skipped_stat_lines,
            reconciled_accounts,
            published_records,
            stats_file: stats_file.to_string_lossy().to_string(),
            accounts_file: accounts_file.to_string_lossy().to_string(),
        })
    }

    /// Normalizes one source's rows, skipping and counting bad ones.
    /// Row-level failures never abort the run.
    fn normalize_rows(
        &self,
        rows: &[RawRecord],
        source_name: &str,
        skipped: &mut usize,
    ) -> Vec<AccountRecord> {
        let mut records = Vec::with_capacity(rows.len());
        for (i, raw) in rows.iter().enumerate() {
            match normalize::normalize_record(raw, &self.config.defaults) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!("Skipping {} row {}: {}", source_name, i, e);
                    *skipped += 1;
                }
            }
        }
        records
    }

    /// Picks the richest available stats surface (API over primary page
    /// over secondary page), extracts it, and stamps the generation time.
    fn collect_stats(
        &self,
        api_stats: Option<StatSource>,
        primary_page: &SourcePage,
        secondary_page: &Option<SourcePage>,
    ) -> (crate::types::NetworkStats, usize) {
        let source = api_stats
            .or_else(|| primary_page.stats.clone())
            .or_else(|| secondary_page.as_ref().and_then(|page| page.stats.clone()));

        let mut extraction = match &source {
            Some(source) => stats::extract_stats(source),
            None => {
                warn!("No stats surface available from any source");
                stats::StatsExtraction::default()
            }
        };
        extraction
            .stats
            .insert(TIMESTAMP_KEY.to_string(), snapshot::stats_timestamp());
        (extraction.stats, extraction.skipped_lines)
    }
}
