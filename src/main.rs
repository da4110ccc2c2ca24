use clap::{Parser, Subcommand};
use hashhead::config::Config;
use hashhead::pipeline::Pipeline;
use hashhead::{constants, logging};
use std::path::Path;
use tracing::error;

#[derive(Parser)]
#[command(name = "hashhead")]
#[command(about = "XenBlocks mining network leaderboard and stats scraper")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape all configured sources and write both artifacts
    Run {
        /// Directory the artifacts are written into
        #[arg(long, default_value = "output")]
        output_dir: String,
        /// Override the configured leaderboard universe size
        #[arg(long)]
        universe_size: Option<usize>,
    },
    /// List the configured sources
    Sources,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command {
        Commands::Run {
            output_dir,
            universe_size,
        } => {
            if let Some(size) = universe_size {
                config.universe.size = size;
            }

            println!("🔄 Running scrape pipeline...");
            let pipeline = Pipeline::new(config)?;
            match pipeline.run(Path::new(&output_dir)).await {
                Ok(result) => {
                    println!("\n📊 Pipeline results:");
                    println!("   Primary rows: {}", result.primary_rows);
                    println!("   Secondary rows: {}", result.secondary_rows);
                    println!("   Skipped rows: {}", result.skipped_rows);
                    println!("   Skipped stat lines: {}", result.skipped_stat_lines);
                    println!("   Reconciled accounts: {}", result.reconciled_accounts);
                    println!("   Published records: {}", result.published_records);
                    println!("   Stats artifact: {}", result.stats_file);
                    println!("   Accounts artifact: {}", result.accounts_file);
                }
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    eprintln!("❌ Pipeline failed: {e}");
                    std::process::exit(1);
                }
            }
        }
        Commands::Sources => {
            println!(
                "Known source kinds: {}",
                constants::get_supported_sources().join(", ")
            );
            println!("Configured sources:");
            println!("   primary ({}): {}", constants::EXPLORER_SOURCE, config.sources.primary_url);
            match &config.sources.secondary_url {
                Some(url) => println!("   secondary ({}): {}", constants::HASHRATE_SOURCE, url),
                None => println!("   secondary ({}): not configured", constants::HASHRATE_SOURCE),
            }
            match &config.sources.stats_url {
                Some(url) => println!("   stats ({}): {}", constants::STATS_API_SOURCE, url),
                None => println!("   stats ({}): not configured", constants::STATS_API_SOURCE),
            }
            match &config.sources.xuni_url {
                Some(url) => println!("   xuni ({}): {}", constants::XUNI_API_SOURCE, url),
                None => println!("   xuni ({}): not configured", constants::XUNI_API_SOURCE),
            }
        }
    }

    Ok(())
}
