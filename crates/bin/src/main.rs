//! Yeouido CLI binary.
//!
//! Provides command-line interface for quarterly disclosure ingestion.

mod logging;
mod paths;

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use chrono::{Days, Local, NaiveDate};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::error;
use yeouido::data::{CsvStore, RecordStore, ReportingScope};
use yeouido::output::{TracingNotifier, format_amount, format_percent};
use yeouido::{ConfigError, IngestPipeline, PipelineConfig, PipelineError, SourceConfig};

#[derive(Parser)]
#[command(name = "yeouido")]
#[command(about = "Yeouido: quarterly disclosure ingestion", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the periodic filings received in a date range
    Ingest {
        /// First receipt date (YYYY-MM-DD), defaults to the day before `--to`
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last receipt date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Store file path
        #[arg(long)]
        store: Option<PathBuf>,

        /// Only ingest these company identifiers (repeatable)
        #[arg(long = "company")]
        companies: Vec<String>,

        /// Delay between companies in milliseconds
        #[arg(long, default_value = "1000")]
        throttle_ms: u64,

        /// Prefer separate over consolidated statements
        #[arg(long)]
        separate: bool,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Print the stored history of a company
    History {
        /// Company identifier
        company: String,

        /// Store file path
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output format (json or text)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    logging::init_logging();

    if let Err(e) = run().await {
        match &e {
            PipelineError::Config(_) => eprintln!("Error: {e}"),
            PipelineError::Data(_) => error!(error = %e, "command failed"),
        }
        process::exit(1);
    }
}

async fn run() -> Result<(), PipelineError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            from,
            to,
            store,
            companies,
            throttle_ms,
            separate,
            quiet,
        } => {
            let end = to.unwrap_or_else(|| Local::now().date_naive());
            let start = match from {
                Some(start) => start,
                None => end
                    .checked_sub_days(Days::new(1))
                    .ok_or_else(|| ConfigError::Invalid(format!("no day before {end}")))?,
            };
            if start > end {
                return Err(ConfigError::Invalid(format!(
                    "--from {start} is after --to {end}"
                ))
                .into());
            }

            let source = SourceConfig::from_env()?.client()?;
            let config = PipelineConfig {
                store_path: paths::store_path(store),
                throttle: Duration::from_millis(throttle_ms),
                scope: if separate {
                    ReportingScope::Separate
                } else {
                    ReportingScope::Consolidated
                },
                companies,
            };
            let store = CsvStore::new(&config.store_path);

            let pb = (!quiet).then(progress_bar);
            let mut pipeline = IngestPipeline::new(source, store, TracingNotifier, config);
            let summary = pipeline.run(start, end, pb.as_ref()).await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            println!("{summary}");
            println!("Store: {}", pipeline.config().store_path.display());
        }

        Commands::History {
            company,
            store,
            format,
        } => {
            let store = CsvStore::new(paths::store_path(store));
            let history = store.history(&company)?;

            if format == "json" {
                let json = serde_json::to_string_pretty(&history)
                    .map_err(|e| PipelineError::Data(e.into()))?;
                println!("{json}");
                return Ok(());
            }

            if history.is_empty() {
                println!("No stored records for {company}");
                return Ok(());
            }

            println!(
                "{:<8} {:>14} {:>9} {:>9} {:>14} {:>9} {:>9} {:>8}",
                "Period", "Revenue", "QoQ", "YoY", "Op. profit", "QoQ", "YoY", "Margin"
            );
            for record in &history {
                println!(
                    "{:<8} {:>14} {:>9} {:>9} {:>14} {:>9} {:>9} {:>7.1}%",
                    format!("{} {}", record.fiscal_year, record.fiscal_quarter),
                    format_amount(record.revenue),
                    format_percent(record.revenue_qoq),
                    format_percent(record.revenue_yoy),
                    format_amount(record.operating_profit),
                    format_percent(record.profit_qoq),
                    format_percent(record.profit_yoy),
                    record.operating_margin
                );
            }
        }
    }

    Ok(())
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓░"));
    }
    pb
}
