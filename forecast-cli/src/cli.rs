use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, ForecastFetcher, ForecastPeriod, HistoryTable, RunSummary, report, updater,
};

use crate::configure;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "nightly-forecast",
    version,
    about = "Record tonight's forecast and regenerate the report"
)]
pub struct Cli {
    /// Configuration file; defaults to the platform config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// City to fetch the forecast for.
    #[arg(long, global = true)]
    pub city: Option<String>,

    /// History table file.
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Report file.
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch tonight's forecast, append it to the history and rewrite the report (default).
    Run,

    /// Print tonight's forecast without touching any file.
    Show {
        /// City name; overrides the configured one.
        place: Option<String>,
    },

    /// Print the stored history table.
    History {
        /// Emit JSON instead of a markdown table.
        #[arg(long)]
        json: bool,
    },

    /// Regenerate the report from the stored history without fetching.
    Render,

    /// Interactively edit and save the configuration file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = self.load_config()?;
        let command = self.command.unwrap_or(Command::Run);
        tracing::debug!(
            ?command,
            config_file = ?self.config,
            city = %config.city,
            "Running command"
        );

        match command {
            Command::Run => {
                let summary = updater::run(&config).await?;
                print_summary(&summary, &config);
            }
            Command::Show { place } => {
                let city = place.unwrap_or_else(|| config.city.clone());
                let fetcher = ForecastFetcher::from_config(&config.http)
                    .context("Failed to set up forecast fetcher")?;
                let period = fetcher.get_forecast(&city).await?;
                print_period(&city, &period);
            }
            Command::History { json } => {
                let table = HistoryTable::load(&config.history_path)?;
                if json {
                    let out = serde_json::to_string_pretty(table.records())
                        .context("Failed to serialize history to JSON")?;
                    println!("{out}");
                } else {
                    println!("{}", report::markdown_table(&table));
                }
            }
            Command::Render => {
                let table = updater::render_stored(&config)?;
                println!(
                    "Rendered {} row(s) to {}",
                    table.len(),
                    config.report_path.display()
                );
            }
            Command::Configure => {
                let path = match &self.config {
                    Some(path) => path.clone(),
                    None => Config::config_file_path()?,
                };
                configure::run(config, &path)?;
            }
        }

        Ok(())
    }

    /// Config file values with command-line overrides applied.
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };

        if let Some(city) = &self.city {
            config.city = city.clone();
        }
        if let Some(path) = &self.history {
            config.history_path = path.clone();
        }
        if let Some(path) = &self.report {
            config.report_path = path.clone();
        }

        Ok(config)
    }
}

fn print_summary(summary: &RunSummary, config: &Config) {
    print_period(&config.city, &summary.period);
    if summary.added {
        println!("Recorded in {} ({} row(s))", config.history_path.display(), summary.rows);
    } else {
        println!("Already recorded in {} ({} row(s))", config.history_path.display(), summary.rows);
    }
    println!("Report written to {}", config.report_path.display());
}

fn print_period(city: &str, period: &ForecastPeriod) {
    println!(
        "{} for {city}, {} to {}:",
        period.name,
        display_time(period.starts_at(), &period.start_time),
        display_time(period.ends_at(), &period.end_time),
    );
    println!("  {}", period.detailed_forecast);
}

fn display_time(parsed: Option<DateTime<FixedOffset>>, raw: &str) -> String {
    parsed
        .map(|dt| dt.format("%a %b %-d, %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}
