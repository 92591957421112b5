use anyhow::{Context, Result};

use crate::{
    config::Config,
    forecast::ForecastFetcher,
    history::{HistoryRecord, HistoryTable},
    model::ForecastPeriod,
    report,
};

/// Outcome of one update run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub period: ForecastPeriod,
    /// `false` when the fetched forecast was already recorded.
    pub added: bool,
    pub rows: usize,
}

/// Fetch tonight's forecast for the configured city, record it, and regenerate the report.
pub async fn run(config: &Config) -> Result<RunSummary> {
    let fetcher = ForecastFetcher::from_config(&config.http)
        .context("Failed to set up forecast fetcher")?;
    run_with(&fetcher, config).await
}

/// Same as [`run`] with an explicit fetcher.
///
/// The table is saved before the report is written, so a failed report write
/// leaves an updated table and a stale report.
pub async fn run_with(fetcher: &ForecastFetcher, config: &Config) -> Result<RunSummary> {
    let period = fetcher
        .get_forecast(&config.city)
        .await
        .with_context(|| format!("Failed to fetch tonight's forecast for {}", config.city))?;

    let mut table = HistoryTable::load(&config.history_path)?;
    let added = table.append(HistoryRecord::from(&period));
    if !added {
        tracing::info!("Forecast starting {} is already recorded", period.start_time);
    }

    table.save(&config.history_path)?;
    rerender(&table, config)?;

    tracing::info!(rows = table.len(), added, "History updated");
    Ok(RunSummary {
        period,
        added,
        rows: table.len(),
    })
}

/// Regenerate the report from the stored table without fetching.
pub fn render_stored(config: &Config) -> Result<HistoryTable> {
    let table = HistoryTable::load(&config.history_path)?;
    rerender(&table, config)?;
    Ok(table)
}

fn rerender(table: &HistoryTable, config: &Config) -> Result<()> {
    report::write(table, config, &config.report_path)
}
