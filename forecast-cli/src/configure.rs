//! Interactive `configure` command.

use std::path::{Path, PathBuf};

use anyhow::Context;
use forecast_core::Config;
use inquire::{CustomType, Text};

/// Prompt for each setting, prefilled with the current value, then save to `path`.
pub fn run(mut config: Config, path: &Path) -> anyhow::Result<()> {
    println!("Editing {}", path.display());

    config.city = Text::new("City:")
        .with_default(&config.city)
        .prompt()
        .context("Failed to read city")?;

    config.history_path = prompt_path("History table file:", &config.history_path)?;
    config.report_path = prompt_path("Report file:", &config.report_path)?;

    config.http.user_agent = Text::new("HTTP User-Agent:")
        .with_default(&config.http.user_agent)
        .with_help_message("Nominatim and api.weather.gov reject anonymous requests")
        .prompt()
        .context("Failed to read user agent")?;

    config.http.timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.http.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()
        .context("Failed to read request timeout")?;

    config.save_to(path)?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn prompt_path(message: &str, current: &Path) -> anyhow::Result<PathBuf> {
    let default = current.display().to_string();
    let answer = Text::new(message)
        .with_default(&default)
        .prompt()
        .with_context(|| format!("Failed to read '{message}'"))?;
    Ok(PathBuf::from(answer))
}
