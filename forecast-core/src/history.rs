use anyhow::{Context, Result};
use bincode::config::{Configuration, Fixint, LittleEndian};
use serde::{Deserialize, Serialize};
use std::{fs, io::Write, path::Path};
use tempfile::NamedTempFile;

use crate::model::ForecastPeriod;

const BINCODE_CONFIG: Configuration<LittleEndian, Fixint> =
    bincode::config::standard().with_fixed_int_encoding();

/// Column headers, in display order.
pub const COLUMNS: [&str; 3] = ["Start Date", "End Date", "Forecast"];

/// One previously fetched nightly forecast.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "Start Date")]
    pub start_date: String,
    #[serde(rename = "End Date")]
    pub end_date: String,
    #[serde(rename = "Forecast")]
    pub forecast: String,
}

impl HistoryRecord {
    pub fn cells(&self) -> [&str; 3] {
        [&self.start_date, &self.end_date, &self.forecast]
    }
}

impl From<&ForecastPeriod> for HistoryRecord {
    fn from(period: &ForecastPeriod) -> Self {
        Self {
            start_date: period.start_time.clone(),
            end_date: period.end_time.clone(),
            forecast: period.detailed_forecast.clone(),
        }
    }
}

/// Ordered, duplicate-free sequence of [`HistoryRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryTable {
    records: Vec<HistoryRecord>,
}

impl HistoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from rows, dropping exact duplicates.
    pub fn from_records(records: impl IntoIterator<Item = HistoryRecord>) -> Self {
        let mut table = Self {
            records: records.into_iter().collect(),
        };
        table.dedup();
        table
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append `record` and drop exact duplicates. Returns `true` if the table grew.
    pub fn append(&mut self, record: HistoryRecord) -> bool {
        let before = self.records.len();
        self.records.push(record);
        self.dedup();
        self.records.len() > before
    }

    /// Remove fully-identical rows, keeping the first occurrence of each.
    pub fn dedup(&mut self) {
        let mut kept: Vec<HistoryRecord> = Vec::with_capacity(self.records.len());
        for record in self.records.drain(..) {
            if !kept.contains(&record) {
                kept.push(record);
            }
        }
        self.records = kept;
    }

    /// Load the table from `path`, or start empty if the file doesn't exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No history at {}, starting an empty table", path.display());
            return Ok(Self::new());
        }

        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;

        let (table, _): (Self, usize) =
            bincode::serde::decode_from_slice(&bytes, BINCODE_CONFIG)
                .with_context(|| format!("Failed to decode history file: {}", path.display()))?;

        tracing::debug!(rows = table.len(), "Loaded history from {}", path.display());
        Ok(Self::from_records(table.records))
    }

    /// Overwrite `path` with this table. The new content is written to a
    /// sibling temporary file and renamed over the target.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serde::encode_to_vec(self, BINCODE_CONFIG)
            .context("Failed to encode history table")?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.as_file().sync_all())
            .with_context(|| {
                format!("Failed to write temporary history file for {}", path.display())
            })?;
        tmp.persist(path)
            .with_context(|| format!("Failed to replace history file: {}", path.display()))?;

        tracing::debug!(
            rows = self.len(),
            bytes = bytes.len(),
            "Saved history to {}",
            path.display()
        );
        Ok(())
    }
}
