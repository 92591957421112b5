//! Markdown report generated from the history table.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::{
    config::Config,
    history::{COLUMNS, HistoryTable},
};

/// Extra width every column gets over its header.
const MIN_PADDING: usize = 2;

#[derive(Clone, Copy)]
enum Align {
    Left,
    Right,
}

/// Render `table` as a github-flavoured markdown table with a leading,
/// right-aligned row-index column.
pub fn markdown_table(table: &HistoryTable) -> String {
    let mut headers = vec![String::new()];
    headers.extend(COLUMNS.iter().map(|c| c.to_string()));

    let rows: Vec<Vec<String>> = table
        .records()
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let mut row = vec![idx.to_string()];
            row.extend(record.cells().iter().map(|cell| escape_cell(cell)));
            row
        })
        .collect();

    let aligns: Vec<Align> = (0..headers.len())
        .map(|col| if col == 0 { Align::Right } else { Align::Left })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|row| width(&row[col]))
                .fold(width(header) + MIN_PADDING, usize::max)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(&headers, &widths, &aligns));
    lines.push(separator(&widths, &aligns));
    lines.extend(rows.iter().map(|row| format_row(row, &widths, &aligns)));
    lines.join("\n")
}

/// Full report: badges, title, table and footer. No trailing newline.
pub fn render(table: &HistoryTable, config: &Config) -> String {
    let mut out = String::new();
    for badge in &config.report.badges {
        out.push_str(badge);
        out.push('\n');
    }
    out.push_str(&config.report_title());
    out.push_str("\n\n");
    out.push_str(&markdown_table(table));
    out.push_str("\n\n---\n");
    out.push_str(&config.report.footer);
    out
}

/// Render and overwrite `path` in full.
pub fn write(table: &HistoryTable, config: &Config, path: &Path) -> Result<()> {
    let content = render(table, config);
    fs::write(path, &content)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;
    tracing::debug!(rows = table.len(), "Wrote report to {}", path.display());
    Ok(())
}

fn width(s: &str) -> usize {
    s.chars().count()
}

// A literal pipe or newline would break the row.
fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{cell:<width$}"),
        Align::Right => format!("{cell:>width$}"),
    }
}

fn format_row(cells: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .zip(aligns)
        .map(|((cell, &w), &align)| format!(" {} ", pad(cell, w, align)))
        .collect();
    format!("|{}|", padded.join("|"))
}

fn separator(widths: &[usize], aligns: &[Align]) -> String {
    let segments: Vec<String> = widths
        .iter()
        .zip(aligns)
        .map(|(&w, align)| match align {
            Align::Left => format!(":{}", "-".repeat(w + 1)),
            Align::Right => format!("{}:", "-".repeat(w + 1)),
        })
        .collect();
    format!("|{}|", segments.join("|"))
}
