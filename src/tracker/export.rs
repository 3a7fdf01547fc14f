use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use crate::models::Expense;

const HEADER: [&str; 4] = ["Date", "Category", "Amount", "Description"];

/// Render expenses as CSV. The description column is always quoted, with
/// embedded quotes doubled; the other columns never need quoting.
pub(crate) fn to_csv(expenses: &[&Expense]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(HEADER)?;
    for e in expenses {
        let date = e.date.format("%Y-%m-%d").to_string();
        let description = quote(e.description_or_empty());
        wtr.write_record([
            date.as_str(),
            e.category.as_str(),
            e.amount_text().as_str(),
            description.as_str(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not UTF-8")
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub(crate) fn export_filename(today: NaiveDate) -> String {
    format!("expenses_{}.csv", today.format("%Y%m%d"))
}

pub(crate) fn write_file(dir: &Path, csv: &str, today: NaiveDate) -> Result<PathBuf> {
    let path = dir.join(export_filename(today));
    std::fs::write(&path, csv)
        .with_context(|| format!("Failed to write export file: {}", path.display()))?;
    Ok(path)
}
