//! Output formatting and persistence for calculation results.
//!
//! Supports the plain-text summary, JSON serialization, and CSV history append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::types::{AggregateResult, round2};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One row of the calculation history file.
#[derive(Debug, Clone, Serialize)]
pub struct CalculationRecord {
    pub timestamp: DateTime<Utc>,
    pub courses: usize,
    pub total_credits: f64,
    pub total_points: f64,
    pub cgpa: f64,
}

impl CalculationRecord {
    /// Stamps `result` with the current time.
    pub fn from_result(result: &AggregateResult, courses: usize) -> Self {
        CalculationRecord {
            timestamp: Utc::now(),
            courses,
            total_credits: result.total_credits,
            total_points: result.total_points,
            cgpa: result.cgpa,
        }
    }
}

/// A result as displayed: total points and CGPA to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub total_credits: f64,
    pub total_points: f64,
    pub cgpa: f64,
}

impl From<&AggregateResult> for ResultView {
    fn from(result: &AggregateResult) -> Self {
        ResultView {
            total_credits: result.total_credits,
            total_points: round2(result.total_points),
            cgpa: result.cgpa,
        }
    }
}

/// The three result lines shown under "CGPA Result".
pub fn render_summary(result: &AggregateResult) -> String {
    format!(
        "Total Credit Hours: {}\nTotal Grade Points: {:.2}\nFinal CGPA: {:.2}",
        result.total_credits, result.total_points, result.cgpa
    )
}

/// Logs a result using Rust's debug pretty-print format.
pub fn print_pretty(result: &AggregateResult) {
    debug!("{:#?}", result);
}

/// Pretty-printed JSON of the displayed [`ResultView`].
pub fn render_json(result: &AggregateResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(&ResultView::from(result))?)
}

/// Writes a result to stdout as pretty-printed JSON.
pub fn print_json(result: &AggregateResult) -> Result<()> {
    println!("{}", render_json(result)?);
    Ok(())
}

/// Appends a [`CalculationRecord`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: impl AsRef<Path>, record: &CalculationRecord) -> Result<()> {
    let path = path.as_ref();
    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);

    writer.serialize(record)?;
    writer.flush()?;

    Ok(())
}
