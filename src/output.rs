//! Output formatting and persistence for module summaries.
//!
//! Supports pretty-printing, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::stats::ModuleSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One flat CSV row per assignment distribution. The score-count vector does
/// not fit a CSV cell, so the appended rows carry only the summary stats.
#[derive(Serialize)]
struct DistributionRow<'a> {
    generated_at: DateTime<Utc>,
    module: u32,
    assignment: u32,
    desc: &'a str,
    possible: f64,
    nbr_students: usize,
    mean_of_submitted: Option<f64>,
    min_of_submitted: Option<f64>,
    max_of_all_present: Option<f64>,
    non_submission_count: u32,
    non_submission_rate: f64,
}

/// Logs a module summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &ModuleSummary) {
    debug!("{:#?}", summary);
}

/// Prints a module summary as pretty-printed JSON on stdout.
pub fn print_json(summary: &ModuleSummary) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

/// Appends one row per assignment to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, summary: &ModuleSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for dist in &summary.distributions {
        writer.serialize(DistributionRow {
            generated_at: summary.generated_at,
            module: summary.module,
            assignment: dist.assignment,
            desc: &dist.desc,
            possible: dist.possible,
            nbr_students: dist.nbr_students,
            mean_of_submitted: dist.mean_of_submitted,
            min_of_submitted: dist.min_of_submitted,
            max_of_all_present: dist.max_of_all_present,
            non_submission_count: dist.non_submission_count,
            non_submission_rate: dist.non_submission_rate,
        })?;
    }
    writer.flush()?;

    info!(
        path,
        rows = summary.distributions.len(),
        "Summary rows appended"
    );
    Ok(())
}
