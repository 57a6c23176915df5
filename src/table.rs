//! In-memory representation of a gradebook CSV export.
//!
//! The export has one header row of column names, one "Points Possible"
//! metadata row, and one row per student. Loading is the only file I/O the
//! pipeline performs; everything downstream works on this struct.

use anyhow::{Context, Result, bail};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// A fully loaded gradebook table.
#[derive(Debug, Clone)]
pub struct RawGradebook {
    /// Column names from the header row.
    pub columns: Vec<String>,
    /// The first data row: possible points per column (blank for
    /// non-assignment columns).
    pub points_row: Vec<String>,
    /// One row per student, same width as `columns`.
    pub students: Vec<Vec<String>>,
}

impl RawGradebook {
    /// Loads a gradebook from a CSV file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open gradebook `{}`", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to read gradebook `{}`", path.display()))
    }

    /// Loads a gradebook from any CSV reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let columns: Vec<String> = rdr
            .headers()
            .context("gradebook has no header row")?
            .iter()
            .map(|c| c.trim().to_string())
            .collect();

        let mut rows = rdr.records();
        let points_row: Vec<String> = match rows.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => bail!("gradebook has no points-possible row"),
        };

        let mut students = Vec::new();
        for record in rows {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            // Pad short rows so cell lookup by column index stays total.
            row.resize(columns.len(), String::new());
            students.push(row);
        }

        debug!(
            columns = columns.len(),
            students = students.len(),
            "Gradebook loaded"
        );

        Ok(RawGradebook {
            columns,
            points_row,
            students,
        })
    }

    /// Index of the column with the given name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell value for a row/column pair; `None` when blank or out of range.
    pub fn cell<'a>(row: &'a [String], idx: usize) -> Option<&'a str> {
        let value = row.get(idx)?.trim();
        if value.is_empty() { None } else { Some(value) }
    }
}
