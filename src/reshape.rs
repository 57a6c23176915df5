//! Wide-to-long reshaping of student grade rows.
//!
//! Each student row carries one cell per assignment column; this melts the
//! table into one [`GradeRecord`] per (student, assignment column) pair.

use serde::Serialize;
use tracing::debug;

use crate::catalog::{AssignmentColumn, decode_column, is_assignment_column};
use crate::error::GradebookError;
use crate::table::RawGradebook;

/// One observed grade, before catalog metadata is attached.
///
/// `grade` is `None` for a blank cell (non-submission). Downstream
/// aggregation maps it to zero; it is never dropped, since it feeds the
/// non-submission statistic.
#[derive(Debug, Clone, Serialize)]
pub struct GradeRecord {
    pub student: String,
    pub module: u32,
    pub desc: String,
    pub grade: Option<f64>,
}

const STUDENT_COLUMN: &str = "Student";

/// Produces long-form grade records for every assignment column in the book,
/// across all modules. Output order is not significant.
pub fn reshape_grades(book: &RawGradebook) -> Result<Vec<GradeRecord>, GradebookError> {
    let student_idx = book
        .column_index(STUDENT_COLUMN)
        .ok_or_else(|| GradebookError::malformed(STUDENT_COLUMN, "student column not found"))?;

    let mut assignment_columns: Vec<(usize, AssignmentColumn)> = Vec::new();
    for (idx, name) in book.columns.iter().enumerate() {
        if !is_assignment_column(name) {
            continue;
        }
        if let Some(column) = decode_column(name)? {
            assignment_columns.push((idx, column));
        }
    }

    let mut records = Vec::with_capacity(book.students.len() * assignment_columns.len());
    for row in &book.students {
        let student = RawGradebook::cell(row, student_idx)
            .unwrap_or_default()
            .to_string();

        for (idx, column) in &assignment_columns {
            let grade = match RawGradebook::cell(row, *idx) {
                None => None,
                Some(value) => {
                    Some(
                        value
                            .parse::<f64>()
                            .map_err(|_| GradebookError::MalformedGrade {
                                student: student.clone(),
                                column: book.columns[*idx].clone(),
                                value: value.to_string(),
                            })?,
                    )
                }
            };
            records.push(GradeRecord {
                student: student.clone(),
                module: column.module,
                desc: column.desc.clone(),
                grade,
            });
        }
    }

    debug!(records = records.len(), "Gradebook reshaped to long form");
    Ok(records)
}
