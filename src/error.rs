//! Error taxonomy for the gradebook pipeline.
//!
//! Header/metadata decoding failures abort the whole invocation; partial
//! catalogs are never produced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GradebookError {
    /// A module column's name or metadata value does not decode into
    /// `(module, description, possible points)`.
    #[error("malformed header column `{column}`: {reason}")]
    MalformedHeader { column: String, reason: String },

    /// The requested module has no catalog entries.
    #[error("no assignments found for module {0}")]
    UnknownModule(u32),

    /// A grade cell is present but not numeric.
    #[error("non-numeric grade `{value}` for student `{student}` in column `{column}`")]
    MalformedGrade {
        student: String,
        column: String,
        value: String,
    },
}

impl GradebookError {
    pub(crate) fn malformed(column: &str, reason: impl Into<String>) -> Self {
        GradebookError::MalformedHeader {
            column: column.to_string(),
            reason: reason.into(),
        }
    }
}
