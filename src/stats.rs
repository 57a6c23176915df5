//! Per-assignment grade distributions for one module.
//!
//! This is the pipeline's last computation stage: enriched records in,
//! one [`AssignmentDistribution`] per catalog entry out, in panel order.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::{AssignmentCatalogEntry, parse_catalog};
use crate::error::GradebookError;
use crate::join::{EnrichedGradeRecord, filter_module, join_catalog};
use crate::reshape::reshape_grades;
use crate::table::RawGradebook;

/// Distribution statistics for a single assignment.
///
/// `counts[s]` is the number of students at integer score `s`; the axis
/// always spans `0..=possible`, so scores nobody earned show as zero counts.
/// Absent grades are mapped to zero before counting, which means
/// `non_submission_count` conflates true zero scores with non-submissions.
/// That matches the source gradebook's semantics and is a known caveat.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentDistribution {
    pub assignment: u32,
    pub desc: String,
    pub possible: f64,
    pub counts: Vec<u32>,
    pub nbr_students: usize,
    /// Mean over scores > 0; `None` when nobody scored above zero.
    pub mean_of_submitted: Option<f64>,
    /// Minimum over scores > 0; `None` when nobody scored above zero.
    pub min_of_submitted: Option<f64>,
    /// Maximum over all present grades, explicit zeros included; `None`
    /// when every grade is absent.
    pub max_of_all_present: Option<f64>,
    pub non_submission_count: u32,
    pub non_submission_rate: f64,
}

/// Everything the exhibit renderer needs for one module.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleSummary {
    pub generated_at: DateTime<Utc>,
    pub module: u32,
    pub distributions: Vec<AssignmentDistribution>,
}

/// Runs the full pipeline for one module: catalog, reshape, join, filter,
/// distributions. Identical input always yields identical output.
pub fn module_summary(book: &RawGradebook, module: u32) -> Result<ModuleSummary, GradebookError> {
    let catalog = parse_catalog(book)?;
    let module_catalog: Vec<AssignmentCatalogEntry> = catalog
        .iter()
        .filter(|e| e.module == module)
        .cloned()
        .collect();
    if module_catalog.is_empty() {
        return Err(GradebookError::UnknownModule(module));
    }

    let records = reshape_grades(book)?;
    let enriched = filter_module(join_catalog(records, &catalog), module);
    let distributions = module_distributions(&enriched, &module_catalog);

    info!(
        module,
        assignments = distributions.len(),
        records = enriched.len(),
        "Module summary computed"
    );

    Ok(ModuleSummary {
        generated_at: Utc::now(),
        module,
        distributions,
    })
}

/// Computes one distribution per catalog entry, ordered by assignment ordinal.
pub fn module_distributions(
    records: &[EnrichedGradeRecord],
    catalog: &[AssignmentCatalogEntry],
) -> Vec<AssignmentDistribution> {
    let mut entries: Vec<&AssignmentCatalogEntry> = catalog.iter().collect();
    entries.sort_by_key(|e| e.assignment);

    entries
        .iter()
        .map(|entry| {
            let cohort: Vec<&EnrichedGradeRecord> = records
                .iter()
                .filter(|r| r.assignment == Some(entry.assignment))
                .collect();
            distribution_for(entry, &cohort)
        })
        .collect()
}

fn distribution_for(
    entry: &AssignmentCatalogEntry,
    cohort: &[&EnrichedGradeRecord],
) -> AssignmentDistribution {
    let top = entry.possible.max(0.0).round() as usize;
    let mut counts = vec![0u32; top + 1];

    let mut submitted = Vec::new();
    let mut max_present: Option<f64> = None;

    for record in cohort {
        // Absent maps to zero here; scores are expected integral, rounding
        // keeps every record on the axis.
        let score = record.grade.unwrap_or(0.0);
        let bucket = (score.round() as i64).clamp(0, top as i64) as usize;
        counts[bucket] += 1;

        if score > 0.0 {
            submitted.push(score);
        }
        if let Some(grade) = record.grade {
            max_present = Some(max_present.map_or(grade, |m| grade.max(m)));
        }
    }

    let nbr_students = cohort.len();
    let non_submission_count = counts[0];
    let non_submission_rate = f64::from(non_submission_count) / nbr_students.max(1) as f64;

    let mean_of_submitted = if submitted.is_empty() {
        None
    } else {
        Some(submitted.iter().sum::<f64>() / submitted.len() as f64)
    };
    let min_of_submitted = submitted.iter().copied().reduce(f64::min);

    AssignmentDistribution {
        assignment: entry.assignment,
        desc: entry.desc.clone(),
        possible: entry.possible,
        counts,
        nbr_students,
        mean_of_submitted,
        min_of_submitted,
        max_of_all_present: max_present,
        non_submission_count,
        non_submission_rate,
    }
}
