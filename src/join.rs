//! Attaching catalog metadata to long-form grade records.

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::AssignmentCatalogEntry;
use crate::reshape::GradeRecord;

/// A grade record with its catalog metadata attached, when the join matched.
///
/// The join is a left join: a grade column whose description no longer lines
/// up with the catalog keeps its record, with `assignment` and `possible`
/// left empty, rather than silently disappearing from the cohort.
#[derive(Debug, Clone, Serialize)]
pub struct EnrichedGradeRecord {
    pub student: String,
    pub module: u32,
    pub desc: String,
    pub grade: Option<f64>,
    pub assignment: Option<u32>,
    pub possible: Option<f64>,
}

/// Left-joins grade records against the catalog on `(module, desc)`.
/// Both sides are already whitespace-trimmed by the column decoder.
pub fn join_catalog(
    records: Vec<GradeRecord>,
    catalog: &[AssignmentCatalogEntry],
) -> Vec<EnrichedGradeRecord> {
    let by_key: HashMap<(u32, &str), &AssignmentCatalogEntry> = catalog
        .iter()
        .map(|entry| ((entry.module, entry.desc.as_str()), entry))
        .collect();

    records
        .into_iter()
        .map(|record| {
            let matched = by_key.get(&(record.module, record.desc.as_str()));
            let assignment = matched.map(|e| e.assignment);
            let possible = matched.map(|e| e.possible);
            EnrichedGradeRecord {
                student: record.student,
                module: record.module,
                desc: record.desc,
                grade: record.grade,
                assignment,
                possible,
            }
        })
        .collect()
}

/// Restricts enriched records to one module, keyed on the grade record's own
/// module field so the exhibit reflects what students were actually graded on.
pub fn filter_module(records: Vec<EnrichedGradeRecord>, module: u32) -> Vec<EnrichedGradeRecord> {
    records.into_iter().filter(|r| r.module == module).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(module: u32, desc: &str, grade: Option<f64>) -> GradeRecord {
        GradeRecord {
            student: "Doe, Jane".into(),
            module,
            desc: desc.into(),
            grade,
        }
    }

    fn entry(module: u32, assignment: u32, desc: &str) -> AssignmentCatalogEntry {
        AssignmentCatalogEntry {
            module,
            assignment,
            desc: desc.into(),
            possible: 10.0,
        }
    }

    #[test]
    fn test_join_attaches_ordinal_and_points() {
        let enriched = join_catalog(
            vec![record(3, "Chapter Review", Some(7.0))],
            &[entry(3, 2, "Chapter Review")],
        );
        assert_eq!(enriched[0].assignment, Some(2));
        assert_eq!(enriched[0].possible, Some(10.0));
    }

    #[test]
    fn test_unmatched_records_are_kept_with_empty_metadata() {
        let enriched = join_catalog(
            vec![record(3, "Renamed Since Export", Some(7.0))],
            &[entry(3, 1, "Chapter Review")],
        );
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].assignment, None);
        assert_eq!(enriched[0].possible, None);
    }

    #[test]
    fn test_join_preserves_record_fields_alongside_metadata() {
        let enriched = join_catalog(
            vec![record(3, "Chapter Review", Some(7.0))],
            &[entry(3, 2, "Chapter Review")],
        );
        // The record's own fields survive the join intact while the catalog
        // metadata is attached.
        assert_eq!(enriched[0].student, "Doe, Jane");
        assert_eq!(enriched[0].desc, "Chapter Review");
        assert_eq!(enriched[0].grade, Some(7.0));
        assert_eq!(enriched[0].assignment, Some(2));
    }

    #[test]
    fn test_join_key_includes_module() {
        // Same description in two modules must not cross-match.
        let enriched = join_catalog(
            vec![record(4, "Chapter Review", None)],
            &[entry(3, 1, "Chapter Review"), entry(4, 2, "Chapter Review")],
        );
        assert_eq!(enriched[0].assignment, Some(2));
    }

    #[test]
    fn test_filter_module_uses_record_side() {
        let enriched = join_catalog(
            vec![record(3, "A", None), record(4, "B", None)],
            &[entry(3, 1, "A")],
        );
        let filtered = filter_module(enriched, 3);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].module, 3);
    }
}
