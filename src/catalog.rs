//! Assignment catalog decoding.
//!
//! Gradebook exports encode assignment metadata inside column names shaped
//! like `M<module><suffix>: <description> (<id>)`, with the possible points
//! stashed in the first data row. All of that schema-on-read decoding lives
//! here so downstream stages only ever see typed entries.

use serde::Serialize;
use tracing::warn;

use crate::error::GradebookError;
use crate::table::RawGradebook;

/// One assignment as described by the gradebook header.
///
/// `assignment` is a dense 1-based ordinal per module, ranked by the raw
/// column-suffix token (e.g. `Quiz 1` in `M3 Quiz 1: ...`). The rank decides
/// panel order in the exhibit, so it must be stable across column reorders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentCatalogEntry {
    pub module: u32,
    pub assignment: u32,
    pub desc: String,
    pub possible: f64,
}

/// A column name decoded into its module, raw suffix token, and description.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentColumn {
    pub module: u32,
    pub token: String,
    pub desc: String,
}

/// True for column names that describe a single-module assignment:
/// `M` followed immediately by a digit. This deliberately rejects
/// `Multiple ...` aggregate columns and keeps `M1` distinct from `M10`.
pub fn is_assignment_column(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('M') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

/// Drops every `(1234)`-style numeric id from a column name.
fn strip_numeric_ids(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut rest = name;
    while let Some(open) = rest.find('(') {
        match rest[open + 1..].find(')') {
            Some(len) if rest[open + 1..open + 1 + len].bytes().all(|b| b.is_ascii_digit()) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + len + 2..];
            }
            _ => {
                out.push_str(&rest[..open + 1]);
                rest = &rest[open + 1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes a column name into an [`AssignmentColumn`].
///
/// Returns `Ok(None)` for cross-module aggregate columns (module token
/// `Multiple`), which have no single home module and never enter the
/// catalog. Any other shape violation is a [`GradebookError::MalformedHeader`].
pub fn decode_column(name: &str) -> Result<Option<AssignmentColumn>, GradebookError> {
    let stripped = strip_numeric_ids(name);
    let (left, desc) = stripped
        .split_once(':')
        .ok_or_else(|| GradebookError::malformed(name, "missing `:` before description"))?;

    let left = left.trim();
    let (module_token, token) = left
        .split_once(char::is_whitespace)
        .ok_or_else(|| GradebookError::malformed(name, "missing assignment token"))?;

    if module_token == "Multiple" {
        return Ok(None);
    }

    let module: u32 = module_token
        .strip_prefix('M')
        .and_then(|m| m.parse().ok())
        .ok_or_else(|| {
            GradebookError::malformed(name, format!("module token `{module_token}` is not M<int>"))
        })?;

    Ok(Some(AssignmentColumn {
        module,
        token: token.trim().to_string(),
        desc: desc.trim().to_string(),
    }))
}

/// Decodes the header and points row into the full assignment catalog,
/// covering every module present. Callers filter to one module downstream.
pub fn parse_catalog(book: &RawGradebook) -> Result<Vec<AssignmentCatalogEntry>, GradebookError> {
    let mut decoded = Vec::new();

    for (idx, name) in book.columns.iter().enumerate() {
        if !is_assignment_column(name) {
            continue;
        }
        let Some(column) = decode_column(name)? else {
            continue;
        };

        let possible: f64 = book
            .points_row
            .get(idx)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| GradebookError::malformed(name, "possible points is not numeric"))?;

        decoded.push((column, possible));
    }

    // Stable sort: a duplicate token within a module keeps encounter order.
    decoded.sort_by(|(a, _), (b, _)| (a.module, &a.token).cmp(&(b.module, &b.token)));

    for pair in decoded.windows(2) {
        let (a, b) = (&pair[0].0, &pair[1].0);
        if a.module == b.module && a.token == b.token {
            warn!(
                module = a.module,
                token = %a.token,
                "Duplicate assignment token; ordinals assigned in encounter order"
            );
        }
    }

    let mut catalog = Vec::with_capacity(decoded.len());
    let mut current_module = None;
    let mut ordinal = 0;

    for (column, possible) in decoded {
        if current_module != Some(column.module) {
            current_module = Some(column.module);
            ordinal = 0;
        }
        ordinal += 1;
        catalog.push(AssignmentCatalogEntry {
            module: column.module,
            assignment: ordinal,
            desc: column.desc,
            possible,
        });
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(columns: &[&str], points: &[&str]) -> RawGradebook {
        RawGradebook {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            points_row: points.iter().map(|p| p.to_string()).collect(),
            students: vec![],
        }
    }

    #[test]
    fn test_decode_strips_id_and_splits_tokens() {
        let column = decode_column("M3 Quiz 1: Chapter Review (1234)")
            .unwrap()
            .unwrap();
        assert_eq!(column.module, 3);
        assert_eq!(column.token, "Quiz 1");
        assert_eq!(column.desc, "Chapter Review");
    }

    #[test]
    fn test_decode_multiple_is_cross_module() {
        let column = decode_column("Multiple Extra Credit: Bonus (99)").unwrap();
        assert!(column.is_none());
    }

    #[test]
    fn test_decode_rejects_non_numeric_module() {
        assert!(matches!(
            decode_column("Mx Quiz 1: Broken (1)"),
            Err(GradebookError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_missing_colon() {
        assert!(decode_column("M3 Quiz 1 Chapter Review").is_err());
    }

    #[test]
    fn test_selection_rejects_multiple_and_plain_columns() {
        assert!(is_assignment_column("M3 Quiz 1: Chapter Review (1234)"));
        assert!(is_assignment_column("M10 Lab 1: Big Module (9)"));
        assert!(!is_assignment_column("Multiple Extra Credit: Bonus (99)"));
        assert!(!is_assignment_column("Student"));
        assert!(!is_assignment_column("Midterm: Exam (5)"));
    }

    #[test]
    fn test_catalog_ordinals_rank_by_token_not_order() {
        let book = book(
            &[
                "Student",
                "M3 Quiz 1: Chapter Review (1234)",
                "M3 Lab 2: Loops Lab (1235)",
            ],
            &["Points Possible", "10", "20"],
        );
        let catalog = parse_catalog(&book).unwrap();
        // "Lab 2" sorts before "Quiz 1" regardless of column order.
        assert_eq!(catalog[0].desc, "Loops Lab");
        assert_eq!(catalog[0].assignment, 1);
        assert_eq!(catalog[1].desc, "Chapter Review");
        assert_eq!(catalog[1].assignment, 2);
    }

    #[test]
    fn test_catalog_stable_under_column_reorder() {
        let a = parse_catalog(&book(
            &["M2 A: First (1)", "M2 B: Second (2)", "M1 C: Third (3)"],
            &["1", "2", "3"],
        ))
        .unwrap();
        let b = parse_catalog(&book(
            &["M1 C: Third (3)", "M2 B: Second (2)", "M2 A: First (1)"],
            &["3", "2", "1"],
        ))
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_catalog_ordinals_are_dense_per_module() {
        let catalog = parse_catalog(&book(
            &["M1 A: W (1)", "M2 A: X (2)", "M1 B: Y (3)", "M2 C: Z (4)"],
            &["5", "5", "5", "5"],
        ))
        .unwrap();
        for module in [1, 2] {
            let ordinals: Vec<u32> = catalog
                .iter()
                .filter(|e| e.module == module)
                .map(|e| e.assignment)
                .collect();
            assert_eq!(ordinals, vec![1, 2]);
        }
    }

    #[test]
    fn test_catalog_rejects_non_numeric_points() {
        let result = parse_catalog(&book(&["M1 A: X (1)"], &["ten"]));
        assert!(matches!(
            result,
            Err(GradebookError::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_catalog_skips_multiple_columns() {
        let catalog = parse_catalog(&book(
            &["M1 A: X (1)", "Multiple Extra Credit: Bonus (99)"],
            &["5", "10"],
        ))
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.iter().all(|e| e.desc != "Bonus"));
    }

    #[test]
    fn test_duplicate_tokens_keep_encounter_order() {
        let catalog = parse_catalog(&book(
            &["M1 A: First Seen (1)", "M1 A: Second Seen (2)"],
            &["5", "5"],
        ))
        .unwrap();
        assert_eq!(catalog[0].desc, "First Seen");
        assert_eq!(catalog[0].assignment, 1);
        assert_eq!(catalog[1].assignment, 2);
    }

    #[test]
    fn test_strip_ids_leaves_non_numeric_parens() {
        assert_eq!(
            strip_numeric_ids("M1 A: Lab (part 2) (77)"),
            "M1 A: Lab (part 2) "
        );
        assert_eq!(strip_numeric_ids("M1 A: Plain"), "M1 A: Plain");
    }
}
