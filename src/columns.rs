use std::collections::HashMap;

use tracing::warn;

pub const EMPLID: &str = "Emplid";
pub const CAMPUS_ID: &str = "Campus ID";
pub const CLASS_NO: &str = "Class No.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    #[error("required column '{0}' did not match any header")]
    MissingColumn(String),
}

/// Positions of required columns within one sheet's header row.
///
/// A required label matches a header cell when the cell text contains it.
/// When several header cells match the same label the last one wins, so a
/// decorated header placed after a plain one takes over the lookup.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<String, usize>,
    missing: Vec<String>,
}

impl ColumnIndex {
    pub fn resolve<S: AsRef<str>>(headers: &[S], required: &[&str]) -> Self {
        let mut positions = HashMap::new();

        for (position, header) in headers.iter().enumerate() {
            for label in required {
                if header.as_ref().contains(label) {
                    positions.insert((*label).to_string(), position);
                }
            }
        }

        let missing: Vec<String> = required
            .iter()
            .filter(|label| !positions.contains_key(**label))
            .map(|label| (*label).to_string())
            .collect();

        for label in &missing {
            warn!(column = %label, "required column not found in header row");
        }

        Self { positions, missing }
    }

    pub fn position(&self, label: &str) -> Result<usize, ColumnError> {
        self.positions
            .get(label)
            .copied()
            .ok_or_else(|| ColumnError::MissingColumn(label.to_string()))
    }

    /// Cell text for `label`, or "" when the column is missing or the row is short.
    pub fn cell<'a, S: AsRef<str>>(&self, row: &'a [S], label: &str) -> &'a str {
        self.position(label)
            .ok()
            .and_then(|position| row.get(position))
            .map(|cell| cell.as_ref())
            .unwrap_or("")
    }

    pub fn missing(&self) -> &[String] {
        &self.missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        [
            "Emplid",
            "Quiz (30)",
            "Mid-Sem (75)",
            "Lab Test (60)",
            "Weekly Labs (30)",
            "Compre (105)",
            "Total (300)",
        ]
        .iter()
        .map(|h| h.to_string())
        .collect()
    }

    #[test]
    fn resolves_by_substring() {
        let headers = vec!["  Emplid ".to_string(), "Quiz (30) [weighted]".to_string()];
        let index = ColumnIndex::resolve(&headers, &["Emplid", "Quiz (30)"]);
        assert_eq!(index.position("Emplid"), Ok(0));
        assert_eq!(index.position("Quiz (30)"), Ok(1));
        assert!(index.missing().is_empty());
    }

    #[test]
    fn last_matching_header_wins() {
        let headers = vec![
            "Total (300)".to_string(),
            "Emplid".to_string(),
            "Final Total (300) adjusted".to_string(),
        ];
        let index = ColumnIndex::resolve(&headers, &["Total (300)"]);
        assert_eq!(index.position("Total (300)"), Ok(2));
    }

    #[test]
    fn missing_column_is_reported_and_lookups_default() {
        let index = ColumnIndex::resolve(&headers(), &["Emplid", "Class No."]);
        assert_eq!(index.missing(), &["Class No.".to_string()]);
        assert_eq!(
            index.position("Class No."),
            Err(ColumnError::MissingColumn("Class No.".to_string()))
        );

        let row = vec!["E1".to_string(), "10".to_string()];
        assert_eq!(index.cell(&row, "Class No."), "");
        assert_eq!(index.cell(&row, "Emplid"), "E1");
    }

    #[test]
    fn short_rows_yield_empty_cells() {
        let index = ColumnIndex::resolve(&headers(), &["Total (300)"]);
        let row = vec!["E1".to_string()];
        assert_eq!(index.cell(&row, "Total (300)"), "");
    }

    #[test]
    fn pre_compre_header_does_not_capture_compre() {
        let headers = vec!["Pre-Compre (195)".to_string(), "Compre (105)".to_string()];
        let index = ColumnIndex::resolve(&headers, &["Compre (105)"]);
        assert_eq!(index.position("Compre (105)"), Ok(1));
    }
}
