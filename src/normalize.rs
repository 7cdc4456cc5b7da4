use crate::columns::{self, ColumnIndex};
use crate::config::GroupBy;
use crate::models::{Component, ComponentScores, StudentRecord};

pub const UNKNOWN_BRANCH: &str = "Unknown";

pub fn is_empty_row<S: AsRef<str>>(row: &[S]) -> bool {
    row.iter().all(|cell| cell.as_ref().trim().is_empty())
}

/// Parses a score cell, treating anything unparsable or non-finite as 0.0.
pub fn parse_score(value: &str) -> f64 {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|score| score.is_finite())
        .unwrap_or(0.0)
}

/// Branch code encoded at characters 4..6 of a campus id, e.g. `2024A7PS0001P` -> `A7`.
pub fn branch_code(campus_id: &str) -> String {
    let campus_id = campus_id.trim();
    if campus_id.chars().count() < 6 {
        return UNKNOWN_BRANCH.to_string();
    }
    campus_id.chars().skip(4).take(2).collect()
}

/// Converts one data row into a record, or `None` when every cell is blank.
///
/// `data_index` is the 0-based position below the header; the record keeps the
/// 1-based sheet row number.
pub fn normalize_row<S: AsRef<str>>(
    data_index: usize,
    row: &[S],
    index: &ColumnIndex,
    group_by: GroupBy,
) -> Option<StudentRecord> {
    if is_empty_row(row) {
        return None;
    }

    let score = |component: Component| parse_score(index.cell(row, component.label()));

    let scores = ComponentScores {
        quiz: score(Component::Quiz),
        mid_sem: score(Component::MidSem),
        lab_test: score(Component::LabTest),
        weekly_labs: score(Component::WeeklyLabs),
        compre: score(Component::Compre),
        total: score(Component::Total),
    };

    let group = match group_by {
        GroupBy::Branch => Some(branch_code(index.cell(row, columns::CAMPUS_ID))),
        GroupBy::Class => Some(index.cell(row, columns::CLASS_NO).trim().to_string()),
        GroupBy::Ungrouped => None,
    };

    Some(StudentRecord {
        row: data_index + 2,
        emplid: index.cell(row, columns::EMPLID).trim().to_string(),
        group,
        scores,
        computed_total: 0.0,
        discrepancy: false,
    })
}
