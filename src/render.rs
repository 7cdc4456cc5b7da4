use std::fmt::Write;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::models::Report;

pub fn render_markdown(report: &Report, generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Gradebook Audit Report");
    let _ = writeln!(
        output,
        "Generated {} from {} counted row(s)",
        generated_at.format("%Y-%m-%d %H:%M UTC"),
        report.tally.counted_rows
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## General Averages");

    if report.general_averages.is_empty() {
        let _ = writeln!(output, "No qualifying records.");
    } else {
        for (component, average) in &report.general_averages {
            let _ = writeln!(output, "- {} Average: {:.2}", component, average);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", report.group_by.averages_heading());

    if report.grouped_averages.is_empty() {
        let _ = writeln!(output, "No grouped records.");
    } else {
        for (group, average) in &report.grouped_averages {
            let _ = writeln!(output, "- {} Average Total: {:.2}", group, average);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top Students Per Component");

    if report.top_students.is_empty() {
        let _ = writeln!(output, "No qualifying records.");
    }
    for (component, entries) in &report.top_students {
        let _ = writeln!(output);
        let _ = writeln!(output, "### {}", component);
        for entry in entries {
            let _ = writeln!(
                output,
                "{}. {} ({}) marks {:.2}",
                entry.rank,
                entry.identifier,
                entry.grouping_key.as_deref().unwrap_or("-"),
                entry.marks
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Discrepancies");

    if report.discrepancies.is_empty() {
        let _ = writeln!(output, "Every stated total matches its components.");
    } else {
        for found in &report.discrepancies {
            let _ = writeln!(
                output,
                "- Row {} ({}): Computed Total = {:.2}, Expected Total = {:.2}",
                found.row, found.identifier, found.computed_total, found.expected_total
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Row Summary");
    let _ = writeln!(
        output,
        "- {} data row(s): {} counted, {} empty, {} filtered out",
        report.tally.data_rows,
        report.tally.counted_rows,
        report.tally.empty_rows,
        report.tally.filtered_rows
    );

    if !report.missing_columns.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Missing Columns");
        for label in &report.missing_columns {
            let _ = writeln!(output, "- {} (values read as blank)", label);
        }
    }

    output
}

pub fn to_json(report: &Report) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

pub fn export_json(report: &Report, path: &Path) -> anyhow::Result<()> {
    std::fs::write(path, to_json(report)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupBy;
    use crate::models::{Component, DiscrepancyRecord, RankingEntry, RowTally};
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn sample() -> Report {
        let mut general_averages = BTreeMap::new();
        general_averages.insert(Component::Total, 92.5);
        let mut grouped_averages = BTreeMap::new();
        grouped_averages.insert("A7".to_string(), 92.5);
        let mut top_students = BTreeMap::new();
        top_students.insert(
            Component::Total,
            vec![RankingEntry {
                rank: 1,
                identifier: "E2".to_string(),
                grouping_key: Some("A7".to_string()),
                marks: 95.0,
            }],
        );

        Report {
            group_by: GroupBy::Branch,
            general_averages,
            grouped_averages,
            discrepancies: vec![DiscrepancyRecord {
                row: 3,
                identifier: "E2".to_string(),
                computed_total: 90.0,
                expected_total: 95.0,
            }],
            top_students,
            tally: RowTally {
                data_rows: 2,
                empty_rows: 0,
                filtered_rows: 0,
                counted_rows: 2,
            },
            missing_columns: Vec::new(),
        }
    }

    #[test]
    fn markdown_lists_each_section() {
        let generated_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();
        let text = render_markdown(&sample(), generated_at);
        assert!(text.contains("Generated 2026-03-01 09:30 UTC from 2 counted row(s)"));
        assert!(text.contains("- Total Average: 92.50"));
        assert!(text.contains("## Branch-wise Averages\n- A7 Average Total: 92.50"));
        assert!(text.contains("### Total\n1. E2 (A7) marks 95.00"));
        assert!(text.contains("- Row 3 (E2): Computed Total = 90.00, Expected Total = 95.00"));
        assert!(!text.contains("## Missing Columns"));
    }

    #[test]
    fn markdown_handles_empty_report() {
        let report = Report {
            group_by: GroupBy::Class,
            general_averages: BTreeMap::new(),
            grouped_averages: BTreeMap::new(),
            discrepancies: Vec::new(),
            top_students: BTreeMap::new(),
            tally: RowTally::default(),
            missing_columns: vec!["Class No.".to_string()],
        };
        let text = render_markdown(&report, Utc::now());
        assert!(text.contains("No qualifying records."));
        assert!(text.contains("## Class-wise Averages\nNo grouped records."));
        assert!(text.contains("Every stated total matches its components."));
        assert!(text.contains("- Class No. (values read as blank)"));
    }

    #[test]
    fn json_uses_report_field_names() {
        let value: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(value["generalAverages"]["Total"], 92.5);
        assert_eq!(value["groupedAverages"]["A7"], 92.5);
        assert_eq!(value["discrepancies"][0]["computedTotal"], 90.0);
        assert_eq!(value["discrepancies"][0]["expectedTotal"], 95.0);
        assert_eq!(value["topStudents"]["Total"][0]["groupingKey"], "A7");
        assert_eq!(value["tally"]["countedRows"], 2);
        assert_eq!(value["groupBy"], "branch");
    }

    #[test]
    fn exports_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        export_json(&sample(), &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"discrepancies\""));
    }
}
