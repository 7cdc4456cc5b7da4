use std::path::Path;

use tracing::info;

use crate::aggregate::Aggregator;
use crate::columns::ColumnIndex;
use crate::config::ReportOptions;
use crate::discrepancy;
use crate::error::ReportError;
use crate::models::{Report, RowTally};
use crate::normalize::normalize_row;
use crate::ranking::Ranker;
use crate::source::{self, Sheet};

/// Reads a gradebook file and builds its report.
///
/// Fails only when the rows cannot be read or there is no data row below the header.
pub fn generate(
    path: &Path,
    sheet_name: Option<&str>,
    options: &ReportOptions,
) -> Result<Report, ReportError> {
    let rows = source::read_rows(path, sheet_name).map_err(|source| {
        ReportError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let sheet = Sheet::from_rows(rows)?;
    Ok(build_report(&sheet, options))
}

/// Runs one pass over the sheet's data rows and assembles the report.
pub fn build_report(sheet: &Sheet, options: &ReportOptions) -> Report {
    let required = options.required_columns();
    let index = ColumnIndex::resolve(sheet.headers(), &required);

    let mut aggregator = Aggregator::new();
    let mut ranker = Ranker::new(options.ranking, options.top_n);
    let mut discrepancies = Vec::new();
    let mut tally = RowTally {
        data_rows: sheet.rows().len(),
        ..Default::default()
    };

    for (data_index, row) in sheet.rows().iter().enumerate() {
        let Some(mut record) = normalize_row(data_index, row, &index, options.group_by) else {
            tally.empty_rows += 1;
            continue;
        };

        if let Some(found) = discrepancy::check(&mut record, options.tolerance) {
            discrepancies.push(found);
        }

        if !options.qualifies(record.group.as_deref()) {
            tally.filtered_rows += 1;
            continue;
        }

        tally.counted_rows += 1;
        aggregator.record(&record);
        ranker.record(&record);
    }

    let averages = aggregator.finish();

    info!(
        data_rows = tally.data_rows,
        counted = tally.counted_rows,
        empty = tally.empty_rows,
        filtered = tally.filtered_rows,
        discrepancies = discrepancies.len(),
        "gradebook report assembled"
    );

    Report {
        group_by: options.group_by,
        general_averages: averages.general,
        grouped_averages: averages.grouped,
        discrepancies,
        top_students: ranker.finish(),
        tally,
        missing_columns: index.missing().to_vec(),
    }
}
