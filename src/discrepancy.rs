use tracing::debug;

use crate::models::{ComponentScores, DiscrepancyRecord, StudentRecord};

pub const DEFAULT_TOLERANCE: f64 = 0.01;

pub fn computed_total(scores: &ComponentScores) -> f64 {
    scores.pre_compre() + scores.compre
}

/// Fills in the recomputed total and flag, returning a record when the stated
/// total is off by strictly more than `tolerance`.
pub fn check(record: &mut StudentRecord, tolerance: f64) -> Option<DiscrepancyRecord> {
    record.computed_total = computed_total(&record.scores);
    record.discrepancy = (record.computed_total - record.scores.total).abs() > tolerance;

    if !record.discrepancy {
        return None;
    }

    debug!(
        row = record.row,
        emplid = %record.emplid,
        computed = record.computed_total,
        expected = record.scores.total,
        "stated total disagrees with components"
    );

    Some(DiscrepancyRecord {
        row: record.row,
        identifier: record.emplid.clone(),
        computed_total: record.computed_total,
        expected_total: record.scores.total,
    })
}
