//! Integrity checks and summary statistics for spreadsheet-exported gradebooks.
//!
//! A gradebook is a header row plus data rows of text cells. Each data row is
//! checked for a stated total that disagrees with its components, then counted
//! into overall and per-group averages and per-component top-N rankings.

pub mod aggregate;
pub mod columns;
pub mod config;
pub mod discrepancy;
pub mod error;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod render;
pub mod report;
pub mod source;
pub mod telemetry;
