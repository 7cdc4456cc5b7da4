use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use gradebook_audit::columns::ColumnIndex;
use gradebook_audit::config::{GroupBy, RankingKey, ReportOptions};
use gradebook_audit::source::{self, Sheet};
use gradebook_audit::{render, report, telemetry};
use tracing::info;

#[derive(Parser)]
#[command(name = "gradebook-audit")]
#[command(about = "Integrity check and ranking summary for exported gradebooks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a markdown report and optional JSON export
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        options: OptionArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        /// Also write the report as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// List rows whose stated total disagrees with their components
    Check {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Show which header each required column resolved to
    Columns {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long, value_enum)]
        group_by: Option<GroupBy>,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Gradebook file (.csv, .tsv, .xlsx, .xls, .ods)
    #[arg(long)]
    file: PathBuf,
    /// Worksheet to read; defaults to the first sheet
    #[arg(long)]
    sheet: Option<String>,
}

#[derive(Args)]
struct OptionArgs {
    #[arg(long, value_enum)]
    group_by: Option<GroupBy>,
    /// Only aggregate and rank records with this grouping key
    #[arg(long)]
    filter: Option<String>,
    #[arg(long)]
    top: Option<usize>,
    #[arg(long)]
    tolerance: Option<f64>,
    #[arg(long, value_enum)]
    rank_by: Option<RankingKey>,
}

impl OptionArgs {
    fn resolve(self) -> anyhow::Result<ReportOptions> {
        let mut options =
            ReportOptions::from_env().context("invalid GRADEBOOK_* environment settings")?;

        if let Some(group_by) = self.group_by {
            options.group_by = group_by;
        }
        if let Some(top) = self.top {
            options.top_n = top;
        }
        if let Some(tolerance) = self.tolerance {
            options.tolerance = tolerance;
        }
        if let Some(rank_by) = self.rank_by {
            options.ranking = rank_by;
        }
        options = options.with_group_filter(self.filter);
        options.validate()?;
        Ok(options)
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init().context("failed to initialise logging")?;
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            input,
            options,
            out,
            json,
        } => {
            let options = options.resolve()?;
            let report = report::generate(&input.file, input.sheet.as_deref(), &options)?;

            let text = render::render_markdown(&report, chrono::Utc::now());
            std::fs::write(&out, text)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());

            if let Some(path) = json {
                render::export_json(&report, &path)
                    .with_context(|| format!("failed to export {}", path.display()))?;
                println!("Report exported to {}.", path.display());
            }
        }
        Commands::Check { input, options } => {
            let options = options.resolve()?;
            let report = report::generate(&input.file, input.sheet.as_deref(), &options)?;

            if report.discrepancies.is_empty() {
                println!(
                    "All {} non-empty row(s) have consistent totals.",
                    report.tally.data_rows - report.tally.empty_rows
                );
                return Ok(());
            }

            println!("Rows with inconsistent totals:");
            for found in &report.discrepancies {
                println!(
                    "- Row {} ({}): Computed Total = {:.2}, Expected Total = {:.2}",
                    found.row, found.identifier, found.computed_total, found.expected_total
                );
            }
            info!(count = report.discrepancies.len(), "discrepancies found");
            std::process::exit(1);
        }
        Commands::Columns { input, group_by } => {
            let rows = source::read_rows(&input.file, input.sheet.as_deref())
                .with_context(|| format!("failed to read {}", input.file.display()))?;
            let sheet = Sheet::from_rows(rows)?;
            let required = group_by.unwrap_or_default().required_columns();
            let index = ColumnIndex::resolve(sheet.headers(), &required);

            for label in &required {
                match index.position(label) {
                    Ok(position) => println!(
                        "- {} -> column {} ({})",
                        label,
                        position + 1,
                        sheet.headers()[position].trim()
                    ),
                    Err(err) => println!("- {}", err),
                }
            }
        }
    }

    Ok(())
}
