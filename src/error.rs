use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Workbook(#[from] calamine::Error),
    #[error("workbook contains no sheets")]
    NoSheets,
    #[error("sheet '{0}' not found in workbook")]
    SheetNotFound(String),
    #[error("unsupported file type '{0}'")]
    UnsupportedFormat(String),
}

/// Conditions that abort report generation; nothing partial is returned.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("unable to read gradebook rows from {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: SourceError,
    },
    #[error("gradebook has no data rows below the header (found {rows} row(s))")]
    InsufficientData { rows: usize },
}
