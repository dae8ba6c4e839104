use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to read dataset '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read CSV headers: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dataset is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Malformed row at line {line}: {source}")]
    Parse { line: u64, source: csv::Error },
}
