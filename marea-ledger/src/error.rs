use thiserror::Error;

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Error type surfaced by ledger operations.
///
/// A missing table file is never an error (it reads back as the empty
/// table); `Corrupt` covers an existing table that cannot be decoded.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("malformed table: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Validation(#[from] marea_core::ValidationError),
}

impl From<std::io::Error> for LedgerError {
    fn from(value: std::io::Error) -> Self {
        Self::Storage(value.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(value: csv::Error) -> Self {
        match value.kind() {
            csv::ErrorKind::Io(_) => Self::Storage(value.to_string()),
            _ => Self::Corrupt(value.to_string()),
        }
    }
}
