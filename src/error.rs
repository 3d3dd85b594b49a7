//! Error types for the notechart library

use std::io;

/// Library error type for notechart operations
#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    /// A single arrangement's records do not hold together (bad index, missing table)
    #[error("malformed arrangement: {0}")]
    MalformedArrangement(String),

    /// A fret, string or chord id does not fit the narrowed output range
    #[error("value out of range: {0}")]
    ValueOutOfRange(String),

    /// Reader error when loading decoded records
    #[error("reader error: {0}")]
    ReaderError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for ChartError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
