use std::path::PathBuf;
use thiserror::Error;

use crate::page_store::StoreError;

/// Result type for sorted-file operations.
pub type Result<T> = std::result::Result<T, SortFileError>;

/// Errors surfaced by the sorted-file layer.
///
/// Storage failures are fatal to the current call; nothing is retried and no
/// partial-success values are returned. After any error the output file is
/// not guaranteed to exist or be complete, and temporary files from an
/// aborted sort are not guaranteed cleaned up.
#[derive(Error, Debug)]
pub enum SortFileError {
    /// A page-store operation failed
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Plain i/o outside the page store (temp-file bookkeeping, printing)
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The metadata block does not carry the sorted-file identifier
    #[error("not a sorted file: {path}")]
    NotSortedFile { path: PathBuf },

    /// Buffer size or field index outside the supported range
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Record text field longer than its fixed on-disk width
    #[error("record field '{field}' exceeds {max} bytes")]
    FieldTooWide { field: &'static str, max: usize },
}
