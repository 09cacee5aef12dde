use std::path::PathBuf;
use thiserror::Error;

/// Result type for page-store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while operating on a block file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying filesystem failure
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Refused to create a block file over an existing one
    #[error("file already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// Requested block index past the end of the file
    #[error("block {index} out of range (file has {block_count} blocks)")]
    BlockOutOfRange { index: u32, block_count: u32 },

    /// File length is not a whole number of blocks
    #[error("file {path} is not block-aligned (length {len})")]
    NotBlockAligned { path: PathBuf, len: u64 },

    /// Closed (or dropped for closing) while blocks were still pinned
    #[error("{pinned} block(s) still pinned on close")]
    PinsOutstanding { pinned: u32 },
}
