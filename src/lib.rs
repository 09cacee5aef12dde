// Paged block-file layer consumed by the sort engine
pub mod page_store;

// Sorted-file layer: record codec, run generation, k-way merge, orchestration
pub mod sorted_file;

// Crate-wide layout constants
pub mod constants;

pub mod utils;

// Re-export main types for convenience
pub use page_store::{FileHandle, PageStore, PinnedBlock, StoreError};
pub use sorted_file::{Record, SortConfig, SortField, SortFileError, SortStats, SortedFile, Sorter};
