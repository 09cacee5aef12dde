pub mod block;
pub mod config;
pub mod constants;
pub mod error;
pub mod file;
pub mod merger;
pub mod record;
pub mod run;
pub mod sorter;


pub use config::SortConfig;
pub use error::{Result, SortFileError};
pub use file::SortedFile;
pub use record::{Record, SortField};
pub use sorter::Sorter;

/// Counters from one sort invocation.
#[derive(Debug, Clone, Default)]
pub struct SortStats {
    pub data_blocks: u32,
    pub records: usize,
    pub initial_runs: u32,
    pub merge_passes: u32,
    pub elapsed_ms: u64,
}
