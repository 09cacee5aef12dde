use serde::{Deserialize, Serialize};

use crate::sorted_file::constants::*;
use crate::sorted_file::error::{Result, SortFileError};

/// Tunables for one sort invocation.
///
/// `buffer_size` is the number of blocks that may be memory-resident at once:
/// the Phase 0 window size, and `buffer_size - 1` merge fan-in plus one
/// output block during a merge pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    pub buffer_size: usize,
    pub verbose: bool,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_BLOCKS,
            verbose: false,
        }
    }
}

impl SortConfig {
    pub fn from_file(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_size < MIN_BUFFER_BLOCKS || self.buffer_size > MAX_BUFFER_BLOCKS {
            return Err(SortFileError::InvalidConfiguration {
                reason: format!(
                    "buffer size must be between {} and {} blocks, got {}",
                    MIN_BUFFER_BLOCKS, MAX_BUFFER_BLOCKS, self.buffer_size
                ),
            });
        }
        Ok(())
    }

    /// Merge fan-in: runs consumed per merge group, leaving one buffer for
    /// the output block.
    pub fn fan_in(&self) -> usize {
        self.buffer_size - 1
    }
}
