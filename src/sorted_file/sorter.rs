//! Sort orchestration: Phase 0 run generation, then repeated merge passes
//! over two ping-pong temporary files until one run spans the file, then a
//! rename into place. Run length multiplies by the fan-in every pass, so the
//! pass count is logarithmic in the number of data blocks.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::page_store::PageStore;
use crate::sorted_file::config::SortConfig;
use crate::sorted_file::constants::TEMP_FILE_SUFFIX;
use crate::sorted_file::error::Result;
use crate::sorted_file::file::SortedFile;
use crate::sorted_file::merger::RunMerger;
use crate::sorted_file::record::SortField;
use crate::sorted_file::run::RunGenerator;
use crate::sorted_file::SortStats;

pub struct Sorter<'s> {
    store: &'s PageStore,
    config: SortConfig,
    field: SortField,
}

impl<'s> Sorter<'s> {
    /// Rejects undersized or oversized buffer configurations before any I/O.
    pub fn new(store: &'s PageStore, config: SortConfig, field: SortField) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            field,
        })
    }

    /// Sort `input` by the configured field into a new sorted file at
    /// `output`. The input file is left untouched. On error the output is
    /// not guaranteed to exist and temporary files may be left behind.
    pub fn sort(&self, input: &Path, output: &Path) -> Result<SortStats> {
        let started = Instant::now();
        let buffer_size = self.config.buffer_size;
        let fan_in = self.config.fan_in();

        let mut current = temp_path(output, 0);
        let mut spare = temp_path(output, 1);
        remove_stale(&current)?;
        remove_stale(&spare)?;

        // Phase 0: equal-sized sorted runs of buffer_size blocks.
        let mut src = SortedFile::open(self.store, input)?;
        let data_blocks = src.data_blocks();
        SortedFile::create(self.store, &current)?;
        let mut dst = SortedFile::open(self.store, &current)?;
        let generator = RunGenerator::new(buffer_size, self.field);
        let (initial_runs, records) = generator.generate(src.handle_mut(), dst.handle_mut())?;
        src.close()?;
        dst.close()?;
        debug!(
            data_blocks,
            initial_runs, records, "run generation complete"
        );

        // Merge passes: fan_in runs per group, run length multiplying by
        // fan_in, files swapping roles until the file is one run.
        let merger = RunMerger::new(self.field);
        let mut run_length = buffer_size as u32;
        let mut merge_passes = 0u32;
        while run_length < data_blocks {
            let mut src = SortedFile::open(self.store, &current)?;
            SortedFile::create(self.store, &spare)?;
            let mut dst = SortedFile::open(self.store, &spare)?;

            let group_step = run_length * fan_in as u32;
            let mut group_start = 1u32;
            while group_start < src.handle().block_count() {
                merger.merge_group(
                    src.handle_mut(),
                    dst.handle_mut(),
                    group_start,
                    run_length,
                    fan_in,
                )?;
                group_start += group_step;
            }

            src.close()?;
            dst.close()?;
            self.store.delete(&current)?;
            std::mem::swap(&mut current, &mut spare);
            run_length *= fan_in as u32;
            merge_passes += 1;
            debug!(merge_passes, run_length, "merge pass complete");
        }

        // Done: the surviving temporary becomes the output.
        std::fs::rename(&current, output)?;

        Ok(SortStats {
            data_blocks,
            records,
            initial_runs,
            merge_passes,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }
}

fn temp_path(output: &Path, n: u32) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(format!("{}{}", TEMP_FILE_SUFFIX, n));
    PathBuf::from(name)
}

fn remove_stale(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}
