//! One k-way merge group: up to `fan_in` sorted runs from the source file
//! merged into a single run appended to the destination. Resident bound:
//! one input block per live cursor plus one output block.

use std::cmp::Ordering;

use crate::page_store::{FileHandle, PinnedBlock};
use crate::sorted_file::block::{DataBlock, DataBlockMut};
use crate::sorted_file::constants::BLOCK_CAPACITY;
use crate::sorted_file::error::Result;
use crate::sorted_file::record::{Record, SortField};

/// Cursor over one run during a merge pass: the pinned current block, the
/// slot within it, and the run's exclusive end block index. Exhausted once
/// the run's last record has been emitted, after which its block is released
/// and `current` stays `None`.
struct MergeCursor {
    block: Option<PinnedBlock>,
    slot: usize,
    next_block: u32,
    end: u32,
    current: Option<Record>,
}

impl MergeCursor {
    /// Open a cursor on the run spanning `[start, end)`. A start past
    /// end-of-file yields an already-exhausted cursor; this is the last,
    /// possibly partial, group of runs.
    fn open(src: &mut FileHandle, start: u32, end: u32) -> Result<Self> {
        let end = end.min(src.block_count());
        if start >= end {
            return Ok(Self {
                block: None,
                slot: 0,
                next_block: start,
                end,
                current: None,
            });
        }
        let block = src.get_block(start)?;
        let current = first_record(&block);
        let mut cursor = Self {
            block: Some(block),
            slot: 0,
            next_block: start + 1,
            end,
            current,
        };
        if cursor.current.is_none() {
            // Empty data block; runs never contain one mid-span.
            cursor.exhaust(src)?;
        }
        Ok(cursor)
    }

    fn current(&self) -> Option<&Record> {
        self.current.as_ref()
    }

    /// Step past the record just emitted, crossing into the run's next block
    /// when the current one is consumed.
    fn advance(&mut self, src: &mut FileHandle) -> Result<()> {
        let Some(block) = &self.block else {
            return Ok(());
        };
        let view = DataBlock::new(block);
        if self.slot + 1 < view.record_count() {
            self.slot += 1;
            self.current = Some(view.record(self.slot));
            return Ok(());
        }
        if self.next_block < self.end {
            if let Some(done) = self.block.take() {
                src.release(done)?;
            }
            let block = src.get_block(self.next_block)?;
            self.next_block += 1;
            self.slot = 0;
            self.current = first_record(&block);
            self.block = Some(block);
            if self.current.is_none() {
                self.exhaust(src)?;
            }
            return Ok(());
        }
        self.exhaust(src)
    }

    fn exhaust(&mut self, src: &mut FileHandle) -> Result<()> {
        self.current = None;
        if let Some(block) = self.block.take() {
            src.release(block)?;
        }
        Ok(())
    }
}

fn first_record(block: &PinnedBlock) -> Option<Record> {
    let view = DataBlock::new(block);
    if view.record_count() == 0 {
        None
    } else {
        Some(view.record(0))
    }
}

/// Merges groups of sorted runs, one group per call.
pub struct RunMerger {
    field: SortField,
}

impl RunMerger {
    pub fn new(field: SortField) -> Self {
        Self { field }
    }

    /// Merge the group of `fan_in` runs of `run_length` blocks starting at
    /// source block `group_start` into one run appended to `dst`. Runs whose
    /// start lies past end-of-file contribute nothing.
    pub fn merge_group(
        &self,
        src: &mut FileHandle,
        dst: &mut FileHandle,
        group_start: u32,
        run_length: u32,
        fan_in: usize,
    ) -> Result<()> {
        let mut cursors = Vec::with_capacity(fan_in);
        for k in 0..fan_in as u32 {
            let start = group_start + k * run_length;
            cursors.push(MergeCursor::open(src, start, start + run_length)?);
        }

        // Output block is allocated lazily so an all-exhausted group leaves
        // no empty block behind.
        let mut out: Option<PinnedBlock> = None;

        loop {
            // Minimum among live cursors; strict less-than keeps the
            // first-seen cursor on ties, a deterministic but unspecified
            // order among equal keys.
            let mut winner: Option<(usize, Record)> = None;
            for (index, cursor) in cursors.iter().enumerate() {
                if let Some(record) = cursor.current() {
                    let beats = match &winner {
                        None => true,
                        Some((_, best)) => self.field.compare(record, best) == Ordering::Less,
                    };
                    if beats {
                        winner = Some((index, record.clone()));
                    }
                }
            }
            let Some((index, record)) = winner else {
                break;
            };

            let mut block = match out.take() {
                Some(block) => block,
                None => dst.allocate_block()?,
            };
            if DataBlock::new(&block).record_count() == BLOCK_CAPACITY {
                block.mark_dirty();
                dst.release(block)?;
                block = dst.allocate_block()?;
            }
            DataBlockMut::new(&mut block).push(&record);
            out = Some(block);

            cursors[index].advance(src)?;
        }

        if let Some(mut block) = out.take() {
            block.mark_dirty();
            dst.release(block)?;
        }
        Ok(())
    }
}
