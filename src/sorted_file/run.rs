//! Phase 0: turn the input into equal-sized sorted runs.
//!
//! The generator pins a window of up to `buffer_size` consecutive data
//! blocks, sorts the records they hold as one logical array, and writes every
//! window block verbatim (same per-block record count) to freshly allocated
//! blocks of the destination. Resident bound: the window plus one destination
//! block.

use crate::page_store::{FileHandle, PinnedBlock};
use crate::sorted_file::block::{DataBlock, DataBlockMut};
use crate::sorted_file::error::Result;
use crate::sorted_file::record::{Record, SortField};

/// A pinned window of consecutive data blocks addressed as one logical record
/// array. `locate` maps a logical index to a (block, slot) pair against each
/// block's own record count, bounds-checked.
pub struct BlockWindow {
    blocks: Vec<PinnedBlock>,
    counts: Vec<usize>,
    total: usize,
}

impl BlockWindow {
    pub fn new(blocks: Vec<PinnedBlock>) -> Self {
        let counts: Vec<usize> = blocks
            .iter()
            .map(|b| DataBlock::new(b).record_count())
            .collect();
        let total = counts.iter().sum();
        Self {
            blocks,
            counts,
            total,
        }
    }

    /// Records in the window.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    fn locate(&self, mut index: usize) -> (usize, usize) {
        assert!(index < self.total, "logical index {} out of bounds", index);
        for (block, &count) in self.counts.iter().enumerate() {
            if index < count {
                return (block, index);
            }
            index -= count;
        }
        unreachable!("index within total but past all blocks");
    }

    pub fn get(&self, index: usize) -> Record {
        let (block, slot) = self.locate(index);
        DataBlock::new(&self.blocks[block]).record(slot)
    }

    pub fn set(&mut self, index: usize, record: &Record) {
        let (block, slot) = self.locate(index);
        DataBlockMut::new(&mut self.blocks[block]).put(slot, record);
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let ra = self.get(a);
        let rb = self.get(b);
        self.set(a, &rb);
        self.set(b, &ra);
    }

    /// In-place quicksort over the logical array. Partition-based with a
    /// middle-element pivot; worst case O(n²) on adversarial key
    /// distributions is an accepted weakness of this engine.
    pub fn sort(&mut self, field: SortField) {
        if self.total > 1 {
            self.quicksort(field, 0, self.total - 1);
        }
    }

    fn quicksort(&mut self, field: SortField, lo: usize, hi: usize) {
        if lo >= hi {
            return;
        }
        let mid = self.partition(field, lo, hi);
        self.quicksort(field, lo, mid);
        self.quicksort(field, mid + 1, hi);
    }

    // Hoare partition over [lo, hi], both inclusive.
    fn partition(&mut self, field: SortField, lo: usize, hi: usize) -> usize {
        use std::cmp::Ordering;

        let pivot = self.get(lo + (hi - lo) / 2);
        let mut i = lo;
        let mut j = hi;
        loop {
            while field.compare(&self.get(i), &pivot) == Ordering::Less {
                i += 1;
            }
            while field.compare(&self.get(j), &pivot) == Ordering::Greater {
                j -= 1;
            }
            if i >= j {
                return j;
            }
            self.swap(i, j);
            i += 1;
            j -= 1;
        }
    }

    pub fn into_blocks(self) -> Vec<PinnedBlock> {
        self.blocks
    }
}

/// Phase 0 run generator.
pub struct RunGenerator {
    buffer_size: usize,
    field: SortField,
}

impl RunGenerator {
    pub fn new(buffer_size: usize, field: SortField) -> Self {
        Self { buffer_size, field }
    }

    /// Consume every data block of `src` window by window, appending sorted
    /// runs of `buffer_size` blocks (the last possibly shorter) to `dst`.
    /// Returns the number of runs written and the total record count.
    pub fn generate(&self, src: &mut FileHandle, dst: &mut FileHandle) -> Result<(u32, usize)> {
        let total = src.block_count();
        let mut runs = 0u32;
        let mut records = 0usize;
        let mut next = 1u32; // block 0 is metadata

        while next < total {
            let end = total.min(next + self.buffer_size as u32);
            let mut blocks = Vec::with_capacity((end - next) as usize);
            for index in next..end {
                blocks.push(src.get_block(index)?);
            }

            let mut window = BlockWindow::new(blocks);
            records += window.len();
            window.sort(self.field);

            // Window blocks are never marked dirty: the sorted bytes go to
            // the destination and the source pins are released unchanged.
            for block in window.into_blocks() {
                let mut out = dst.allocate_block()?;
                out.data_mut().copy_from_slice(block.data());
                out.mark_dirty();
                dst.release(out)?;
                src.release(block)?;
            }

            runs += 1;
            next = end;
        }

        Ok((runs, records))
    }
}
