//! Typed views over a data block: a 4-byte little-endian record count header
//! followed by up to `BLOCK_CAPACITY` records, contiguous in slots
//! `[0, count)`. Block 0 of a file is the metadata block and never goes
//! through these views.

use crate::page_store::PinnedBlock;
use crate::sorted_file::constants::{BLOCK_CAPACITY, BLOCK_HEADER_SIZE, RECORD_SIZE};
use crate::sorted_file::record::Record;

/// Byte offset of record slot `i` within a data block.
pub fn slot_offset(slot: usize) -> usize {
    BLOCK_HEADER_SIZE + slot * RECORD_SIZE
}

/// Read-only view of a data block.
pub struct DataBlock<'a> {
    data: &'a [u8],
}

impl<'a> DataBlock<'a> {
    pub fn new(block: &'a PinnedBlock) -> Self {
        Self { data: block.data() }
    }

    pub fn record_count(&self) -> usize {
        u32::from_le_bytes([self.data[0], self.data[1], self.data[2], self.data[3]]) as usize
    }

    /// Decode the record in slot `slot`. Panics on a slot past the record
    /// count, which is always a caller bug.
    pub fn record(&self, slot: usize) -> Record {
        assert!(slot < self.record_count(), "slot {} past record count", slot);
        let at = slot_offset(slot);
        Record::read_from(&self.data[at..at + RECORD_SIZE])
    }
}

/// Mutable view of a data block. The caller still decides whether the
/// mutation reaches disk by marking the underlying block dirty.
pub struct DataBlockMut<'a> {
    data: &'a mut [u8],
}

impl<'a> DataBlockMut<'a> {
    pub fn new(block: &'a mut PinnedBlock) -> Self {
        Self {
            data: block.data_mut(),
        }
    }

    pub fn record_count(&self) -> usize {
        u32::from_le_bytes([self.data[0], self.data[1], self.data[2], self.data[3]]) as usize
    }

    pub fn set_record_count(&mut self, count: usize) {
        assert!(count <= BLOCK_CAPACITY);
        self.data[..BLOCK_HEADER_SIZE].copy_from_slice(&(count as u32).to_le_bytes());
    }

    /// Overwrite the record in an occupied slot.
    pub fn put(&mut self, slot: usize, record: &Record) {
        assert!(slot < self.record_count(), "slot {} past record count", slot);
        let at = slot_offset(slot);
        record.write_to(&mut self.data[at..at + RECORD_SIZE]);
    }

    /// Append a record to the next free slot and bump the count.
    /// Returns the new record count. Panics on a full block.
    pub fn push(&mut self, record: &Record) -> usize {
        let count = self.record_count();
        assert!(count < BLOCK_CAPACITY, "push into a full block");
        let at = slot_offset(count);
        record.write_to(&mut self.data[at..at + RECORD_SIZE]);
        self.set_record_count(count + 1);
        count + 1
    }
}
