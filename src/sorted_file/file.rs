use std::io::Write;
use std::path::Path;

use crate::page_store::{FileHandle, PageStore};
use crate::sorted_file::block::{DataBlock, DataBlockMut};
use crate::sorted_file::constants::{BLOCK_CAPACITY, SORTED_FILE_IDENTIFIER};
use crate::sorted_file::error::{Result, SortFileError};
use crate::sorted_file::record::Record;

/// An open, validated sorted file.
///
/// Block 0 is the metadata block carrying the identifier byte; data blocks
/// follow from index 1. A file whose identifier does not validate is never
/// treated as a sorted file: [`SortedFile::open`] closes it and fails with
/// `NotSortedFile`.
pub struct SortedFile<'s> {
    store: &'s PageStore,
    handle: FileHandle,
}

impl<'s> SortedFile<'s> {
    /// Create a new, empty sorted file: one metadata block stamped with the
    /// identifier byte.
    pub fn create(store: &PageStore, path: &Path) -> Result<()> {
        store.create(path)?;
        let mut handle = store.open(path)?;
        let mut meta = handle.allocate_block()?;
        meta.data_mut()[0] = SORTED_FILE_IDENTIFIER;
        meta.mark_dirty();
        handle.release(meta)?;
        store.close(handle)?;
        Ok(())
    }

    /// Open an existing file and validate its identifier byte.
    pub fn open(store: &'s PageStore, path: &Path) -> Result<Self> {
        let mut handle = store.open(path)?;
        if handle.block_count() == 0 {
            store.close(handle)?;
            return Err(SortFileError::NotSortedFile {
                path: path.to_path_buf(),
            });
        }
        let meta = handle.get_block(0)?;
        let identifier = meta.data()[0];
        handle.release(meta)?;
        if identifier != SORTED_FILE_IDENTIFIER {
            store.close(handle)?;
            return Err(SortFileError::NotSortedFile {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { store, handle })
    }

    pub fn close(self) -> Result<()> {
        self.store.close(self.handle)?;
        Ok(())
    }

    pub fn handle(&self) -> &FileHandle {
        &self.handle
    }

    /// The engine drives run generation and merging directly on the handle.
    pub fn handle_mut(&mut self) -> &mut FileHandle {
        &mut self.handle
    }

    /// Number of data blocks (excludes the metadata block).
    pub fn data_blocks(&self) -> u32 {
        self.handle.block_count().saturating_sub(1)
    }

    /// Append a record: into the last data block if it has room, otherwise
    /// into a freshly allocated block.
    pub fn insert(&mut self, record: &Record) -> Result<()> {
        let block_count = self.handle.block_count();
        if block_count > 1 {
            let mut last = self.handle.get_block(block_count - 1)?;
            let mut view = DataBlockMut::new(&mut last);
            if view.record_count() < BLOCK_CAPACITY {
                view.push(record);
                last.mark_dirty();
                self.handle.release(last)?;
                return Ok(());
            }
            self.handle.release(last)?;
        }
        let mut fresh = self.handle.allocate_block()?;
        DataBlockMut::new(&mut fresh).push(record);
        fresh.mark_dirty();
        self.handle.release(fresh)?;
        Ok(())
    }

    /// Visit every record in storage order. One block pinned at a time.
    pub fn scan<F: FnMut(&Record)>(&mut self, mut visit: F) -> Result<()> {
        for index in 1..self.handle.block_count() {
            let block = self.handle.get_block(index)?;
            let view = DataBlock::new(&block);
            for slot in 0..view.record_count() {
                visit(&view.record(slot));
            }
            self.handle.release(block)?;
        }
        Ok(())
    }

    /// Render all records as a fixed-width table, for diagnostics.
    pub fn print<W: Write>(&mut self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{:<10} {:<15} {:<20} {:<20}",
            "id", "name", "surname", "city"
        )?;
        writeln!(out, "{}", "-".repeat(68))?;
        let mut io_err = None;
        self.scan(|record| {
            if io_err.is_none() {
                if let Err(e) = writeln!(out, "{}", record) {
                    io_err = Some(e);
                }
            }
        })?;
        match io_err {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}
