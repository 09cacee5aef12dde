use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use crate::constants::BLOCK_SIZE;

use super::block::PinnedBlock;
use super::error::{StoreError, StoreResult};

/// Entry point to block-file storage: create, open, close and delete files
/// whose contents are addressed in whole blocks.
///
/// The store itself is stateless; all per-file state (block count, pin
/// accounting) lives in the [`FileHandle`] it hands out, so nothing persists
/// across sort invocations.
#[derive(Debug, Default)]
pub struct PageStore;

impl PageStore {
    pub fn new() -> Self {
        Self
    }

    /// Create an empty block file. Fails if the file already exists.
    pub fn create(&self, path: &Path) -> StoreResult<()> {
        match OpenOptions::new().write(true).create_new(true).open(path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StoreError::AlreadyExists {
                path: path.to_path_buf(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Open an existing block file for reading and writing.
    pub fn open(&self, path: &Path) -> StoreResult<FileHandle> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        let len = file.metadata()?.len();
        if len % BLOCK_SIZE as u64 != 0 {
            return Err(StoreError::NotBlockAligned {
                path: path.to_path_buf(),
                len,
            });
        }
        Ok(FileHandle {
            file,
            path: path.to_path_buf(),
            block_count: (len / BLOCK_SIZE as u64) as u32,
            pinned: 0,
            peak_pinned: 0,
        })
    }

    /// Close a handle, refusing if any blocks are still pinned.
    pub fn close(&self, handle: FileHandle) -> StoreResult<()> {
        if handle.pinned > 0 {
            return Err(StoreError::PinsOutstanding {
                pinned: handle.pinned,
            });
        }
        handle.file.sync_all()?;
        Ok(())
    }

    pub fn delete(&self, path: &Path) -> StoreResult<()> {
        std::fs::remove_file(path)?;
        Ok(())
    }
}

/// An open block file. Blocks are fetched and allocated pinned, and must be
/// handed back through [`release`](FileHandle::release) before the handle can
/// be closed.
#[derive(Debug)]
pub struct FileHandle {
    file: File,
    path: PathBuf,
    block_count: u32,
    pinned: u32,
    peak_pinned: u32,
}

impl FileHandle {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of blocks currently in the file, including block 0.
    pub fn block_count(&self) -> u32 {
        self.block_count
    }

    /// Number of blocks currently pinned through this handle.
    pub fn pinned(&self) -> u32 {
        self.pinned
    }

    /// High-water mark of simultaneously pinned blocks over this handle's
    /// lifetime. Lets callers check that an operation stayed within its
    /// block budget.
    pub fn peak_pinned(&self) -> u32 {
        self.peak_pinned
    }

    /// Append a zeroed block to the file and return it pinned.
    pub fn allocate_block(&mut self) -> StoreResult<PinnedBlock> {
        let index = self.block_count;
        let zeroes = [0u8; BLOCK_SIZE];
        self.file.write_all_at(&zeroes, Self::offset(index))?;
        self.block_count += 1;
        self.pin();
        Ok(PinnedBlock::zeroed(index))
    }

    /// Fetch an existing block into memory and return it pinned.
    pub fn get_block(&mut self, index: u32) -> StoreResult<PinnedBlock> {
        if index >= self.block_count {
            return Err(StoreError::BlockOutOfRange {
                index,
                block_count: self.block_count,
            });
        }
        let mut buf = vec![0u8; BLOCK_SIZE].into_boxed_slice();
        self.file.read_exact_at(&mut buf, Self::offset(index))?;
        self.pin();
        Ok(PinnedBlock::from_buf(index, buf))
    }

    /// Unpin a block, writing its buffer back iff it was marked dirty.
    pub fn release(&mut self, block: PinnedBlock) -> StoreResult<()> {
        if block.is_dirty() {
            self.file
                .write_all_at(block.data(), Self::offset(block.index()))?;
        }
        self.pinned = self.pinned.saturating_sub(1);
        Ok(())
    }

    fn pin(&mut self) {
        self.pinned += 1;
        self.peak_pinned = self.peak_pinned.max(self.pinned);
    }

    fn offset(index: u32) -> u64 {
        index as u64 * BLOCK_SIZE as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_create_refuses_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.blk");
        let store = PageStore::new();
        store.create(&path).unwrap();
        assert!(matches!(
            store.create(&path),
            Err(StoreError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_allocate_and_get_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("b.blk");
        let store = PageStore::new();
        store.create(&path).unwrap();

        let mut handle = store.open(&path).unwrap();
        assert_eq!(handle.block_count(), 0);

        let mut block = handle.allocate_block().unwrap();
        block.data_mut()[0] = 0xAB;
        block.data_mut()[BLOCK_SIZE - 1] = 0xCD;
        block.mark_dirty();
        handle.release(block).unwrap();
        assert_eq!(handle.block_count(), 1);
        store.close(handle).unwrap();

        let mut handle = store.open(&path).unwrap();
        assert_eq!(handle.block_count(), 1);
        let block = handle.get_block(0).unwrap();
        assert_eq!(block.data()[0], 0xAB);
        assert_eq!(block.data()[BLOCK_SIZE - 1], 0xCD);
        handle.release(block).unwrap();
        // One block at a time was pinned through this handle.
        assert_eq!(handle.peak_pinned(), 1);
        store.close(handle).unwrap();
    }

    #[test]
    fn test_clean_release_discards_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("c.blk");
        let store = PageStore::new();
        store.create(&path).unwrap();

        let mut handle = store.open(&path).unwrap();
        let block = handle.allocate_block().unwrap();
        handle.release(block).unwrap();

        // Mutate without marking dirty: changes must not reach disk.
        let mut block = handle.get_block(0).unwrap();
        block.data_mut()[7] = 0xFF;
        handle.release(block).unwrap();

        let block = handle.get_block(0).unwrap();
        assert_eq!(block.data()[7], 0);
        handle.release(block).unwrap();
        store.close(handle).unwrap();
    }

    #[test]
    fn test_get_block_out_of_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("d.blk");
        let store = PageStore::new();
        store.create(&path).unwrap();

        let mut handle = store.open(&path).unwrap();
        assert!(matches!(
            handle.get_block(3),
            Err(StoreError::BlockOutOfRange {
                index: 3,
                block_count: 0
            })
        ));
        store.close(handle).unwrap();
    }

    #[test]
    fn test_close_with_outstanding_pin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("e.blk");
        let store = PageStore::new();
        store.create(&path).unwrap();

        let mut handle = store.open(&path).unwrap();
        let _block = handle.allocate_block().unwrap();
        assert_eq!(handle.pinned(), 1);
        assert!(matches!(
            store.close(handle),
            Err(StoreError::PinsOutstanding { pinned: 1 })
        ));
    }

    #[test]
    fn test_open_rejects_unaligned_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f.blk");
        std::fs::write(&path, vec![0u8; BLOCK_SIZE + 17]).unwrap();

        let store = PageStore::new();
        assert!(matches!(
            store.open(&path),
            Err(StoreError::NotBlockAligned { .. })
        ));
    }
}
