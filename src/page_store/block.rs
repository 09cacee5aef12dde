use crate::constants::BLOCK_SIZE;

/// A block buffer pinned in memory for the caller's exclusive use.
///
/// The buffer is owned by this value, so the borrow checker enforces the pin
/// discipline: the block can only be read or mutated while the caller holds
/// it, and handing it back to [`release`](super::FileHandle::release) moves it
/// out of reach. Mutation intent is explicit: `data_mut` gives access to the
/// bytes, `mark_dirty` schedules the write-back on release. A mutated block
/// that is never marked dirty is discarded unchanged.
#[derive(Debug)]
pub struct PinnedBlock {
    index: u32,
    data: Box<[u8]>,
    dirty: bool,
}

impl PinnedBlock {
    pub(crate) fn zeroed(index: u32) -> Self {
        Self {
            index,
            data: vec![0u8; BLOCK_SIZE].into_boxed_slice(),
            dirty: false,
        }
    }

    pub(crate) fn from_buf(index: u32, data: Box<[u8]>) -> Self {
        debug_assert_eq!(data.len(), BLOCK_SIZE);
        Self {
            index,
            data,
            dirty: false,
        }
    }

    /// Index of this block within its file.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Schedule this block's buffer to be written back on release.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }
}
