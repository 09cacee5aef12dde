//! Block-addressed file storage with explicit pin/release of block buffers.
//!
//! All I/O to secondary storage goes through [`PageStore`] and [`FileHandle`].
//! A fetched or freshly allocated block is pinned: the caller owns its buffer
//! as a [`PinnedBlock`] until it hands it back via [`FileHandle::release`],
//! which writes the buffer out iff it was marked dirty. Because `release`
//! consumes the `PinnedBlock`, a released block cannot be touched again.

pub mod block;
pub mod error;
pub mod store;

pub use block::PinnedBlock;
pub use error::{StoreError, StoreResult};
pub use store::{FileHandle, PageStore};
