use crate::constants::BLOCK_SIZE;

/// Identifier byte stored at offset 0 of the metadata block.
pub const SORTED_FILE_IDENTIFIER: u8 = b'S';

pub const ID_SIZE: usize = 4;
pub const NAME_SIZE: usize = 15;
pub const SURNAME_SIZE: usize = 20;
pub const CITY_SIZE: usize = 20;

/// Fixed on-disk size of one record.
pub const RECORD_SIZE: usize = ID_SIZE + NAME_SIZE + SURNAME_SIZE + CITY_SIZE;

/// Data-block header: little-endian record count.
pub const BLOCK_HEADER_SIZE: usize = 4;

/// Records that fit in one data block.
pub const BLOCK_CAPACITY: usize = (BLOCK_SIZE - BLOCK_HEADER_SIZE) / RECORD_SIZE;

// A block must hold at least one record for run generation to make progress.
const _: () = assert!(BLOCK_CAPACITY >= 1);

/// Smallest buffer that leaves a fan-in of 2 for merging.
pub const MIN_BUFFER_BLOCKS: usize = 3;
pub const MAX_BUFFER_BLOCKS: usize = 128;
pub const DEFAULT_BUFFER_BLOCKS: usize = 8;

/// Suffix of the two ping-pong temporary files, next to the output path.
pub const TEMP_FILE_SUFFIX: &str = ".tmp";
