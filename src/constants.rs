/// Size in bytes of one block on secondary storage. Every file managed by the
/// page store is a whole number of blocks.
pub const BLOCK_SIZE: usize = 512;
