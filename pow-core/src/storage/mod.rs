/// Storage subsystem for the retarget core
///
/// Holds the block-index view the retarget engine reads: immutable nodes
/// linked to their ancestor by id, plus an in-memory arena implementation.
pub mod chain_index;

// Re-export key types
pub use chain_index::{BlockId, BlockIndex, ChainArena, ChainIndex};
