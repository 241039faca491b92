//! Common test utilities and imports for the pow-core crate
//! This module provides a centralized location for all commonly used test imports

#![cfg(test)]

// Chain index types
pub use crate::storage::{BlockId, BlockIndex, ChainArena, ChainIndex};

// Consensus types
pub use crate::consensus::params::{ConsensusParams, Network};

pub use primitive_types::U256;

// Test-specific utilities
pub mod prelude {
    pub use super::*;

    /// Build a single chain of `len` blocks with evenly spaced timestamps and
    /// a constant target
    pub fn linear_chain(len: usize, start_time: i64, spacing: i64, bits: u32) -> ChainArena {
        let mut chain = ChainArena::with_capacity(len);
        for i in 0..len {
            chain.push(start_time + i as i64 * spacing, bits);
        }
        chain
    }

    /// A detached block index node
    pub fn block(height: u32, time: i64, bits: u32) -> BlockIndex {
        BlockIndex::new(height, time, bits)
    }
}
