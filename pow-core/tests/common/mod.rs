//! Shared fixtures for the integration tests

#![allow(dead_code)]

use pow_core::{ChainArena, ConsensusParams};

/// A chain of `len` blocks with evenly spaced timestamps and a constant target
pub fn linear_chain(len: usize, start_time: i64, spacing: i64, bits: u32) -> ChainArena {
    let mut chain = ChainArena::with_capacity(len);
    for i in 0..len {
        chain.push(start_time + i as i64 * spacing, bits);
    }
    chain
}

/// A chain of `len` blocks whose first and last timestamps are exactly
/// `first_time` and `last_time`, interpolated in between
pub fn chain_between(len: usize, first_time: i64, last_time: i64, bits: u32) -> ChainArena {
    assert!(len >= 2);
    let span = last_time - first_time;
    let steps = (len - 1) as i64;
    let mut chain = ChainArena::with_capacity(len);
    for i in 0..len as i64 {
        chain.push(first_time + span * i / steps, bits);
    }
    chain
}

/// Mainnet rules with the fork moved down to `height`
pub fn mainnet_with_fork_at(height: u32) -> ConsensusParams {
    ConsensusParams {
        fork_activation_height: height,
        ..ConsensusParams::mainnet()
    }
}
