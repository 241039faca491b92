//! Proof-of-work header check

use crate::consensus::params::ConsensusParams;
use crate::error::ProofOfWorkError;
use crate::types::target::{decode_compact, hash_to_u256};
use tracing::debug;

/// Check that `hash` satisfies the compact target `bits` and that the target
/// itself is admissible under `params`
///
/// `hash` is in internal (little-endian) byte order.
pub fn verify_proof_of_work(
    hash: &[u8; 32],
    bits: u32,
    params: &ConsensusParams,
) -> Result<(), ProofOfWorkError> {
    let decoded = decode_compact(bits);

    if !decoded.is_usable() || decoded.target > params.pow_limit {
        return Err(ProofOfWorkError::BelowMinimumWork { bits });
    }

    if hash_to_u256(hash) > decoded.target {
        return Err(ProofOfWorkError::HashAboveTarget {
            hash: display_hash(hash),
            bits,
        });
    }

    Ok(())
}

/// Boolean form of [`verify_proof_of_work`]; the rejection reason is emitted
/// as a debug event
pub fn check_proof_of_work(hash: &[u8; 32], bits: u32, params: &ConsensusParams) -> bool {
    match verify_proof_of_work(hash, bits, params) {
        Ok(()) => true,
        Err(e) => {
            debug!(reason = %e, "CheckProofOfWork failed");
            false
        }
    }
}

/// Hashes are shown most-significant byte first
fn display_hash(hash: &[u8; 32]) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    hex::encode(reversed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_hash_meets_genesis_target() {
        let params = ConsensusParams::mainnet();
        assert!(check_proof_of_work(&[0u8; 32], 0x1d00ffff, &params));
    }

    #[test]
    fn test_display_hash_is_big_endian() {
        let mut hash = [0u8; 32];
        hash[0] = 0xab;
        let shown = display_hash(&hash);
        assert!(shown.ends_with("ab"));
        assert!(shown.starts_with("00"));
        assert_eq!(shown.len(), 64);
    }
}
