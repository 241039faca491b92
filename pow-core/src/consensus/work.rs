//! Chain work accounting
//!
//! Work is the expected number of hashes needed to meet a target. Chains are
//! compared by the sum of their blocks' work, never by height.

use crate::consensus::params::ConsensusParams;
use crate::storage::BlockIndex;
use crate::types::target::decode_compact;
use primitive_types::U256;
use tracing::warn;

/// Work contributed by one block with compact target `bits`
///
/// Malformed or zero targets contribute nothing. Otherwise this is
/// `2^256 / (target + 1)`, computed as `~target / (target + 1) + 1` because
/// `2^256` itself does not fit.
pub fn block_proof(bits: u32) -> U256 {
    let decoded = decode_compact(bits);
    if !decoded.is_usable() {
        return U256::zero();
    }

    let target = decoded.target;
    (!target / (target + U256::one())) + U256::one()
}

/// Seconds of block production that the work difference between `to` and
/// `from` represents at `tip`'s difficulty
///
/// Positive when `to` has more work. Saturates at `i64::MAX` in magnitude.
pub fn block_proof_equivalent_time(
    to: &BlockIndex,
    from: &BlockIndex,
    tip: &BlockIndex,
    params: &ConsensusParams,
) -> i64 {
    let (delta, sign) = if to.chain_work > from.chain_work {
        (to.chain_work - from.chain_work, 1i64)
    } else {
        (from.chain_work - to.chain_work, -1i64)
    };

    let tip_proof = tip.block_proof();
    if tip_proof.is_zero() {
        warn!(
            bits = %format!("{:08x}", tip.bits),
            "tip carries no work, equivalent time saturates"
        );
        return sign * i64::MAX;
    }

    let spacing = U256::from(params.pow_target_spacing.max(0) as u64);
    let (scaled, overflow) = delta.overflowing_mul(spacing);
    if overflow {
        return sign * i64::MAX;
    }

    let seconds = scaled / tip_proof;
    if seconds.bits() > 63 {
        return sign * i64::MAX;
    }
    sign * seconds.low_u64() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_common::prelude::*;

    #[test]
    fn test_block_proof_known_values() {
        // target 0x7fffff << 232 is just under 2^255
        assert_eq!(block_proof(0x207fffff), U256::from(2u64));
        // genesis difficulty is ~2^32 hashes
        assert_eq!(block_proof(0x1d00ffff), U256::from(0x0001_0001_0001u64));
    }

    #[test]
    fn test_block_proof_rejects_malformed_targets() {
        assert!(block_proof(0).is_zero());
        assert!(block_proof(0x0492_3456).is_zero());
        assert!(block_proof(0xff12_3456).is_zero());
    }

    #[test]
    fn test_harder_target_means_more_work() {
        assert!(block_proof(0x1c05a3f4) > block_proof(0x1d00ffff));
        assert!(block_proof(0x1d00ffff) > block_proof(0x207fffff));
    }

    #[test]
    fn test_equivalent_time_sign_and_zero() {
        let params = ConsensusParams::mainnet();
        let chain = linear_chain(20, 0, params.pow_target_spacing, 0x207fffff);
        let a = chain.ancestor(chain.last().unwrap(), 15).unwrap();
        let b = chain.ancestor(chain.last().unwrap(), 5).unwrap();

        assert_eq!(block_proof_equivalent_time(a, b, a, &params), 6_000);
        assert_eq!(block_proof_equivalent_time(b, a, a, &params), -6_000);
        assert_eq!(block_proof_equivalent_time(a, a, b, &params), 0);
    }

    #[test]
    fn test_equivalent_time_saturates() {
        let params = ConsensusParams::mainnet();
        let mut heavy = BlockIndex::new(1, 0, 0x1d00ffff);
        heavy.chain_work = U256::one() << 200;
        let light = BlockIndex::new(0, 0, 0x1d00ffff);

        assert_eq!(
            block_proof_equivalent_time(&heavy, &light, &light, &params),
            i64::MAX
        );
        assert_eq!(
            block_proof_equivalent_time(&light, &heavy, &light, &params),
            -i64::MAX
        );

        let broken_tip = BlockIndex::new(2, 0, 0);
        assert_eq!(
            block_proof_equivalent_time(&heavy, &light, &broken_tip, &params),
            i64::MAX
        );
    }
}
