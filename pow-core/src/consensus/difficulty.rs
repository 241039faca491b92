//! Difficulty retargeting
//!
//! Computes the compact target required of the block that follows a given
//! chain tip. The target only moves at adjustment-interval boundaries, where
//! it is scaled by the ratio of the real time the interval took to the time
//! it should have taken (clamped to 4x either way).
//!
//! Around the fork activation height three extra rules apply:
//!
//! - the block after the activation block inherits its parent's target
//!   unchanged (a one-block pin, not a recompute);
//! - from activation onward the first block of an interval sits one height
//!   later, since the pinned block consumed one slot;
//! - retargets on the fork path fall back to the pow limit instead of
//!   wrapping when the 256-bit product overflows, and the first interval
//!   after activation may ease the target by the drop factor when
//!   retargeting is forced.
//!
//! The reset path divides the eased target by the target timespan before
//! multiplying by the actual timespan; the other paths multiply first.
//!
//! None of these functions fail. Parameters are expected to have passed
//! [`ConsensusParams::validate`]. The only panics are assertions on that
//! precondition and on the chain index contract: the first block of an
//! interval must exist.

use crate::consensus::params::ConsensusParams;
use crate::storage::{BlockIndex, ChainIndex};
use crate::types::target::{decode_compact, encode_compact};
use primitive_types::U256;
use tracing::{debug, info, warn};

/// Which recomputation rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetargetMode {
    /// Pre-fork rules; 256-bit overflow wraps
    Legacy,
    /// Post-fork rules; overflow yields the pow limit
    Fork,
    /// Post-fork rules with the previous target eased by the drop factor
    ForkReset,
}

/// Compact target required of the block following `last`
///
/// `block_time` is the timestamp of the new block. `force_retarget`
/// disables the no-retargeting and minimum-difficulty rules.
pub fn get_next_work_required<C>(
    chain: &C,
    last: Option<&BlockIndex>,
    block_time: i64,
    params: &ConsensusParams,
    force_retarget: bool,
) -> u32
where
    C: ChainIndex + ?Sized,
{
    let pow_limit_bits = params.pow_limit_compact();

    // Genesis block
    let Some(last) = last else {
        return pow_limit_bits;
    };

    if last.height == params.fork_activation_height {
        info!(
            height = last.height,
            bits = %format!("{:08x}", last.bits),
            "fork block difficulty reset, keeping parent target"
        );
        return last.bits;
    }

    let interval = params.difficulty_adjustment_interval(last.height);
    debug!(
        height = last.height,
        interval,
        timespan = params.target_timespan_at(last.height),
        "difficulty adjustment parameters"
    );

    if (i64::from(last.height) + 1) % interval != 0 {
        if params.pow_no_retargeting && !force_retarget {
            return last.bits;
        }

        if params.pow_allow_min_difficulty_blocks && !force_retarget {
            // A block more than two spacings late may be mined at minimum difficulty
            if block_time > last.time + params.pow_target_spacing * 2 {
                return pow_limit_bits;
            }
            return last_non_min_difficulty_bits(chain, last, interval, pow_limit_bits);
        }

        return last.bits;
    }

    let mut height_first = i64::from(last.height) - (interval - 1);
    if last.height >= params.fork_activation_height {
        height_first += 1;
    }
    assert!(
        height_first >= 0,
        "first block of interval at negative height {height_first} (last block {})",
        last.height
    );

    let Some(first) = chain.ancestor(last, height_first as u32) else {
        panic!(
            "chain index has no ancestor at height {height_first} for block {}",
            last.height
        );
    };

    if last.height < params.fork_activation_height {
        return calculate_next_work_required(last, first.time, params, force_retarget);
    }

    if force_retarget && i64::from(first.height) == i64::from(params.fork_activation_height) + 1
    {
        return calculate_fork_reset_work_required(last, first.time, params, force_retarget);
    }

    calculate_fork_next_work_required(last, first.time, params, force_retarget)
}

/// Walk back over a run of minimum-difficulty blocks to the last real target
fn last_non_min_difficulty_bits<C>(
    chain: &C,
    last: &BlockIndex,
    interval: i64,
    pow_limit_bits: u32,
) -> u32
where
    C: ChainIndex + ?Sized,
{
    let mut node = last;
    while i64::from(node.height) % interval != 0 && node.bits == pow_limit_bits {
        match chain.prev(node) {
            Some(prev) => node = prev,
            None => break,
        }
    }
    node.bits
}

/// Retarget at an interval boundary under pre-fork rules
///
/// `first_block_time` is the timestamp of the first block of the interval.
pub fn calculate_next_work_required(
    last: &BlockIndex,
    first_block_time: i64,
    params: &ConsensusParams,
    force_retarget: bool,
) -> u32 {
    retarget(
        last,
        first_block_time,
        params,
        force_retarget,
        RetargetMode::Legacy,
    )
}

/// Retarget at an interval boundary under post-fork rules
pub fn calculate_fork_next_work_required(
    last: &BlockIndex,
    first_block_time: i64,
    params: &ConsensusParams,
    force_retarget: bool,
) -> u32 {
    retarget(
        last,
        first_block_time,
        params,
        force_retarget,
        RetargetMode::Fork,
    )
}

/// Post-fork retarget that first eases the previous target by
/// `params.difficulty_drop_factor`
pub fn calculate_fork_reset_work_required(
    last: &BlockIndex,
    first_block_time: i64,
    params: &ConsensusParams,
    force_retarget: bool,
) -> u32 {
    info!(
        height = last.height,
        drop_factor = params.difficulty_drop_factor,
        "fork difficulty reset with drop factor"
    );
    retarget(
        last,
        first_block_time,
        params,
        force_retarget,
        RetargetMode::ForkReset,
    )
}

fn retarget(
    last: &BlockIndex,
    first_block_time: i64,
    params: &ConsensusParams,
    force_retarget: bool,
    mode: RetargetMode,
) -> u32 {
    if params.pow_no_retargeting && !force_retarget {
        return last.bits;
    }

    let mut actual_timespan = last.time - first_block_time;
    debug!(actual_timespan, "actual timespan before bounds");

    let target_timespan = params.target_timespan_at(last.height);
    assert!(
        target_timespan > 0,
        "target timespan must be positive, got {target_timespan} at height {}",
        last.height
    );
    actual_timespan = actual_timespan.clamp(target_timespan / 4, target_timespan * 4);

    let pow_limit = params.pow_limit;
    let old_target = decode_compact(last.bits).target;
    // actual_timespan is at least target_timespan / 4, so never negative here
    let actual = U256::from(actual_timespan as u64);
    let target = U256::from(target_timespan as u64);

    let (mut new_target, overflow) = if mode == RetargetMode::ForkReset {
        // Eased target is divided before scaling, so the truncation of the
        // quotient carries into the result
        let (eased, eased_overflow) =
            old_target.overflowing_mul(U256::from(params.difficulty_drop_factor));
        let (scaled, scaled_overflow) = (eased / target).overflowing_mul(actual);
        (scaled, eased_overflow || scaled_overflow)
    } else {
        let (scaled, scaled_overflow) = old_target.overflowing_mul(actual);
        (scaled / target, scaled_overflow)
    };

    if overflow && mode != RetargetMode::Legacy {
        warn!(
            height = last.height,
            bits = %format!("{:08x}", last.bits),
            actual_timespan,
            target_timespan,
            "retarget overflowed 256 bits, using pow limit"
        );
        return encode_compact(&pow_limit);
    }

    if new_target > pow_limit {
        new_target = pow_limit;
    }

    let new_bits = encode_compact(&new_target);
    debug!(target_timespan, actual_timespan, "GetNextWorkRequired RETARGET");
    debug!("Before: {:08x}  {:064x}", last.bits, old_target);
    debug!("After:  {:08x}  {:064x}", new_bits, new_target);

    new_bits
}
