/// Consensus subsystem for the retarget core
///
/// Provides the rules that decide how much work a block must carry:
/// network parameters, difficulty retargeting, proof-of-work checks
/// and chain work accounting.
pub mod difficulty;
pub mod params;
pub mod pow;
pub mod work;

// Re-export key types
pub use difficulty::{
    calculate_fork_next_work_required, calculate_fork_reset_work_required,
    calculate_next_work_required, get_next_work_required,
};
pub use params::{
    default_fork_schedule, ConsensusParams, ForkTimespanStep, Network, DEFAULT_DROP_FACTOR,
    DEFAULT_FORK_RETARGET_PERIOD, DEFAULT_TARGET_SPACING, DEFAULT_TARGET_TIMESPAN,
};
pub use pow::{check_proof_of_work, verify_proof_of_work};
pub use work::{block_proof, block_proof_equivalent_time};
