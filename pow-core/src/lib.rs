// Retarget Core Library
// Proof-of-work target computation, validation and chain-work accounting

// Public modules
pub mod consensus;
pub mod error;
pub mod settings;
pub mod storage;
pub mod types;
pub mod util;

#[cfg(test)]
mod test_common;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use crate::consensus::{
    block_proof, block_proof_equivalent_time, calculate_fork_next_work_required,
    calculate_fork_reset_work_required, calculate_next_work_required, check_proof_of_work,
    get_next_work_required, verify_proof_of_work, ConsensusParams, ForkTimespanStep, Network,
};
pub use crate::error::{
    ChainIndexError, ParamsError, ProofOfWorkError, SettingsError,
};
pub use crate::settings::PowSettings;
pub use crate::storage::{BlockId, BlockIndex, ChainArena, ChainIndex};
pub use crate::types::target::{decode_compact, encode_compact, DecodedTarget};
pub use primitive_types::U256;
