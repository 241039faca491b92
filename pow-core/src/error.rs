//! Error types for the retarget core
//!
//! The retarget engine itself never fails: every branch has a defined
//! fallback. Errors only surface from proof-of-work validation, consensus
//! parameter checks, chain arena insertion and settings loading.

use thiserror::Error;

/// Reasons a header's proof of work is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofOfWorkError {
    /// Claimed target is negative, zero, overflows 256 bits or exceeds the pow limit
    #[error("nBits below minimum work (bits 0x{bits:08x})")]
    BelowMinimumWork { bits: u32 },

    /// Header hash is larger than the claimed target
    #[error("hash {hash} doesn't match nBits 0x{bits:08x}")]
    HashAboveTarget { hash: String, bits: u32 },
}

/// Invalid consensus parameter sets
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    #[error("Target spacing must be positive, got {0}")]
    InvalidSpacing(i64),

    #[error("Target timespan {timespan} must be a positive multiple of spacing {spacing}")]
    InvalidTimespan { timespan: i64, spacing: i64 },

    #[error("Normal adjustment interval is {0} blocks, at least 2 are required")]
    IntervalTooShort(i64),

    #[error("Proof-of-work limit must be non-zero")]
    ZeroPowLimit,

    #[error("Difficulty drop factor must be at least 1")]
    ZeroDropFactor,

    #[error("Fork schedule step {index} spans {blocks} blocks, at least 2 are required")]
    ScheduleStepTooShort { index: usize, blocks: u32 },

    #[error("Fork schedule step {index} does not extend past the previous step")]
    UnorderedSchedule { index: usize },
}

/// Chain arena insertion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainIndexError {
    #[error("Unknown parent block id {0}")]
    UnknownParent(usize),
}

/// Settings loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid consensus parameters: {0}")]
    Params(#[from] ParamsError),
}
