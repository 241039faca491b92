//! Consensus parameters for proof-of-work retargeting
//!
//! One immutable [`ConsensusParams`] set exists per [`Network`]. Callers pick
//! the set once and pass it explicitly, so several networks' rules can be
//! exercised side by side in the same process.
//!
//! After the fork activation height a bounded window applies its own
//! timespan schedule: short adjustment intervals right after the fork that
//! grow back to the normal two-week cadence, letting the forked chain find
//! its difficulty quickly.

use crate::error::ParamsError;
use crate::types::target::encode_compact;
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Two weeks, in seconds
pub const DEFAULT_TARGET_TIMESPAN: i64 = 14 * 24 * 60 * 60;

/// Ten minutes, in seconds
pub const DEFAULT_TARGET_SPACING: i64 = 10 * 60;

/// Length of the post-fork retarget window (180 days of ten-minute blocks)
pub const DEFAULT_FORK_RETARGET_PERIOD: u32 = 180 * 24 * 6;

/// Factor by which the reset path eases the previous target
pub const DEFAULT_DROP_FACTOR: u32 = 4;

pub const MAINNET_FORK_ACTIVATION_HEIGHT: u32 = 665_280;
pub const TESTNET_FORK_ACTIVATION_HEIGHT: u32 = 1_155_168;
pub const REGTEST_FORK_ACTIVATION_HEIGHT: u32 = 2_016;

/// Network selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        };
        f.write_str(name)
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Network::Mainnet),
            "test" | "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(format!("Unknown network: {other}")),
        }
    }
}

/// One rung of the post-fork timespan ladder
///
/// Applies while `height - fork_activation_height < until_offset`; the
/// target timespan is `blocks * pow_target_spacing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkTimespanStep {
    pub until_offset: u32,
    pub blocks: u32,
}

/// Default post-fork ladder: 2 hour intervals for the first day, then daily
/// until two weeks in, then weekly until four weeks in
pub fn default_fork_schedule() -> Vec<ForkTimespanStep> {
    vec![
        ForkTimespanStep {
            until_offset: 144,
            blocks: 12,
        },
        ForkTimespanStep {
            until_offset: 2_016,
            blocks: 144,
        },
        ForkTimespanStep {
            until_offset: 4_032,
            blocks: 1_008,
        },
    ]
}

/// Proof-of-work consensus parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsensusParams {
    /// Absolute target ceiling (minimum difficulty)
    pub pow_limit: U256,
    /// Expected seconds per adjustment interval
    pub pow_target_timespan: i64,
    /// Expected seconds per block
    pub pow_target_spacing: i64,
    /// Allow minimum-difficulty blocks after a timestamp gap
    pub pow_allow_min_difficulty_blocks: bool,
    /// Never change the target
    pub pow_no_retargeting: bool,
    /// Height of the block whose successor is the first post-fork block
    pub fork_activation_height: u32,
    /// Blocks after activation during which the fork schedule applies
    pub fork_retarget_period: u32,
    /// Post-fork timespan ladder
    pub fork_timespan_schedule: Vec<ForkTimespanStep>,
    /// Factor applied to the previous target by the reset path
    pub difficulty_drop_factor: u32,
}

impl Default for ConsensusParams {
    fn default() -> Self {
        Self::mainnet()
    }
}

impl ConsensusParams {
    /// Parameters for a network
    pub fn for_network(network: Network) -> Self {
        match network {
            Network::Mainnet => Self::mainnet(),
            Network::Testnet => Self::testnet(),
            Network::Regtest => Self::regtest(),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            pow_limit: U256::max_value() >> 32,
            pow_target_timespan: DEFAULT_TARGET_TIMESPAN,
            pow_target_spacing: DEFAULT_TARGET_SPACING,
            pow_allow_min_difficulty_blocks: false,
            pow_no_retargeting: false,
            fork_activation_height: MAINNET_FORK_ACTIVATION_HEIGHT,
            fork_retarget_period: DEFAULT_FORK_RETARGET_PERIOD,
            fork_timespan_schedule: default_fork_schedule(),
            difficulty_drop_factor: DEFAULT_DROP_FACTOR,
        }
    }

    pub fn testnet() -> Self {
        Self {
            pow_allow_min_difficulty_blocks: true,
            fork_activation_height: TESTNET_FORK_ACTIVATION_HEIGHT,
            ..Self::mainnet()
        }
    }

    pub fn regtest() -> Self {
        Self {
            pow_limit: U256::max_value() >> 1,
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: true,
            fork_activation_height: REGTEST_FORK_ACTIVATION_HEIGHT,
            ..Self::mainnet()
        }
    }

    /// Pow limit in compact form
    pub fn pow_limit_compact(&self) -> u32 {
        encode_compact(&self.pow_limit)
    }

    /// First height after the post-fork retarget window
    pub fn retarget_period_end(&self) -> u32 {
        self.fork_activation_height
            .saturating_add(self.fork_retarget_period)
    }

    /// Whether `height` lies in `[fork_activation_height, retarget_period_end)`
    pub fn in_fork_window(&self, height: u32) -> bool {
        height >= self.fork_activation_height && height < self.retarget_period_end()
    }

    /// Target timespan that applies when the last block is at `height`
    pub fn target_timespan_at(&self, height: u32) -> i64 {
        if !self.in_fork_window(height) {
            return self.pow_target_timespan;
        }

        let offset = height - self.fork_activation_height;
        self.fork_timespan_schedule
            .iter()
            .find(|step| offset < step.until_offset)
            .map(|step| i64::from(step.blocks) * self.pow_target_spacing)
            .unwrap_or(self.pow_target_timespan)
    }

    /// Blocks per retarget when the last block is at `height`
    pub fn difficulty_adjustment_interval(&self, height: u32) -> i64 {
        self.target_timespan_at(height) / self.pow_target_spacing
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.pow_target_spacing <= 0 {
            return Err(ParamsError::InvalidSpacing(self.pow_target_spacing));
        }
        if self.pow_target_timespan <= 0 || self.pow_target_timespan % self.pow_target_spacing != 0
        {
            return Err(ParamsError::InvalidTimespan {
                timespan: self.pow_target_timespan,
                spacing: self.pow_target_spacing,
            });
        }
        // The post-fork +1 shift also applies after the fork window, where
        // the normal interval is in force
        let normal_interval = self.pow_target_timespan / self.pow_target_spacing;
        if normal_interval < 2 {
            return Err(ParamsError::IntervalTooShort(normal_interval));
        }
        if self.pow_limit.is_zero() {
            return Err(ParamsError::ZeroPowLimit);
        }
        if self.difficulty_drop_factor == 0 {
            return Err(ParamsError::ZeroDropFactor);
        }

        // An interval of one block would put the first block of the interval
        // above the last once the post-fork +1 shift applies
        let mut previous_offset = 0;
        for (index, step) in self.fork_timespan_schedule.iter().enumerate() {
            if step.blocks < 2 {
                return Err(ParamsError::ScheduleStepTooShort {
                    index,
                    blocks: step.blocks,
                });
            }
            if step.until_offset <= previous_offset {
                return Err(ParamsError::UnorderedSchedule { index });
            }
            previous_offset = step.until_offset;
        }
        Ok(())
    }
}
