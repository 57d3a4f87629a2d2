/*!
# Commitment Parameters

The parameter set submitted to the distributor program when an airdrop is
created. Everything here is derived from the compiled tree plus the
creator's schedule choices; nothing is read from the chain.

## Vesting window

- Vesting starts [`VESTING_START_DELAY_SECS`] after "now" so the creation
  transaction lands before the first unlock.
- Instant airdrops end at the start.
- Vested airdrops need an end strictly in the future, at least one unlock
  period away.
- Clawback becomes possible from the vesting start.
*/

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use spindrop_csvs::DistributionMode;
use spindrop_merkle::Hash;
use std::fmt;
use std::str::FromStr;

use crate::{
    errors::{SdkError, SdkResult},
    serde_helpers::{hex_hash, pubkey_string},
};

/// Delay between compilation time and vesting start
pub const VESTING_START_DELAY_SECS: i64 = 10;

/// Wrapped SOL mint; distributions of it are funded with native lamports
pub const WRAPPED_SOL_MINT: &str = "So11111111111111111111111111111111111111112";

pub fn is_native_mint(mint: &Pubkey) -> bool {
    mint.to_string() == WRAPPED_SOL_MINT
}

// ================================================================================================
// Unlock period
// ================================================================================================

/// Interval, in seconds, between unlocks of a vested allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct UnlockPeriod(u64);

impl UnlockPeriod {
    pub const SECOND: UnlockPeriod = UnlockPeriod(1);
    pub const MINUTE: UnlockPeriod = UnlockPeriod(60);
    pub const HOUR: UnlockPeriod = UnlockPeriod(3_600);
    pub const DAY: UnlockPeriod = UnlockPeriod(86_400);
    pub const WEEK: UnlockPeriod = UnlockPeriod(604_800);
    /// 30 days
    pub const MONTH: UnlockPeriod = UnlockPeriod(2_592_000);
    /// 90 days
    pub const QUARTER: UnlockPeriod = UnlockPeriod(7_776_000);

    pub fn from_secs(secs: u64) -> SdkResult<Self> {
        if secs == 0 {
            return Err(SdkError::InvalidUnlockPeriod(
                "unlock period must be at least one second".to_string(),
            ));
        }
        Ok(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }
}

impl Default for UnlockPeriod {
    fn default() -> Self {
        UnlockPeriod::SECOND
    }
}

impl TryFrom<u64> for UnlockPeriod {
    type Error = SdkError;

    fn try_from(secs: u64) -> Result<Self, Self::Error> {
        Self::from_secs(secs)
    }
}

impl From<UnlockPeriod> for u64 {
    fn from(period: UnlockPeriod) -> Self {
        period.0
    }
}

impl FromStr for UnlockPeriod {
    type Err = SdkError;

    /// Accepts a preset name (`daily`, `week`, ...) or a number of seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let preset = match s.trim().to_ascii_lowercase().as_str() {
            "second" | "per-second" => Some(UnlockPeriod::SECOND),
            "minute" | "per-minute" => Some(UnlockPeriod::MINUTE),
            "hour" | "hourly" | "per-hour" => Some(UnlockPeriod::HOUR),
            "day" | "daily" => Some(UnlockPeriod::DAY),
            "week" | "weekly" => Some(UnlockPeriod::WEEK),
            "month" | "monthly" => Some(UnlockPeriod::MONTH),
            "quarter" | "quarterly" => Some(UnlockPeriod::QUARTER),
            _ => None,
        };

        match preset {
            Some(period) => Ok(period),
            None => {
                let secs = s.trim().parse::<u64>().map_err(|_| {
                    SdkError::InvalidUnlockPeriod(format!("'{s}' is neither a preset nor seconds"))
                })?;
                Self::from_secs(secs)
            }
        }
    }
}

impl fmt::Display for UnlockPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            UnlockPeriod::SECOND => write!(f, "1 second"),
            UnlockPeriod::MINUTE => write!(f, "1 minute"),
            UnlockPeriod::HOUR => write!(f, "1 hour"),
            UnlockPeriod::DAY => write!(f, "1 day"),
            UnlockPeriod::WEEK => write!(f, "1 week"),
            UnlockPeriod::MONTH => write!(f, "1 month"),
            UnlockPeriod::QUARTER => write!(f, "1 quarter"),
            UnlockPeriod(secs) => write!(f, "{secs} seconds"),
        }
    }
}

// ================================================================================================
// Vesting window
// ================================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingWindow {
    pub start_ts: i64,
    pub end_ts: i64,
    pub clawback_start_ts: i64,
}

impl VestingWindow {
    /// Derive the schedule for an airdrop compiled at `now` (unix seconds).
    pub fn new(
        mode: DistributionMode,
        now: i64,
        vesting_end_ts: Option<i64>,
        unlock_period: UnlockPeriod,
    ) -> SdkResult<Self> {
        let start_ts = now + VESTING_START_DELAY_SECS;

        let end_ts = match mode {
            DistributionMode::Instant => start_ts,
            DistributionMode::Vested => {
                let end_ts = vesting_end_ts.ok_or(SdkError::MissingVestingEnd)?;
                if end_ts <= now {
                    return Err(SdkError::VestingEndInPast { end_ts, now });
                }

                let duration = end_ts - now;
                if (duration as u64) < unlock_period.as_secs() {
                    return Err(SdkError::UnlockPeriodTooLong {
                        period: unlock_period.as_secs(),
                        duration,
                    });
                }
                end_ts
            }
        };

        Ok(Self {
            start_ts,
            end_ts,
            clawback_start_ts: start_ts,
        })
    }
}

// ================================================================================================
// Distributor parameters
// ================================================================================================

/// Arguments of the distributor program's create instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorParams {
    #[serde(with = "pubkey_string")]
    pub mint: Pubkey,
    pub version: u64,
    #[serde(with = "hex_hash")]
    pub root: Hash,
    /// Number of leaves
    pub max_num_nodes: u64,
    /// Sum of all leaf amounts, smallest unit
    pub max_total_claim: u64,
    /// Seconds between unlocks
    pub unlock_period: u64,
    pub start_vesting_ts: i64,
    pub end_vesting_ts: i64,
    pub clawback_start_ts: i64,
    pub claims_closable_by_admin: bool,
}
