use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use spindrop_csvs::{DistributionMode, ParseMode};
use spindrop_sdk::{serde_helpers::pubkey_string, AirdropSpec, UnlockPeriod};
use std::path::Path;

use crate::error::{CliError, CliResult};

/// Airdrop configuration file structure
///
/// ```yaml
/// name: launch
/// mint: So11111111111111111111111111111111111111112
/// decimals: 9
/// distribution: vested
/// unlock_period: weekly
/// vesting_end: 2027-01-01T00:00:00Z
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropConfig {
    /// Human-readable airdrop name (for organization)
    pub name: String,

    /// Token mint to be distributed
    #[serde(with = "pubkey_string")]
    pub mint: Pubkey,

    /// Mint decimals, used to scale allocation amounts
    pub decimals: u8,

    #[serde(default)]
    pub distribution: DistributionMode,

    /// Preset name (`daily`, `weekly`, ...) or seconds
    #[serde(default)]
    pub unlock_period: Option<UnlockPeriodSetting>,

    /// End of vesting; required for vested airdrops
    #[serde(default)]
    pub vesting_end: Option<DateTime<Utc>>,

    #[serde(default)]
    pub claims_closable_by_admin: bool,

    #[serde(default)]
    pub version: u64,

    /// Abort on the first malformed allocation row instead of dropping it
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnlockPeriodSetting {
    Seconds(u64),
    Named(String),
}

impl UnlockPeriodSetting {
    pub fn resolve(&self) -> CliResult<UnlockPeriod> {
        let period = match self {
            UnlockPeriodSetting::Seconds(secs) => UnlockPeriod::from_secs(*secs)?,
            UnlockPeriodSetting::Named(name) => name.parse()?,
        };
        Ok(period)
    }
}

impl AirdropConfig {
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> CliResult<Self> {
        let config: AirdropConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.name.trim().is_empty() {
            return Err(CliError::InvalidConfig("name must not be empty".to_string()));
        }
        if self.distribution == DistributionMode::Vested && self.vesting_end.is_none() {
            return Err(CliError::InvalidConfig(
                "vested airdrops require vesting_end".to_string(),
            ));
        }
        Ok(())
    }

    /// Compiler input for this configuration
    pub fn to_spec(&self) -> CliResult<AirdropSpec> {
        let mut spec = AirdropSpec::new(self.name.clone(), self.mint, self.decimals);
        spec.distribution = self.distribution;
        spec.version = self.version;
        spec.claims_closable_by_admin = self.claims_closable_by_admin;
        spec.vesting_end_ts = self.vesting_end.map(|end| end.timestamp());
        if self.strict {
            spec.parse_mode = ParseMode::Strict;
        }
        if let Some(setting) = &self.unlock_period {
            spec.unlock_period = setting.resolve()?;
        }
        Ok(spec)
    }
}
