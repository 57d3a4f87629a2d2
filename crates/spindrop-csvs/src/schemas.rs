/*!
# CSV Schema Definitions

This module defines the two row formats an airdrop moves through:

- **Allocation input** (`Recipient,Amount`): human-authored, amounts in whole
  tokens with optional fractional digits
- **Claim rows** (`pubkey,amount_unlocked,amount_locked,category`): the
  canonical, smallest-unit rows handed to the commitment storage service

The claim-row layout is a data contract with the storage service; the column
order and the category value must not change.
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CsvError;

/// Maximum supported mint decimals when using u64 for token amounts.
///
/// SOL (9) and USDC (6) fit comfortably; 18 decimals still leaves room
/// for ~18 whole tokens.
pub const MAX_SUPPORTED_DECIMALS: u8 = 18;

/// Header of the human-authored allocation file. Informational only: the
/// first line of an allocation file is always discarded.
pub const ALLOCATION_CSV_HEADERS: &[&str] = &["Recipient", "Amount"];

/// Expected headers for canonical claim rows in exact order
pub const CLAIM_ROW_CSV_HEADERS: &[&str] =
    &["pubkey", "amount_unlocked", "amount_locked", "category"];

/// Category value required by the commitment storage schema
pub const CLAIM_CATEGORY: &str = "Staker";

// ================================================================================================
// Allocation records
// ================================================================================================

/// One parsed allocation: a chain account and an amount in the token's
/// smallest unit. Duplicate addresses are legal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Recipient {
    /// Account address as written in the input (base58 for Solana)
    pub address: String,

    /// Allocation in the smallest token unit
    pub amount: u64,
}

impl Recipient {
    pub fn new(address: impl Into<String>, amount: u64) -> Self {
        Self {
            address: address.into(),
            amount,
        }
    }
}

// ================================================================================================
// Claim rows
// ================================================================================================

/// Row structure for the canonical claim-row file
///
/// **Producer**: `transform` / `compile` commands
/// **Consumers**: commitment storage service, `proof` command
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimRow {
    /// Claimant address (base58)
    pub pubkey: String,

    /// Portion claimable immediately, smallest unit
    pub amount_unlocked: u64,

    /// Portion released over the vesting schedule, smallest unit
    pub amount_locked: u64,

    /// Storage schema category, always [`CLAIM_CATEGORY`] for rows we produce
    pub category: String,
}

impl ClaimRow {
    /// Full allocation behind this row. `None` if the two portions overflow.
    pub fn total_amount(&self) -> Option<u64> {
        self.amount_unlocked.checked_add(self.amount_locked)
    }

    /// Recover the allocation record this row was classified from.
    pub fn to_recipient(&self) -> Result<Recipient, CsvError> {
        let amount = self.total_amount().ok_or(CsvError::TotalOverflow)?;
        Ok(Recipient::new(self.pubkey.clone(), amount))
    }
}

// ================================================================================================
// Modes
// ================================================================================================

/// How an airdrop releases its tokens.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistributionMode {
    /// Everything claimable at once
    #[default]
    Instant,
    /// Everything released over a vesting schedule
    Vested,
}

impl DistributionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionMode::Instant => "instant",
            DistributionMode::Vested => "vested",
        }
    }
}

impl fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionMode {
    type Err = CsvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "instant" => Ok(DistributionMode::Instant),
            "vested" => Ok(DistributionMode::Vested),
            _ => Err(CsvError::UnknownDistributionMode(s.to_string())),
        }
    }
}

/// What the parser does with a malformed row.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Drop the row, log it and keep going
    #[default]
    Lenient,
    /// Abort on the first malformed row
    Strict,
}

// ================================================================================================
// Tests
// ================================================================================================
