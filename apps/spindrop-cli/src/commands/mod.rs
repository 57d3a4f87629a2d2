pub mod compile;
pub mod generate_fixtures;
pub mod proof;
pub mod transform;
pub mod verify;

use crate::error::{CliError, CliResult};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub(crate) fn parse_pubkey(s: &str) -> CliResult<Pubkey> {
    Pubkey::from_str(s.trim()).map_err(|_| CliError::InvalidPubkey(s.to_string()))
}
