use super::parse_pubkey;
use crate::error::CliResult;
use spindrop_csvs::read_claim_rows_csv;
use spindrop_sdk::{proof_responses, tree_from_claim_rows};
use std::path::PathBuf;

/// Print the proof payloads for one claimant as JSON
pub fn execute(claims: PathBuf, claimant: String) -> CliResult<()> {
    let claimant = parse_pubkey(&claimant)?;
    let rows = read_claim_rows_csv(&claims)?;
    let tree = tree_from_claim_rows(&rows)?;

    let responses = proof_responses(&tree, &rows, &claimant)?;
    println!("{}", serde_json::to_string_pretty(&responses)?);
    Ok(())
}
