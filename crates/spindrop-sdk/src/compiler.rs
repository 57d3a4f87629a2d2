/*!
# Airdrop Compiler

End-to-end pipeline for one airdrop:

```text
allocation text -> recipients -> claim rows -> claim tree -> distributor params
```

All inputs are explicit, including the clock value used for the vesting
window, so compiling the same inputs twice yields the same output.
*/

use rust_decimal::Decimal;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use spindrop_csvs::{
    transform_allocations, ClaimRow, DistributionMode, ParseMode, ParseOptions, Recipient,
};
use spindrop_merkle::{AirdropTree, MerkleError};
use std::io::Read;
use tracing::{debug, info};

use crate::{
    amounts::to_human_amount,
    claims::{ClaimChecker, ProofResponse},
    commitment::{is_native_mint, DistributorParams, UnlockPeriod, VestingWindow},
    errors::{SdkError, SdkResult},
    serde_helpers::pubkey_string,
};

/// Everything the creator chooses about an airdrop besides the recipient list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirdropSpec {
    pub name: String,
    pub mint: Pubkey,
    pub decimals: u8,
    pub distribution: DistributionMode,
    pub parse_mode: ParseMode,
    pub version: u64,
    pub unlock_period: UnlockPeriod,
    /// Required for vested airdrops, ignored for instant ones
    pub vesting_end_ts: Option<i64>,
    pub claims_closable_by_admin: bool,
}

impl AirdropSpec {
    /// Instant, lenient, version 0, one-second unlocks.
    pub fn new(name: impl Into<String>, mint: Pubkey, decimals: u8) -> Self {
        Self {
            name: name.into(),
            mint,
            decimals,
            distribution: DistributionMode::Instant,
            parse_mode: ParseMode::Lenient,
            version: 0,
            unlock_period: UnlockPeriod::default(),
            vesting_end_ts: None,
            claims_closable_by_admin: false,
        }
    }

    pub fn vested(mut self, vesting_end_ts: i64, unlock_period: UnlockPeriod) -> Self {
        self.distribution = DistributionMode::Vested;
        self.vesting_end_ts = Some(vesting_end_ts);
        self.unlock_period = unlock_period;
        self
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new(self.decimals).with_mode(self.parse_mode)
    }
}

/// A compiled airdrop: canonical rows, claim tree and the parameters to commit.
#[derive(Debug, Clone)]
pub struct CompiledAirdrop {
    pub name: String,
    pub decimals: u8,
    pub distribution: DistributionMode,
    pub rows: Vec<ClaimRow>,
    pub tree: AirdropTree,
    pub params: DistributorParams,
    pub dropped_rows: usize,
}

/// Parse raw allocation text and compile it.
pub fn compile_airdrop<R: Read>(
    spec: &AirdropSpec,
    reader: R,
    now: i64,
) -> SdkResult<CompiledAirdrop> {
    let transformed = transform_allocations(reader, spec.parse_options(), spec.distribution)?;
    let parsed = transformed.parsed;

    let tree = AirdropTree::from_recipients(&parsed.recipients)?;
    let committed = tree.total_amount().ok_or(SdkError::AmountOverflow)?;
    if committed != parsed.total_amount {
        return Err(SdkError::TotalMismatch {
            parsed: parsed.total_amount,
            committed,
        });
    }

    finish(spec, transformed.rows, tree, parsed.dropped_rows, now)
}

/// Compile from canonical claim rows, e.g. ones read back from storage.
pub fn compile_from_claim_rows(
    spec: &AirdropSpec,
    rows: Vec<ClaimRow>,
    now: i64,
) -> SdkResult<CompiledAirdrop> {
    let tree = tree_from_claim_rows(&rows)?;
    finish(spec, rows, tree, 0, now)
}

/// Rebuild the claim tree behind a set of canonical rows.
pub fn tree_from_claim_rows(rows: &[ClaimRow]) -> SdkResult<AirdropTree> {
    let recipients = rows
        .iter()
        .map(ClaimRow::to_recipient)
        .collect::<Result<Vec<Recipient>, _>>()?;

    Ok(AirdropTree::from_recipients(&recipients)?)
}

/// Proof payloads for every allocation held by `claimant`.
///
/// Each leaf is paired with a row of the same total so the unlocked/locked
/// split matches what storage serves.
pub fn proof_responses(
    tree: &AirdropTree,
    rows: &[ClaimRow],
    claimant: &Pubkey,
) -> SdkResult<Vec<ProofResponse>> {
    let proofs = tree.proofs_for_claimant(claimant).map_err(|e| match e {
        MerkleError::ClaimantNotFound(pubkey) => SdkError::ClaimantNotFound(pubkey),
        other => SdkError::Merkle(other),
    })?;

    let address = claimant.to_string();
    let mut candidates: Vec<&ClaimRow> =
        rows.iter().filter(|row| row.pubkey == address).collect();

    let mut responses = Vec::with_capacity(proofs.len());
    for (leaf, proof) in proofs {
        let position = candidates
            .iter()
            .position(|row| row.total_amount() == Some(leaf.amount))
            .ok_or(SdkError::Merkle(MerkleError::LeafNotFound {
                claimant: leaf.claimant,
                amount: leaf.amount,
            }))?;
        let row = candidates.swap_remove(position);

        responses.push(ProofResponse {
            claimant: leaf.claimant,
            proof: proof.into_inner(),
            amount_unlocked: row.amount_unlocked,
            amount_locked: row.amount_locked,
        });
    }

    debug!(claimant = %claimant, allocations = responses.len(), "served proofs");
    Ok(responses)
}

fn finish(
    spec: &AirdropSpec,
    rows: Vec<ClaimRow>,
    tree: AirdropTree,
    dropped_rows: usize,
    now: i64,
) -> SdkResult<CompiledAirdrop> {
    let window = VestingWindow::new(
        spec.distribution,
        now,
        spec.vesting_end_ts,
        spec.unlock_period,
    )?;
    let max_total_claim = tree.total_amount().ok_or(SdkError::AmountOverflow)?;

    let params = DistributorParams {
        mint: spec.mint,
        version: spec.version,
        root: tree.root(),
        max_num_nodes: tree.len() as u64,
        max_total_claim,
        unlock_period: spec.unlock_period.as_secs(),
        start_vesting_ts: window.start_ts,
        end_vesting_ts: window.end_ts,
        clawback_start_ts: window.clawback_start_ts,
        claims_closable_by_admin: spec.claims_closable_by_admin,
    };

    info!(
        name = %spec.name,
        mint = %spec.mint,
        recipients = params.max_num_nodes,
        total = %to_human_amount(max_total_claim, spec.decimals),
        dropped_rows,
        root = %hex::encode(params.root),
        "compiled airdrop"
    );

    Ok(CompiledAirdrop {
        name: spec.name.clone(),
        decimals: spec.decimals,
        distribution: spec.distribution,
        rows,
        tree,
        params,
        dropped_rows,
    })
}

impl CompiledAirdrop {
    pub fn root_hex(&self) -> String {
        hex::encode(self.params.root)
    }

    pub fn total_amount(&self) -> u64 {
        self.params.max_total_claim
    }

    /// Total in whole tokens
    pub fn human_total(&self) -> Decimal {
        to_human_amount(self.params.max_total_claim, self.decimals)
    }

    /// Whether the airdrop distributes native SOL through the wrapped mint
    pub fn is_native(&self) -> bool {
        is_native_mint(&self.params.mint)
    }

    pub fn proof_responses(&self, claimant: &Pubkey) -> SdkResult<Vec<ProofResponse>> {
        proof_responses(&self.tree, &self.rows, claimant)
    }

    /// Every allocation's proof payload, in leaf order
    pub fn all_proof_responses(&self) -> SdkResult<Vec<ProofResponse>> {
        let mut claimants: Vec<Pubkey> =
            self.tree.leaves().iter().map(|leaf| leaf.claimant).collect();
        claimants.dedup();

        let mut responses = Vec::with_capacity(self.tree.len());
        for claimant in &claimants {
            responses.extend(self.proof_responses(claimant)?);
        }
        Ok(responses)
    }

    /// Checker for claims against a root published on chain.
    pub fn claim_checker(&self, published_root: [u8; 32]) -> ClaimChecker<'_> {
        ClaimChecker::new(&self.tree, published_root)
    }

    pub fn summary(&self) -> AirdropSummary {
        AirdropSummary {
            name: self.name.clone(),
            mint: self.params.mint,
            native: self.is_native(),
            distribution: self.distribution,
            decimals: self.decimals,
            recipients: self.params.max_num_nodes,
            total_amount: self.params.max_total_claim,
            human_total: self.human_total().to_string(),
            dropped_rows: self.dropped_rows,
            root: self.root_hex(),
            depth: self.tree.depth(),
        }
    }
}

/// Review-screen view of a compiled airdrop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirdropSummary {
    pub name: String,
    #[serde(with = "pubkey_string")]
    pub mint: Pubkey,
    pub native: bool,
    pub distribution: DistributionMode,
    pub decimals: u8,
    pub recipients: u64,
    pub total_amount: u64,
    pub human_total: String,
    pub dropped_rows: usize,
    pub root: String,
    pub depth: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindrop_csvs::CsvError;

    const NOW: i64 = 1_760_000_000;

    fn addr(seed: u8) -> Pubkey {
        Pubkey::new_from_array([seed; 32])
    }

    fn allocation_text(entries: &[(Pubkey, &str)]) -> String {
        let mut text = String::from("Recipient,Amount\n");
        for (pubkey, amount) in entries {
            text.push_str(&format!("{pubkey},{amount}\n"));
        }
        text
    }

    #[test]
    fn test_compile_instant() {
        let text = allocation_text(&[(addr(1), "1"), (addr(2), "2")]);
        let spec = AirdropSpec::new("test", addr(9), 9);

        let compiled = compile_airdrop(&spec, text.as_bytes(), NOW).unwrap();

        assert_eq!(compiled.params.max_num_nodes, 2);
        assert_eq!(compiled.params.max_total_claim, 3_000_000_000);
        assert_eq!(compiled.params.start_vesting_ts, NOW + 10);
        assert_eq!(compiled.params.end_vesting_ts, NOW + 10);
        assert_eq!(compiled.params.root, compiled.tree.root());
        assert_eq!(compiled.human_total().to_string(), "3");
        assert!(!compiled.is_native());

        assert!(compiled.rows.iter().all(|row| row.amount_locked == 0));
        assert_eq!(compiled.rows[0].amount_unlocked, 1_000_000_000);
    }

    #[test]
    fn test_compile_vested_splits_everything_locked() {
        let text = allocation_text(&[(addr(1), "10"), (addr(2), "0.5")]);
        let spec =
            AirdropSpec::new("vested", addr(9), 6).vested(NOW + 30 * 86_400, UnlockPeriod::DAY);

        let compiled = compile_airdrop(&spec, text.as_bytes(), NOW).unwrap();

        assert_eq!(compiled.params.unlock_period, 86_400);
        assert_eq!(compiled.params.end_vesting_ts, NOW + 30 * 86_400);
        assert!(compiled.rows.iter().all(|row| row.amount_unlocked == 0));
        assert_eq!(compiled.total_amount(), 10_500_000);
    }

    #[test]
    fn test_compile_rejects_bad_schedule() {
        let text = allocation_text(&[(addr(1), "1")]);
        let mut spec = AirdropSpec::new("bad", addr(9), 0);
        spec.distribution = DistributionMode::Vested;

        assert!(matches!(
            compile_airdrop(&spec, text.as_bytes(), NOW),
            Err(SdkError::MissingVestingEnd)
        ));
    }

    #[test]
    fn test_compile_empty_and_malformed() {
        let spec = AirdropSpec::new("empty", addr(9), 9);
        assert!(matches!(
            compile_airdrop(&spec, "Recipient,Amount\n".as_bytes(), NOW),
            Err(SdkError::Merkle(MerkleError::EmptyTree))
        ));

        let text = "Recipient,Amount\nnot-an-address,5\n";
        assert!(matches!(
            compile_airdrop(&spec, text.as_bytes(), NOW),
            Err(SdkError::Merkle(MerkleError::InvalidAddress { .. }))
        ));

        let mut strict = spec.clone();
        strict.parse_mode = ParseMode::Strict;
        let text = format!("Recipient,Amount\n{},abc\n", addr(1));
        assert!(matches!(
            compile_airdrop(&strict, text.as_bytes(), NOW),
            Err(SdkError::Csv(CsvError::InvalidAmount { .. }))
        ));
    }

    #[test]
    fn test_proof_responses_for_duplicate_claimant() {
        let text = allocation_text(&[(addr(1), "1"), (addr(2), "2"), (addr(1), "3")]);
        let spec = AirdropSpec::new("dupes", addr(9), 0);
        let compiled = compile_airdrop(&spec, text.as_bytes(), NOW).unwrap();

        let responses = compiled.proof_responses(&addr(1)).unwrap();
        assert_eq!(responses.len(), 2);
        let mut amounts: Vec<u64> = responses.iter().map(|r| r.amount_unlocked).collect();
        amounts.sort();
        assert_eq!(amounts, vec![1, 3]);

        let checker = compiled.claim_checker(compiled.params.root);
        for response in &responses {
            assert!(checker.check(response).unwrap().is_accepted());
        }

        assert!(matches!(
            compiled.proof_responses(&addr(7)),
            Err(SdkError::ClaimantNotFound(_))
        ));
    }

    #[test]
    fn test_compile_from_claim_rows_matches() {
        let text = allocation_text(&[(addr(3), "4"), (addr(1), "1"), (addr(2), "2")]);
        let spec = AirdropSpec::new("rows", addr(9), 2);
        let compiled = compile_airdrop(&spec, text.as_bytes(), NOW).unwrap();

        let rebuilt = compile_from_claim_rows(&spec, compiled.rows.clone(), NOW).unwrap();
        assert_eq!(rebuilt.params, compiled.params);
        assert_eq!(tree_from_claim_rows(&compiled.rows).unwrap().root(), compiled.tree.root());
    }

    #[test]
    fn test_all_proof_responses() {
        let text = allocation_text(&[(addr(2), "2"), (addr(1), "1"), (addr(2), "5")]);
        let spec = AirdropSpec::new("all", addr(9), 0);
        let compiled = compile_airdrop(&spec, text.as_bytes(), NOW).unwrap();

        let responses = compiled.all_proof_responses().unwrap();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0].claimant, addr(1));
        for response in &responses {
            let leaf = response.leaf().unwrap();
            assert!(compiled.tree.verify(&leaf, &response.claim_proof()));
        }
    }

    #[test]
    fn test_summary() {
        let text = allocation_text(&[(addr(1), "1.25")]);
        let mint = "So11111111111111111111111111111111111111112".parse().unwrap();
        let spec = AirdropSpec::new("native", mint, 9);
        let summary = compile_airdrop(&spec, text.as_bytes(), NOW).unwrap().summary();

        assert!(summary.native);
        assert_eq!(summary.human_total, "1.25");
        assert_eq!(summary.recipients, 1);
        assert_eq!(summary.depth, 0);
    }
}
