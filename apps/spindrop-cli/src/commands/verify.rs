use crate::error::{CliError, CliResult};
use spindrop_csvs::read_claim_rows_csv;
use spindrop_sdk::{
    serde_helpers::decode_hash, tree_from_claim_rows, verify_claim, ClaimChecker, ClaimVerdict,
    ProofResponse,
};
use std::fs::File;
use std::path::PathBuf;

/// Check a proof payload against a published root.
///
/// With `claims`, the rows behind the root are rebuilt locally so that an
/// encoding mismatch with the distributor is reported as such.
pub fn execute(proof: PathBuf, root: String, claims: Option<PathBuf>) -> CliResult<()> {
    let published_root = decode_hash(&root).map_err(CliError::InvalidHex)?;
    let response: ProofResponse = serde_json::from_reader(File::open(&proof)?)?;

    let verdict = match claims {
        Some(claims) => {
            let rows = read_claim_rows_csv(&claims)?;
            let tree = tree_from_claim_rows(&rows)?;
            ClaimChecker::new(&tree, published_root).check(&response)?
        }
        None => verify_claim(&published_root, &response)?,
    };

    match verdict {
        ClaimVerdict::Accepted => {
            println!(
                "✅ Claim for {} ({} unlocked, {} locked) verifies against {}",
                response.claimant,
                response.amount_unlocked,
                response.amount_locked,
                hex::encode(published_root)
            );
            Ok(())
        }
        ClaimVerdict::Rejected => Err(CliError::ClaimRejected(hex::encode(published_root))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spindrop_csvs::{write_claim_rows_csv, ClaimRow};
    use spindrop_sdk::{proof_responses, SdkError};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup(dir: &Path) -> (PathBuf, PathBuf, String) {
        let rows: Vec<ClaimRow> = [
            "So11111111111111111111111111111111111111112",
            "11111111111111111111111111111111",
            "SysvarC1ock11111111111111111111111111111111",
        ]
        .iter()
        .enumerate()
        .map(|(i, pubkey)| ClaimRow {
            pubkey: pubkey.to_string(),
            amount_unlocked: 0,
            amount_locked: (i as u64 + 1) * 100,
            category: "Staker".to_string(),
        })
        .collect();

        let claims = dir.join("claims.csv");
        write_claim_rows_csv(&claims, &rows).unwrap();

        let tree = tree_from_claim_rows(&rows).unwrap();
        let claimant = rows[1].pubkey.parse().unwrap();
        let response = proof_responses(&tree, &rows, &claimant).unwrap().remove(0);

        let proof = dir.join("proof.json");
        std::fs::write(&proof, serde_json::to_string(&response).unwrap()).unwrap();

        (claims, proof, hex::encode(tree.root()))
    }

    #[test]
    fn test_verify_accepts_and_rejects() {
        let dir = TempDir::new().unwrap();
        let (claims, proof, root) = setup(dir.path());

        execute(proof.clone(), root.clone(), None).unwrap();
        execute(proof.clone(), format!("0x{root}"), Some(claims)).unwrap();

        let wrong_root = "00".repeat(32);
        assert!(matches!(
            execute(proof, wrong_root, None),
            Err(CliError::ClaimRejected(_))
        ));
    }

    #[test]
    fn test_verify_reports_root_mismatch_with_claims() {
        let dir = TempDir::new().unwrap();
        let (claims, proof, _) = setup(dir.path());

        let result = execute(proof, "ab".repeat(32), Some(claims));
        assert!(matches!(
            result,
            Err(CliError::Sdk(SdkError::RootMismatch { .. }))
        ));
    }

    #[test]
    fn test_verify_bad_root_hex() {
        let dir = TempDir::new().unwrap();
        let (_, proof, _) = setup(dir.path());

        assert!(matches!(
            execute(proof, "xyz".to_string(), None),
            Err(CliError::InvalidHex(_))
        ));
    }
}
