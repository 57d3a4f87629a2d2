/*!
# Claim Checking

The proof-retrieval payload served for a claimant, and the checks run
before a claim is submitted.

Two failure modes are kept apart:

- **Rejected claim**: the proof does not lead to the published root for the
  claimed amounts. A normal outcome for forged or stale claims, reported as
  [`ClaimVerdict::Rejected`].
- **Deployment mismatch**: the proof is consistent with the tree rebuilt
  locally from the same rows, yet the published root differs. The leaf
  encoding or tree rules disagree with the distributor program; this is
  reported as [`SdkError::RootMismatch`] and logged with the root, leaf and
  proof.
*/

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use spindrop_merkle::{verify_proof, AirdropTree, ClaimLeaf, ClaimProof, Hash};
use tracing::{debug, error};

use crate::{
    errors::{SdkError, SdkResult},
    serde_helpers::{hex_hashes, pubkey_string},
};

/// Proof payload for one allocation of one claimant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
    #[serde(with = "pubkey_string")]
    pub claimant: Pubkey,
    /// Sibling digests, leaf-to-root
    #[serde(with = "hex_hashes")]
    pub proof: Vec<Hash>,
    pub amount_unlocked: u64,
    pub amount_locked: u64,
}

impl ProofResponse {
    /// Leaf the distributor re-derives from the claimed amounts.
    pub fn leaf(&self) -> SdkResult<ClaimLeaf> {
        let amount = self
            .amount_unlocked
            .checked_add(self.amount_locked)
            .ok_or(SdkError::AmountOverflow)?;
        Ok(ClaimLeaf::new(self.claimant, amount))
    }

    pub fn claim_proof(&self) -> ClaimProof {
        ClaimProof::new(self.proof.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimVerdict {
    Accepted,
    Rejected,
}

impl ClaimVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ClaimVerdict::Accepted)
    }
}

/// Check a claim against a published root only, as the distributor does.
pub fn verify_claim(published_root: &Hash, response: &ProofResponse) -> SdkResult<ClaimVerdict> {
    let leaf = response.leaf()?;
    if verify_proof(&response.proof, &leaf.to_hash(), published_root) {
        Ok(ClaimVerdict::Accepted)
    } else {
        Ok(ClaimVerdict::Rejected)
    }
}

/// Checks claims for one airdrop against its published root, using the
/// locally rebuilt tree to tell rejected claims from deployment mismatches.
pub struct ClaimChecker<'a> {
    tree: &'a AirdropTree,
    published_root: Hash,
}

impl<'a> ClaimChecker<'a> {
    pub fn new(tree: &'a AirdropTree, published_root: Hash) -> Self {
        Self {
            tree,
            published_root,
        }
    }

    /// Compare the published root with the locally computed one.
    pub fn check_commitment(&self) -> SdkResult<()> {
        if self.tree.root() == self.published_root {
            return Ok(());
        }

        error!(
            published_root = %hex::encode(self.published_root),
            computed_root = %hex::encode(self.tree.root()),
            leaves = self.tree.len(),
            "published root does not match rebuilt claim tree"
        );
        Err(self.root_mismatch())
    }

    pub fn check(&self, response: &ProofResponse) -> SdkResult<ClaimVerdict> {
        let leaf = response.leaf()?;
        let leaf_hash = leaf.to_hash();

        if verify_proof(&response.proof, &leaf_hash, &self.published_root) {
            debug!(claimant = %leaf.claimant, amount = leaf.amount, "claim accepted");
            return Ok(ClaimVerdict::Accepted);
        }

        if self.tree.root() != self.published_root
            && verify_proof(&response.proof, &leaf_hash, &self.tree.root())
        {
            error!(
                published_root = %hex::encode(self.published_root),
                computed_root = %hex::encode(self.tree.root()),
                leaf = %hex::encode(leaf_hash),
                claimant = %leaf.claimant,
                amount = leaf.amount,
                proof = ?response.proof.iter().map(hex::encode).collect::<Vec<_>>(),
                "well-formed proof rejected by published root; encoding mismatch with distributor"
            );
            return Err(self.root_mismatch());
        }

        debug!(claimant = %leaf.claimant, amount = leaf.amount, "claim rejected");
        Ok(ClaimVerdict::Rejected)
    }

    fn root_mismatch(&self) -> SdkError {
        SdkError::RootMismatch {
            published: hex::encode(self.published_root),
            computed: hex::encode(self.tree.root()),
        }
    }
}
