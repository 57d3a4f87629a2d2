use solana_sdk::pubkey::Pubkey;
use spindrop_csvs::Recipient;
use std::str::FromStr;

use crate::{
    errors::{MerkleError, MerkleResult},
    hasher::{keccak256, Hash},
};

/// Length of the leaf encoding: 32 address bytes followed by an 8-byte amount.
pub const LEAF_ENCODED_LEN: usize = 32 + 8;

/// The data hashed into one leaf of a claim tree.
///
/// Ordering compares the claimant's raw bytes first and the amount second,
/// which is the canonical leaf order of the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClaimLeaf {
    /// Account allowed to claim
    pub claimant: Pubkey,
    /// Allocation in the smallest token unit
    pub amount: u64,
}

impl ClaimLeaf {
    pub fn new(claimant: Pubkey, amount: u64) -> Self {
        Self { claimant, amount }
    }

    /// Decode a parsed recipient. A malformed address is an error; it cannot
    /// be ordered or encoded.
    pub fn from_recipient(recipient: &Recipient) -> MerkleResult<Self> {
        let claimant =
            Pubkey::from_str(&recipient.address).map_err(|e| MerkleError::InvalidAddress {
                address: recipient.address.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self::new(claimant, recipient.amount))
    }

    /// Wire encoding: `claimant (32 bytes) || amount (u64 little-endian)`.
    pub fn to_bytes(&self) -> [u8; LEAF_ENCODED_LEN] {
        let mut bytes = [0u8; LEAF_ENCODED_LEN];
        bytes[..32].copy_from_slice(self.claimant.as_ref());
        bytes[32..].copy_from_slice(&self.amount.to_le_bytes());
        bytes
    }

    pub fn to_hash(&self) -> Hash {
        hash_claim_leaf(self)
    }
}

/// Hashes a `ClaimLeaf` into its 32-byte leaf digest: `Keccak256(to_bytes())`.
pub fn hash_claim_leaf(leaf: &ClaimLeaf) -> Hash {
    keccak256(&[leaf.to_bytes().as_slice()])
}
