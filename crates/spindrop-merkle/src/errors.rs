use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

pub type MerkleResult<T> = Result<T, MerkleError>;

/// Errors raised while building or querying a claim tree.
///
/// A proof that fails to verify is not an error; verification returns `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Cannot build a claim tree from an empty recipient set")]
    EmptyTree,

    #[error("Invalid recipient address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("Leaf index {index} out of range for tree with {len} leaves")]
    LeafIndexOutOfRange { index: usize, len: usize },

    #[error("Claimant {0} not found in tree")]
    ClaimantNotFound(Pubkey),

    #[error("Leaf for claimant {claimant} with amount {amount} not found in tree")]
    LeafNotFound { claimant: Pubkey, amount: u64 },
}
