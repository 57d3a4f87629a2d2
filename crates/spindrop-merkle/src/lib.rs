//! Merkle commitment for Spindrop airdrops.
//!
//! A recipient list is committed to a single 32-byte root. Each recipient
//! can later prove their allocation with a short sibling path that the
//! distributor program checks using exactly the rules in this crate:
//! leaf encoding ([`ClaimLeaf::to_bytes`]), pair hashing ([`hash_pair`]) and
//! proof folding ([`verify_proof`]).

pub mod errors;
pub mod hasher;
pub mod leaf;
pub mod proof;
pub mod tree;

pub use errors::{MerkleError, MerkleResult};
pub use hasher::{hash_pair, keccak256, AirdropHasher, Hash};
pub use leaf::{hash_claim_leaf, ClaimLeaf, LEAF_ENCODED_LEN};
pub use proof::{batch_verify_proofs, compute_root, verify_claim_proof, verify_proof, ClaimProof};
pub use tree::{build_layers, AirdropTree};
