use crate::{
    hasher::{hash_pair, Hash},
    leaf::ClaimLeaf,
};

/// Inclusion proof for one leaf of a claim tree: sibling digests, leaf-to-root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimProof(pub Vec<Hash>);

impl ClaimProof {
    pub fn new(proof: Vec<Hash>) -> Self {
        Self(proof)
    }

    /// Get proof elements as slice
    pub fn as_slice(&self) -> &[Hash] {
        &self.0
    }

    /// Get number of proof elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if proof is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume wrapper and return inner Vec
    pub fn into_inner(self) -> Vec<Hash> {
        self.0
    }

    /// Root reached by folding this proof onto `leaf_hash`.
    pub fn compute_root(&self, leaf_hash: &Hash) -> Hash {
        compute_root(&self.0, leaf_hash)
    }

    /// Verify this proof for `leaf` against `root`.
    pub fn verify(&self, root: &Hash, leaf: &ClaimLeaf) -> bool {
        verify_proof(&self.0, &leaf.to_hash(), root)
    }
}

impl From<Vec<Hash>> for ClaimProof {
    fn from(proof: Vec<Hash>) -> Self {
        Self(proof)
    }
}

/// Fold a proof onto a leaf digest.
///
/// Each step combines the running hash with the next sibling through
/// [`hash_pair`], smaller digest first. The sibling's side is never needed.
pub fn compute_root(proof: &[Hash], leaf_hash: &Hash) -> Hash {
    proof
        .iter()
        .fold(*leaf_hash, |computed, sibling| hash_pair(&computed, sibling))
}

/// Check a proof against an expected root.
///
/// A mismatch is an expected outcome (forged or stale claim), so this
/// returns `false` instead of an error.
pub fn verify_proof(proof: &[Hash], leaf_hash: &Hash, root: &Hash) -> bool {
    compute_root(proof, leaf_hash) == *root
}

/// Verify a proof against a root and leaf data.
/// This is the same computation the distributor program performs on claim.
pub fn verify_claim_proof(proof: &[Hash], root: &Hash, leaf: &ClaimLeaf) -> bool {
    verify_proof(proof, &leaf.to_hash(), root)
}

/// Batch verify multiple proofs against the same root
pub fn batch_verify_proofs(proofs: &[(&[Hash], &ClaimLeaf)], root: &Hash) -> Vec<bool> {
    proofs
        .iter()
        .map(|(proof, leaf)| verify_claim_proof(proof, root, leaf))
        .collect()
}
