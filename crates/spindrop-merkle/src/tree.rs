use rs_merkle::Hasher;
use solana_sdk::pubkey::Pubkey;
use spindrop_csvs::Recipient;
use tracing::debug;

use crate::{
    errors::{MerkleError, MerkleResult},
    hasher::{AirdropHasher, Hash},
    leaf::ClaimLeaf,
    proof::ClaimProof,
};

/// A frozen binary claim tree for one airdrop.
///
/// Leaves are kept in canonical order (claimant bytes, then amount), so the
/// root does not depend on the order recipients were supplied in. The tree
/// has no mutating operations; a new airdrop needs a new tree. Proof
/// generation only reads, so one tree can serve any number of threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AirdropTree {
    leaves: Vec<ClaimLeaf>,
    layers: Vec<Vec<Hash>>,
    root: Hash,
}

impl AirdropTree {
    /// Decode and commit a parsed recipient list.
    ///
    /// Fails on the first malformed address: dropping it would silently change
    /// the committed total.
    pub fn from_recipients(recipients: &[Recipient]) -> MerkleResult<Self> {
        let leaves = recipients
            .iter()
            .map(ClaimLeaf::from_recipient)
            .collect::<MerkleResult<Vec<_>>>()?;

        Self::from_leaves(leaves)
    }

    /// Build a tree from claim leaves in any order.
    pub fn from_leaves(mut leaves: Vec<ClaimLeaf>) -> MerkleResult<Self> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        leaves.sort();

        let leaf_hashes: Vec<Hash> = leaves.iter().map(ClaimLeaf::to_hash).collect();
        let layers = build_layers(leaf_hashes);
        let root = layers
            .last()
            .and_then(|layer| layer.first())
            .copied()
            .ok_or(MerkleError::EmptyTree)?;

        debug!(
            leaves = leaves.len(),
            depth = layers.len() - 1,
            "built claim tree"
        );

        Ok(Self {
            leaves,
            layers,
            root,
        })
    }

    /// The committed root
    pub fn root(&self) -> Hash {
        self.root
    }

    /// Leaves in canonical order; a leaf's position here is its leaf index
    pub fn leaves(&self) -> &[ClaimLeaf] {
        &self.leaves
    }

    /// All layers, leaf digests first, root layer last
    pub fn layers(&self) -> &[Vec<Hash>] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Always false: empty trees cannot be built
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Number of folding rounds between the leaves and the root,
    /// `ceil(log2(len))`. Upper bound on proof length.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Sum of all leaf amounts, `None` on overflow
    pub fn total_amount(&self) -> Option<u64> {
        self.leaves
            .iter()
            .try_fold(0u64, |total, leaf| total.checked_add(leaf.amount))
    }

    pub fn leaf(&self, index: usize) -> MerkleResult<&ClaimLeaf> {
        self.leaves.get(index).ok_or(MerkleError::LeafIndexOutOfRange {
            index,
            len: self.leaves.len(),
        })
    }

    /// Sibling path for the leaf at `index`, leaf-to-root.
    ///
    /// At each layer the sibling sits at `index ^ 1`. A node carried forward
    /// without a sibling contributes nothing for that layer.
    pub fn proof(&self, index: usize) -> MerkleResult<ClaimProof> {
        if index >= self.leaves.len() {
            return Err(MerkleError::LeafIndexOutOfRange {
                index,
                len: self.leaves.len(),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut current_index = index;

        for layer in self.layers.iter().take(self.depth()) {
            if let Some(sibling) = layer.get(current_index ^ 1) {
                siblings.push(*sibling);
            }
            current_index /= 2;
        }

        Ok(ClaimProof::new(siblings))
    }

    /// Position of an exact leaf. With duplicate leaves any matching
    /// position is returned; their proofs are interchangeable.
    pub fn position_of(&self, leaf: &ClaimLeaf) -> Option<usize> {
        self.leaves.binary_search(leaf).ok()
    }

    /// All leaf indices belonging to `claimant`, ascending by amount.
    pub fn indices_of(&self, claimant: &Pubkey) -> std::ops::Range<usize> {
        let start = self.leaves.partition_point(|leaf| leaf.claimant < *claimant);
        let end = self.leaves.partition_point(|leaf| leaf.claimant <= *claimant);
        start..end
    }

    pub fn proof_for_leaf(&self, leaf: &ClaimLeaf) -> MerkleResult<ClaimProof> {
        let index = self.position_of(leaf).ok_or(MerkleError::LeafNotFound {
            claimant: leaf.claimant,
            amount: leaf.amount,
        })?;
        self.proof(index)
    }

    /// Every allocation held by `claimant` with its proof.
    pub fn proofs_for_claimant(
        &self,
        claimant: &Pubkey,
    ) -> MerkleResult<Vec<(ClaimLeaf, ClaimProof)>> {
        let indices = self.indices_of(claimant);
        if indices.is_empty() {
            return Err(MerkleError::ClaimantNotFound(*claimant));
        }

        indices
            .map(|index| self.proof(index).map(|proof| (self.leaves[index], proof)))
            .collect()
    }

    /// Proofs for every leaf, in leaf order
    pub fn all_proofs(&self) -> Vec<ClaimProof> {
        (0..self.leaves.len())
            .filter_map(|index| self.proof(index).ok())
            .collect()
    }

    /// Verify a proof for `leaf` against this tree's root
    pub fn verify(&self, leaf: &ClaimLeaf, proof: &ClaimProof) -> bool {
        proof.verify(&self.root, leaf)
    }
}

/// Fold leaf digests into layers until a single root remains.
///
/// Adjacent nodes are paired in place (`0-1`, `2-3`, ...). A trailing
/// unpaired node moves up unchanged.
pub fn build_layers(leaf_hashes: Vec<Hash>) -> Vec<Vec<Hash>> {
    let mut layers = vec![leaf_hashes];

    while let Some(current) = layers.last().filter(|layer| layer.len() > 1) {
        let next: Vec<Hash> = current
            .chunks(2)
            .map(|pair| AirdropHasher::concat_and_hash(&pair[0], pair.get(1)))
            .collect();
        layers.push(next);
    }

    layers
}
