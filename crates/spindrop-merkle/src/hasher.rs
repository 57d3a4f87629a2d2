use rs_merkle::Hasher;
use sha3::{Digest, Keccak256};

/// 32-byte digest used for leaves, internal nodes and roots.
pub type Hash = [u8; 32];

/// Keccak-256 over the concatenation of `parts`.
pub fn keccak256(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Parent of two sibling digests.
///
/// The numerically smaller digest (big-endian, i.e. lexicographic byte order)
/// is hashed first, so `hash_pair(a, b) == hash_pair(b, a)`. Tree building and
/// proof verification both go through this function; the on-chain verifier
/// applies the same rule.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    if a <= b {
        keccak256(&[a.as_slice(), b.as_slice()])
    } else {
        keccak256(&[b.as_slice(), a.as_slice()])
    }
}

/// Merkle hasher for Spindrop claim trees.
///
/// ## Hashing Scheme
///
/// - **Leaf nodes**: `Keccak256(claimant || amount_le)`, the 40-byte leaf encoding
/// - **Internal nodes**: `Keccak256(min(left, right) || max(left, right))`
/// - **Odd node**: a layer's trailing node without a sibling is carried into the
///   parent layer unchanged
///
/// No domain-separation prefixes are used: the layout must match the
/// distributor program byte for byte.
///
/// Implementing [`rs_merkle::Hasher`] lets an `rs_merkle::MerkleTree` built over
/// the same leaves serve as a reference for [`crate::AirdropTree`].
#[derive(Clone, Debug)]
pub struct AirdropHasher;

impl Hasher for AirdropHasher {
    type Hash = Hash;

    fn hash(data: &[u8]) -> Hash {
        keccak256(&[data])
    }

    fn concat_and_hash(left: &Hash, right: Option<&Hash>) -> Hash {
        match right {
            Some(right) => hash_pair(left, right),
            // Carry forward, never self-hash
            None => *left,
        }
    }
}
