//! Key-to-path derivation and sibling-path helpers.
//!
//! Level 0 is adjacent to the leaves, level `TREE_DEPTH - 1` to the root.
//! `path[level]` is bit `TREE_DEPTH - 1 - level` of the key, so the
//! root-adjacent level branches on the key's least significant bit and the
//! path as a whole reads as the key's 256-bit big-endian bit string. This
//! ordering is a protocol constant: changing it changes every root.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField, Zero};

use crate::error::SmtError;

/// Number of levels between a leaf and the root.
pub const TREE_DEPTH: usize = 256;

/// Branch decisions per level; `true` means the running node is a right child.
pub type Path = [bool; TREE_DEPTH];

/// Co-path digests per level; zero means "no real sibling at this level".
pub type SiblingPath = [Fr; TREE_DEPTH];

/// Expand a key into its branch decisions.
pub fn key_to_path(key: Fr) -> Path {
    let bits = key.into_bigint();
    std::array::from_fn(|level| bits.get_bit(TREE_DEPTH - 1 - level))
}

/// A sibling path with no real siblings (a single-leaf or empty tree).
pub fn empty_siblings() -> SiblingPath {
    [Fr::zero(); TREE_DEPTH]
}

/// Build a sibling path from its populated `(level, digest)` pairs.
pub fn sparse_siblings(levels: &[(usize, Fr)]) -> Result<SiblingPath, SmtError> {
    let mut siblings = empty_siblings();
    let mut seen = [false; TREE_DEPTH];
    for &(level, digest) in levels {
        if level >= TREE_DEPTH {
            return Err(SmtError::invalid(format!(
                "sibling level {level} is outside 0..{TREE_DEPTH}"
            )));
        }
        if seen[level] {
            return Err(SmtError::invalid(format!("sibling level {level} given twice")));
        }
        seen[level] = true;
        siblings[level] = digest;
    }
    Ok(siblings)
}

/// Number of levels that carry a real sibling.
pub fn populated_levels(siblings: &SiblingPath) -> usize {
    siblings.iter().filter(|sibling| !sibling.is_zero()).count()
}
