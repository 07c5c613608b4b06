//! Domain-separated compression used for every SMT digest.

use ark_bn254::Fr;

use crate::poseidon::poseidon_hash_three;

/// Domain tag mixed into leaf digests `H(key, value, 1)`.
pub const LEAF_TAG: u64 = 1;

/// Domain tag mixed into internal digests `H(left, right, 0)`.
pub const NODE_TAG: u64 = 0;

/// A deterministic, stateless two-to-one compression with leaf/node separation.
///
/// Implementations must never let a leaf digest collide with a node digest;
/// the default mixes the tag in as a third hash input.
pub trait SmtHasher {
    /// `H(a, b, tag)`: `(key, value)` when `is_leaf`, otherwise `(left, right)`.
    fn hash(&self, a: Fr, b: Fr, is_leaf: bool) -> Fr;

    fn hash_leaf(&self, key: Fr, value: Fr) -> Fr {
        self.hash(key, value, true)
    }

    fn hash_node(&self, left: Fr, right: Fr) -> Fr {
        self.hash(left, right, false)
    }
}

impl<H: SmtHasher + ?Sized> SmtHasher for &H {
    fn hash(&self, a: Fr, b: Fr, is_leaf: bool) -> Fr {
        (**self).hash(a, b, is_leaf)
    }
}

/// Poseidon (width 4) with the domain tag as the third absorbed element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoseidonHasher;

impl SmtHasher for PoseidonHasher {
    fn hash(&self, a: Fr, b: Fr, is_leaf: bool) -> Fr {
        let tag = if is_leaf { LEAF_TAG } else { NODE_TAG };
        poseidon_hash_three(a, b, Fr::from(tag))
    }
}
