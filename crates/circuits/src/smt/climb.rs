//! Root-climb engine.
//!
//! Every public operation reduces to one or two climbs from a leaf-level
//! value to the root. Levels whose sibling is zero are pruned from the real
//! tree shape and carry the running value through unchanged; an absent
//! running value (zero) next to a real sibling collapses onto that sibling.

use ark_bn254::Fr;
use ark_ff::Zero;

use super::entry::Entry;
use super::hasher::SmtHasher;
use super::path::{key_to_path, Path, SiblingPath};

/// Recompute the root reached from `start` along `path`.
pub fn climb<H: SmtHasher + ?Sized>(
    hasher: &H,
    start: Fr,
    siblings: &SiblingPath,
    path: &Path,
) -> Fr {
    let mut node = start;
    for (sibling, &is_right) in siblings.iter().zip(path.iter()) {
        if sibling.is_zero() {
            continue;
        }
        node = join(hasher, node, *sibling, is_right);
    }
    node
}

/// Climb from the absent sentinel and from the entry's leaf digest.
///
/// Returns `(root_absent, root_present)`.
pub fn two_root_climb<H: SmtHasher + ?Sized>(
    hasher: &H,
    entry: &Entry,
    siblings: &SiblingPath,
) -> (Fr, Fr) {
    let path = key_to_path(entry.key);
    let absent = climb(hasher, Fr::zero(), siblings, &path);
    let present = climb(hasher, hasher.hash_leaf(entry.key, entry.value), siblings, &path);
    (absent, present)
}

/// Climb two running values over the same siblings and path in one pass.
///
/// Used when two leaves share a key (and therefore a path), as in an update.
pub fn lockstep_climb<H: SmtHasher + ?Sized>(
    hasher: &H,
    starts: (Fr, Fr),
    siblings: &SiblingPath,
    path: &Path,
) -> (Fr, Fr) {
    let (mut first, mut second) = starts;
    for (sibling, &is_right) in siblings.iter().zip(path.iter()) {
        if sibling.is_zero() {
            continue;
        }
        first = join(hasher, first, *sibling, is_right);
        second = join(hasher, second, *sibling, is_right);
    }
    (first, second)
}

/// Parent of `node` and a non-zero `sibling`.
#[inline]
fn join<H: SmtHasher + ?Sized>(hasher: &H, node: Fr, sibling: Fr, is_right: bool) -> Fr {
    if node.is_zero() {
        sibling
    } else if is_right {
        hasher.hash_node(sibling, node)
    } else {
        hasher.hash_node(node, sibling)
    }
}
