//! In-circuit SMT verification and state-transition gadgets.
//!
//! Each gadget mirrors its native counterpart in `ops`/`climb` and produces
//! the same roots. Branches of the native code become selections: both sides
//! are constrained and the zero checks pick the result.

use ark_bn254::Fr;
use ark_r1cs_std::{boolean::Boolean, fields::fp::FpVar, prelude::*};
use ark_relations::r1cs::{ConstraintSystemRef, SynthesisError};

use super::entry::Entry;
use super::hasher::{LEAF_TAG, NODE_TAG};
use super::path::{SiblingPath, TREE_DEPTH};
use crate::poseidon::poseidon_hash_three_var;

/// Circuit variable representation of an entry.
#[derive(Clone)]
pub struct EntryVar {
    pub key: FpVar<Fr>,
    pub value: FpVar<Fr>,
}

impl EntryVar {
    pub fn new(key: FpVar<Fr>, value: FpVar<Fr>) -> Self {
        Self { key, value }
    }

    /// Allocate both fields as witnesses.
    pub fn new_witness(cs: ConstraintSystemRef<Fr>, entry: &Entry) -> Result<Self, SynthesisError> {
        let key = FpVar::new_witness(cs.clone(), || Ok(entry.key))?;
        let value = FpVar::new_witness(cs, || Ok(entry.value))?;
        Ok(Self { key, value })
    }
}

/// A non-membership witness guarded by a flag.
///
/// When `is_some` is false the entry is ignored and the proof is a
/// membership proof.
#[derive(Clone)]
pub struct MatchingEntryVar {
    pub is_some: Boolean<Fr>,
    pub entry: EntryVar,
}

/// Circuit variable representation of a sibling path.
#[derive(Clone)]
pub struct SiblingPathVar {
    siblings: Vec<FpVar<Fr>>,
}

impl SiblingPathVar {
    /// Allocate every level as a witness.
    pub fn new_witness(
        cs: ConstraintSystemRef<Fr>,
        siblings: &SiblingPath,
    ) -> Result<Self, SynthesisError> {
        let siblings = siblings
            .iter()
            .map(|sibling| FpVar::new_witness(cs.clone(), || Ok(*sibling)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { siblings })
    }

    pub fn siblings(&self) -> &[FpVar<Fr>] {
        &self.siblings
    }
}

/// Domain-separated hash in-circuit; the tag is a circuit constant.
pub fn hash_var(
    cs: ConstraintSystemRef<Fr>,
    a: &FpVar<Fr>,
    b: &FpVar<Fr>,
    is_leaf: bool,
) -> Result<FpVar<Fr>, SynthesisError> {
    let tag = FpVar::constant(Fr::from(if is_leaf { LEAF_TAG } else { NODE_TAG }));
    poseidon_hash_three_var(cs, a, b, &tag)
}

/// Branch decisions for a key, `path[level]` = key bit `TREE_DEPTH - 1 - level`.
///
/// The decomposition is canonical (checked against the modulus), so a prover
/// cannot pick an aliased bit pattern. Bits above the field size are constant
/// false.
pub fn key_to_path_var(key: &FpVar<Fr>) -> Result<Vec<Boolean<Fr>>, SynthesisError> {
    let bits = key.to_bits_le()?;
    Ok((0..TREE_DEPTH)
        .map(|level| {
            bits.get(TREE_DEPTH - 1 - level)
                .cloned()
                .unwrap_or(Boolean::constant(false))
        })
        .collect())
}

/// Parent of `node` and a non-zero `sibling`; an absent node collapses onto the sibling.
fn join_var(
    cs: ConstraintSystemRef<Fr>,
    node: &FpVar<Fr>,
    sibling: &FpVar<Fr>,
    is_right: &Boolean<Fr>,
) -> Result<FpVar<Fr>, SynthesisError> {
    let node_is_zero = node.is_eq(&FpVar::zero())?;
    let left = is_right.select(sibling, node)?;
    let right = is_right.select(node, sibling)?;
    let hashed = hash_var(cs, &left, &right, false)?;
    node_is_zero.select(sibling, &hashed)
}

/// Recompute the root reached from `start` along `path`.
pub fn climb_var(
    cs: ConstraintSystemRef<Fr>,
    start: &FpVar<Fr>,
    siblings: &SiblingPathVar,
    path: &[Boolean<Fr>],
) -> Result<FpVar<Fr>, SynthesisError> {
    let mut node = start.clone();

    for (sibling, is_right) in siblings.siblings.iter().zip(path.iter()) {
        let sibling_is_zero = sibling.is_eq(&FpVar::zero())?;
        let joined = join_var(cs.clone(), &node, sibling, is_right)?;
        node = sibling_is_zero.select(&node, &joined)?;
    }

    Ok(node)
}

/// Leaf digest plus the absent and present roots for `entry`.
fn climb_both_var(
    cs: ConstraintSystemRef<Fr>,
    entry: &EntryVar,
    siblings: &SiblingPathVar,
) -> Result<(FpVar<Fr>, FpVar<Fr>, FpVar<Fr>), SynthesisError> {
    let path = key_to_path_var(&entry.key)?;
    let leaf = hash_var(cs.clone(), &entry.key, &entry.value, true)?;
    let absent = climb_var(cs.clone(), &FpVar::zero(), siblings, &path)?;
    let present = climb_var(cs, &leaf, siblings, &path)?;
    Ok((leaf, absent, present))
}

/// Returns `(root_absent, root_present)` for `entry`.
pub fn two_root_climb_var(
    cs: ConstraintSystemRef<Fr>,
    entry: &EntryVar,
    siblings: &SiblingPathVar,
) -> Result<(FpVar<Fr>, FpVar<Fr>), SynthesisError> {
    let (_, absent, present) = climb_both_var(cs, entry, siblings)?;
    Ok((absent, present))
}

/// Enforce membership of `entry`, or its non-membership when `matching.is_some`.
pub fn verify_var(
    cs: ConstraintSystemRef<Fr>,
    root: &FpVar<Fr>,
    entry: &EntryVar,
    matching: &MatchingEntryVar,
    siblings: &SiblingPathVar,
) -> Result<(), SynthesisError> {
    entry.key.enforce_not_equal(&FpVar::zero())?;
    matching
        .entry
        .key
        .conditional_enforce_not_equal(&entry.key, &matching.is_some)?;
    matching
        .entry
        .key
        .conditional_enforce_not_equal(&FpVar::zero(), &matching.is_some)?;

    let path = key_to_path_var(&entry.key)?;
    let own_leaf = hash_var(cs.clone(), &entry.key, &entry.value, true)?;
    let matching_leaf = hash_var(
        cs.clone(),
        &matching.entry.key,
        &matching.entry.value,
        true,
    )?;
    let start = matching.is_some.select(&matching_leaf, &own_leaf)?;

    let computed = climb_var(cs, &start, siblings, &path)?;
    computed.enforce_equal(root)
}

/// Enforce that `entry` was absent under `old_root` and return the new root.
///
/// An `old_root` of zero is the empty tree: the new root is the leaf digest
/// and the siblings are not consulted.
pub fn add_var(
    cs: ConstraintSystemRef<Fr>,
    old_root: &FpVar<Fr>,
    entry: &EntryVar,
    siblings: &SiblingPathVar,
) -> Result<FpVar<Fr>, SynthesisError> {
    entry.key.enforce_not_equal(&FpVar::zero())?;

    let (leaf, absent, present) = climb_both_var(cs, entry, siblings)?;
    let tree_was_empty = old_root.is_eq(&FpVar::zero())?;
    absent.conditional_enforce_equal(old_root, &tree_was_empty.not())?;

    tree_was_empty.select(&leaf, &present)
}

/// Enforce that `entry` is present under `old_root` and return the root without it.
pub fn delete_var(
    cs: ConstraintSystemRef<Fr>,
    old_root: &FpVar<Fr>,
    entry: &EntryVar,
    siblings: &SiblingPathVar,
) -> Result<FpVar<Fr>, SynthesisError> {
    entry.key.enforce_not_equal(&FpVar::zero())?;

    let (absent, present) = two_root_climb_var(cs, entry, siblings)?;
    present.enforce_equal(old_root)?;

    Ok(absent)
}

/// Enforce that `old_entry` is present under `old_root` and return the root
/// after its value becomes `new_value`.
pub fn update_var(
    cs: ConstraintSystemRef<Fr>,
    old_root: &FpVar<Fr>,
    old_entry: &EntryVar,
    new_value: &FpVar<Fr>,
    siblings: &SiblingPathVar,
) -> Result<FpVar<Fr>, SynthesisError> {
    old_entry.key.enforce_not_equal(&FpVar::zero())?;

    let path = key_to_path_var(&old_entry.key)?;
    let mut old_node = hash_var(cs.clone(), &old_entry.key, &old_entry.value, true)?;
    let mut new_node = hash_var(cs.clone(), &old_entry.key, new_value, true)?;

    for (sibling, is_right) in siblings.siblings.iter().zip(path.iter()) {
        let sibling_is_zero = sibling.is_eq(&FpVar::zero())?;
        let old_joined = join_var(cs.clone(), &old_node, sibling, is_right)?;
        let new_joined = join_var(cs.clone(), &new_node, sibling, is_right)?;
        old_node = sibling_is_zero.select(&old_node, &old_joined)?;
        new_node = sibling_is_zero.select(&new_node, &new_joined)?;
    }

    old_node.enforce_equal(old_root)?;
    Ok(new_node)
}
