//! Public SMT operations: `verify`, `add`, `delete`, `update`.
//!
//! Each call is a pure function of (claimed root, entry, sibling path). It
//! either validates the claim or derives a new root; on a mismatch it fails
//! with [`SmtError::RootMismatch`] and nothing else happens.

use ark_bn254::Fr;
use ark_ff::Zero;
use tracing::debug;

use super::climb::{climb, lockstep_climb, two_root_climb};
use super::entry::Entry;
use super::hasher::{PoseidonHasher, SmtHasher};
use super::path::SiblingPath;
use crate::error::{ensure_root, SmtError};

/// Stateless SMT operations over a pluggable hasher.
#[derive(Clone, Debug, Default)]
pub struct SmtEngine<H = PoseidonHasher> {
    hasher: H,
}

impl<H: SmtHasher> SmtEngine<H> {
    pub fn new(hasher: H) -> Self {
        Self { hasher }
    }

    /// Prove membership (`matching_entry == None`) or non-membership of `entry`.
    ///
    /// A non-membership witness is a real leaf whose key differs from the
    /// queried key but occupies the queried key's position; the climb runs
    /// from that leaf along the queried key's path.
    pub fn verify(
        &self,
        entry: &Entry,
        matching_entry: Option<&Entry>,
        siblings: &SiblingPath,
        root: Fr,
    ) -> Result<(), SmtError> {
        entry.validate()?;

        let start = match matching_entry {
            None => self.hasher.hash_leaf(entry.key, entry.value),
            Some(matching) => {
                matching.validate()?;
                if matching.key == entry.key {
                    return Err(SmtError::invalid(
                        "matching entry must have a different key than the queried entry",
                    ));
                }
                self.hasher.hash_leaf(matching.key, matching.value)
            }
        };

        let computed = climb(&self.hasher, start, siblings, &entry.path());
        ensure_root(root, computed)?;

        debug!(
            key = %entry.key,
            membership = matching_entry.is_none(),
            "verified SMT proof"
        );
        Ok(())
    }

    /// Insert a key that is absent under `old_root`.
    pub fn add(
        &self,
        new_entry: &Entry,
        old_root: Fr,
        siblings: &SiblingPath,
    ) -> Result<Fr, SmtError> {
        new_entry.validate()?;

        if old_root.is_zero() {
            let new_root = self.hasher.hash_leaf(new_entry.key, new_entry.value);
            debug!(key = %new_entry.key, %new_root, "added first entry");
            return Ok(new_root);
        }

        let (absent, present) = two_root_climb(&self.hasher, new_entry, siblings);
        ensure_root(old_root, absent)?;

        debug!(key = %new_entry.key, %old_root, new_root = %present, "added entry");
        Ok(present)
    }

    /// Remove a key that is present under `old_root`.
    pub fn delete(
        &self,
        entry: &Entry,
        old_root: Fr,
        siblings: &SiblingPath,
    ) -> Result<Fr, SmtError> {
        entry.validate()?;

        let (absent, present) = two_root_climb(&self.hasher, entry, siblings);
        ensure_root(old_root, present)?;

        debug!(key = %entry.key, %old_root, new_root = %absent, "deleted entry");
        Ok(absent)
    }

    /// Replace the value of a key that is present under `old_root`.
    pub fn update(
        &self,
        new_value: Fr,
        old_entry: &Entry,
        old_root: Fr,
        siblings: &SiblingPath,
    ) -> Result<Fr, SmtError> {
        old_entry.validate()?;

        let old_leaf = self.hasher.hash_leaf(old_entry.key, old_entry.value);
        let new_leaf = self.hasher.hash_leaf(old_entry.key, new_value);
        let (old_parent, new_parent) =
            lockstep_climb(&self.hasher, (old_leaf, new_leaf), siblings, &old_entry.path());
        ensure_root(old_root, old_parent)?;

        debug!(key = %old_entry.key, %old_root, new_root = %new_parent, "updated entry");
        Ok(new_parent)
    }
}

/// [`SmtEngine::verify`] with the default Poseidon hasher.
pub fn verify(
    entry: &Entry,
    matching_entry: Option<&Entry>,
    siblings: &SiblingPath,
    root: Fr,
) -> Result<(), SmtError> {
    SmtEngine::<PoseidonHasher>::default().verify(entry, matching_entry, siblings, root)
}

/// [`SmtEngine::add`] with the default Poseidon hasher.
pub fn add(new_entry: &Entry, old_root: Fr, siblings: &SiblingPath) -> Result<Fr, SmtError> {
    SmtEngine::<PoseidonHasher>::default().add(new_entry, old_root, siblings)
}

/// [`SmtEngine::delete`] with the default Poseidon hasher.
pub fn delete(entry: &Entry, old_root: Fr, siblings: &SiblingPath) -> Result<Fr, SmtError> {
    SmtEngine::<PoseidonHasher>::default().delete(entry, old_root, siblings)
}

/// [`SmtEngine::update`] with the default Poseidon hasher.
pub fn update(
    new_value: Fr,
    old_entry: &Entry,
    old_root: Fr,
    siblings: &SiblingPath,
) -> Result<Fr, SmtError> {
    SmtEngine::<PoseidonHasher>::default().update(new_value, old_entry, old_root, siblings)
}
