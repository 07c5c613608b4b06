//! Self-contained SMT proof bundle.
//!
//! This is the shape in which an external tree store hands over a sibling
//! path: the queried entry, an optional non-membership witness, the siblings
//! and the root they are claimed against.

use ark_bn254::Fr;
use serde::{Deserialize, Serialize};

use super::entry::Entry;
use super::hasher::{PoseidonHasher, SmtHasher};
use super::ops::SmtEngine;
use super::path::{populated_levels, SiblingPath};
use crate::error::SmtError;

/// A membership or non-membership proof for one entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtProof {
    pub entry: Entry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_entry: Option<Entry>,
    #[serde(with = "crate::field::serde_siblings")]
    pub siblings: SiblingPath,
    #[serde(with = "crate::field::serde_fr")]
    pub root: Fr,
}

impl SmtProof {
    /// Proof that `entry` is in the tree rooted at `root`.
    pub fn membership(entry: Entry, siblings: SiblingPath, root: Fr) -> Self {
        Self {
            entry,
            matching_entry: None,
            siblings,
            root,
        }
    }

    /// Proof that `entry.key` is absent, witnessed by `matching_entry`.
    pub fn non_membership(
        entry: Entry,
        matching_entry: Entry,
        siblings: SiblingPath,
        root: Fr,
    ) -> Self {
        Self {
            entry,
            matching_entry: Some(matching_entry),
            siblings,
            root,
        }
    }

    pub fn is_membership(&self) -> bool {
        self.matching_entry.is_none()
    }

    /// Number of levels carrying a real sibling.
    pub fn depth(&self) -> usize {
        populated_levels(&self.siblings)
    }

    /// Check the proof with the default hasher.
    pub fn verify(&self) -> Result<(), SmtError> {
        self.verify_with(&SmtEngine::<PoseidonHasher>::default())
    }

    pub fn verify_with<H: SmtHasher>(&self, engine: &SmtEngine<H>) -> Result<(), SmtError> {
        engine.verify(
            &self.entry,
            self.matching_entry.as_ref(),
            &self.siblings,
            self.root,
        )
    }
}
