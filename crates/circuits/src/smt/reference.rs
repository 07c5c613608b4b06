//! In-memory compressed tree used by tests as an honest sibling-path source.
//!
//! A subtree holding no entries is zero, one entry is that entry's leaf
//! digest, and two or more split on key bit `depth` (counted from the root,
//! least significant bit first). A side that is empty promotes the other side
//! unchanged, which is exactly the shape the climb engine reconstructs.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField, Zero};

use super::entry::Entry;
use super::hasher::{PoseidonHasher, SmtHasher};
use super::path::{empty_siblings, SiblingPath, TREE_DEPTH};
use super::proof::SmtProof;

#[derive(Clone, Debug, Default)]
pub(crate) struct ReferenceTree {
    entries: Vec<Entry>,
}

impl ReferenceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[Entry]) -> Self {
        let mut tree = Self::new();
        for entry in entries {
            tree.insert(*entry);
        }
        tree
    }

    pub fn insert(&mut self, entry: Entry) {
        self.remove(entry.key);
        self.entries.push(entry);
    }

    pub fn remove(&mut self, key: Fr) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.key == key)?;
        Some(self.entries.swap_remove(index))
    }

    pub fn get(&self, key: Fr) -> Option<Entry> {
        self.entries.iter().copied().find(|entry| entry.key == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn root(&self) -> Fr {
        subtree_root(&self.entries, 0)
    }

    /// Siblings of `key` in this tree, plus whatever is left where the walk stopped.
    ///
    /// For a stored key the remainder is its own entry. For an absent key it
    /// is the single entry occupying the key's position, or nothing.
    pub fn siblings(&self, key: Fr) -> (SiblingPath, Vec<Entry>) {
        let mut siblings = empty_siblings();
        let mut current = self.entries.clone();
        let mut depth = 0;

        while current.len() > 1 {
            let (own, other): (Vec<Entry>, Vec<Entry>) = current
                .into_iter()
                .partition(|entry| bit(entry.key, depth) == bit(key, depth));
            siblings[TREE_DEPTH - 1 - depth] = subtree_root(&other, depth + 1);
            current = own;
            depth += 1;
        }

        (siblings, current)
    }

    /// Siblings `add` needs for `entry`: its path in the tree after insertion.
    pub fn insertion_siblings(&self, entry: Entry) -> SiblingPath {
        let mut after = self.clone();
        after.insert(entry);
        after.siblings(entry.key).0
    }

    /// Membership proof for a stored key, or a non-membership proof witnessed
    /// by the occupant of its position. `None` when that position is empty.
    pub fn proof(&self, entry: Entry) -> Option<SmtProof> {
        let root = self.root();
        let (siblings, remainder) = self.siblings(entry.key);
        match remainder.first() {
            Some(found) if found.key == entry.key => {
                Some(SmtProof::membership(*found, siblings, root))
            }
            Some(found) => Some(SmtProof::non_membership(entry, *found, siblings, root)),
            None => None,
        }
    }
}

fn bit(key: Fr, depth: usize) -> bool {
    key.into_bigint().get_bit(depth)
}

fn subtree_root(entries: &[Entry], depth: usize) -> Fr {
    match entries {
        [] => Fr::zero(),
        [only] => PoseidonHasher.hash_leaf(only.key, only.value),
        _ => {
            let (left, right): (Vec<Entry>, Vec<Entry>) =
                entries.iter().copied().partition(|entry| !bit(entry.key, depth));
            let left = subtree_root(&left, depth + 1);
            let right = subtree_root(&right, depth + 1);
            if left.is_zero() {
                right
            } else if right.is_zero() {
                left
            } else {
                PoseidonHasher.hash_node(left, right)
            }
        }
    }
}
