//! Fixed-depth Sparse Merkle Tree over BN254.
//!
//! This module provides:
//! - The domain-separated hash and the key-to-path mapping
//! - The root-climb engine and the `verify`/`add`/`delete`/`update` operations
//! - Proof bundles and batch verification
//! - In-circuit gadgets mirroring every native operation

mod batch;
mod climb;
mod entry;
mod gadgets;
mod hasher;
mod ops;
mod path;
mod proof;

#[cfg(test)]
mod reference;
#[cfg(test)]
mod tests;

pub use batch::{first_failure, verify_batch};
pub use climb::{climb, lockstep_climb, two_root_climb};
pub use entry::Entry;
pub use gadgets::{
    add_var, climb_var, delete_var, hash_var, key_to_path_var, two_root_climb_var, update_var,
    verify_var, EntryVar, MatchingEntryVar, SiblingPathVar,
};
pub use hasher::{PoseidonHasher, SmtHasher, LEAF_TAG, NODE_TAG};
pub use ops::{add, delete, update, verify, SmtEngine};
pub use path::{
    empty_siblings, key_to_path, populated_levels, sparse_siblings, Path, SiblingPath, TREE_DEPTH,
};
pub use proof::SmtProof;
