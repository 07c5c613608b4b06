//! Sparse Merkle Tree verification and state transitions over BN254.
//!
//! This crate provides:
//! - Native SMT operations (`verify`, `add`, `delete`, `update`) that work
//!   from a claimed root and a sibling path, without storing the tree
//! - In-circuit gadgets mirroring each operation
//! - `MembershipCircuit`: Prove an entry is (or is not) in a tree
//! - `TransitionCircuit`: Prove a root change is a valid add, delete or update

pub mod error;
pub mod field;
pub mod membership;
pub mod poseidon;
pub mod smt;
pub mod transition;


pub use error::SmtError;
pub use field::{fr_to_decimal, parse_fr};
pub use membership::MembershipCircuit;
pub use poseidon::{poseidon_config, poseidon_hash_three};
pub use smt::{
    add, delete, update, verify, verify_batch, Entry, PoseidonHasher, SiblingPath, SmtEngine,
    SmtHasher, SmtProof, TREE_DEPTH,
};
pub use transition::{OpType, TransitionCircuit};
