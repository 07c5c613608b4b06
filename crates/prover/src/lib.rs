//! Proof generation library for Sparse Merkle Tree circuits.
//!
//! This crate provides utilities for:
//! - Trusted setup (generating proving and verifying keys)
//! - Proof generation for membership and state-transition circuits
//! - Local proof verification

pub mod prove;
pub mod setup;
pub mod verify;

pub use prove::{
    prove_add, prove_delete, prove_membership, prove_update, ProofWithInputs, ProveError,
    TransitionResult,
};
pub use setup::{
    keys_dir, setup_all_circuits, setup_membership, setup_transition, CircuitKeyPair, CircuitKeys,
    SetupError,
};
pub use smt_circuits::OpType;
pub use verify::{verify_membership, verify_transition, verify_with_inputs, VerifyError};
