//! Poseidon hash function for BN254.
//!
//! Native and in-circuit Poseidon over arkworks' sponge, sharing one
//! configuration so both sides always agree.

mod config;
mod gadgets;
mod native;


pub use config::{poseidon_config, ALPHA, CAPACITY, FULL_ROUNDS, PARTIAL_ROUNDS, RATE, WIDTH};
pub use gadgets::poseidon_hash_three_var;
pub use native::poseidon_hash_three;
