//! Poseidon configuration for BN254.
//!
//! Width-4 permutation (rate 3, capacity 1) so that a node hash absorbs its two
//! operands and the leaf/node domain tag in a single permutation.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonConfig;
use ark_ff::{Field, PrimeField};
use sha2::{Digest, Sha256};

/// Number of field elements absorbed per permutation
pub const RATE: usize = 3;

/// Capacity elements (never written by absorb)
pub const CAPACITY: usize = 1;

/// State width
pub const WIDTH: usize = RATE + CAPACITY;

/// Number of full rounds (beginning + end)
pub const FULL_ROUNDS: usize = 8;

/// Number of partial rounds
pub const PARTIAL_ROUNDS: usize = 56;

/// S-box exponent
pub const ALPHA: u64 = 5;

/// Seed for round-constant derivation.
pub const ROUND_CONSTANT_DOMAIN: &[u8] = b"sparse-merkle-tree/poseidon-bn254/t4";

static CONFIG: OnceLock<PoseidonConfig<Fr>> = OnceLock::new();

/// Get the Poseidon configuration for the BN254 scalar field.
///
/// Parameters:
/// - Rate: 3, Capacity: 1
/// - Full rounds: 8 (4 at start, 4 at end)
/// - Partial rounds: 56
/// - Alpha: 5 (x^5 S-box)
///
/// Built on first use and shared afterwards.
pub fn poseidon_config() -> &'static PoseidonConfig<Fr> {
    CONFIG.get_or_init(|| PoseidonConfig {
        full_rounds: FULL_ROUNDS,
        partial_rounds: PARTIAL_ROUNDS,
        alpha: ALPHA,
        ark: round_constants(),
        mds: cauchy_mds(),
        rate: RATE,
        capacity: CAPACITY,
    })
}

/// Round constants: `SHA-256(domain || be32(round) || be32(column)) mod p`.
fn round_constants() -> Vec<Vec<Fr>> {
    (0..FULL_ROUNDS + PARTIAL_ROUNDS)
        .map(|round| {
            (0..WIDTH)
                .map(|column| {
                    let mut hasher = Sha256::new();
                    hasher.update(ROUND_CONSTANT_DOMAIN);
                    hasher.update((round as u32).to_be_bytes());
                    hasher.update((column as u32).to_be_bytes());
                    Fr::from_be_bytes_mod_order(&hasher.finalize())
                })
                .collect()
        })
        .collect()
}

/// Cauchy matrix `m[i][j] = 1 / (x_i + y_j)` with `x_i = i`, `y_j = WIDTH + j`.
///
/// The `x` and `y` sets are disjoint and every sum lies in `WIDTH..3 * WIDTH`,
/// so each entry is invertible and every square submatrix is non-singular.
fn cauchy_mds() -> Vec<Vec<Fr>> {
    (0..WIDTH)
        .map(|i| {
            (0..WIDTH)
                .map(|j| {
                    Fr::from((i + WIDTH + j) as u64)
                        .inverse()
                        .expect("Cauchy denominators are small non-zero integers")
                })
                .collect()
        })
        .collect()
}
