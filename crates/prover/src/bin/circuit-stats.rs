//! Circuit statistics utility - reports constraint counts and proof timing
//!
//! Usage:
//!   cargo run --release --bin circuit-stats           # Just constraint counts
//!   cargo run --release --bin circuit-stats -- --time # Include proof timing (needs keys)

use std::path::Path;
use std::time::Instant;

use ark_bn254::Fr;
use ark_ff::Zero;
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, SynthesisError};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use smt_circuits::smt::{empty_siblings, sparse_siblings};
use smt_circuits::{
    Entry, MembershipCircuit, OpType, PoseidonHasher, SmtHasher, SmtProof, TransitionCircuit,
    TREE_DEPTH,
};
use smt_prover::setup::{keys_dir, CircuitKeys};

fn count_constraints<C: ConstraintSynthesizer<Fr>>(
    circuit: C,
    name: &str,
) -> Result<usize, SynthesisError> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    circuit.generate_constraints(cs.clone())?;
    let count = cs.num_constraints();
    // Note: empty circuits use dummy values so they may not satisfy all constraints
    // The constraint count is still accurate
    println!("{:25} {:>8} constraints", name, count);
    Ok(count)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let include_timing = args.iter().any(|a| a == "--time");

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║              SPARSE MERKLE TREE CIRCUIT STATS            ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    println!("SMT Depth: {}\n", TREE_DEPTH);

    println!("─────────────────────────────────────────────────────────────");
    println!("CIRCUIT CONSTRAINTS:");
    println!("─────────────────────────────────────────────────────────────\n");

    let mut total = count_constraints(MembershipCircuit::empty(), "Membership")?;
    for op in OpType::ALL {
        total += count_constraints(TransitionCircuit::empty(op), &format!("Transition ({op})"))?;
    }

    println!("\nTotal constraints (all circuits): {}", total);

    if include_timing {
        println!("\n─────────────────────────────────────────────────────────────");
        println!("PROOF TIMING:");
        println!("─────────────────────────────────────────────────────────────\n");

        let keys_path = keys_dir();
        if keys_path.exists() {
            run_timing_benchmarks(&keys_path)?;
        } else {
            warn!(dir = %keys_path.display(), "keys not found");
            println!("Generate keys first with:");
            println!("  cargo run --release --bin export-vks");
        }
    } else {
        println!("\n(Run with --time to include proof generation timing)");
    }

    Ok(())
}

fn run_timing_benchmarks(keys_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    use smt_prover::prove;

    println!("Loading keys from {:?}...", keys_path);
    let start = Instant::now();
    let keys = CircuitKeys::load_from_directory(keys_path)?;
    println!("Keys loaded in {:?}\n", start.elapsed());

    // Two entries splitting at the root
    let a = Entry::new(Fr::from(2u64), Fr::from(20u64));
    let b = Entry::new(Fr::from(3u64), Fr::from(30u64));
    let leaf_a = PoseidonHasher.hash_leaf(a.key, a.value);
    let r1 = leaf_a;
    let siblings = sparse_siblings(&[(255, leaf_a)])?;
    let r2 = smt_circuits::add(&b, r1, &siblings)?;
    let membership = SmtProof::membership(b, siblings, r2);

    // Warm up (first proof is slower due to caching)
    let _ = prove::prove_add(&keys.add.proving_key, a, Fr::zero(), empty_siblings())?;

    println!("Circuit              Avg Time");
    println!("─────────────────────────────────");

    time_runs("Membership", || {
        prove::prove_membership(&keys.membership.proving_key, &membership).map(|_| ())
    })?;
    time_runs("Transition (add)", || {
        prove::prove_add(&keys.add.proving_key, b, r1, siblings).map(|_| ())
    })?;
    time_runs("Transition (delete)", || {
        prove::prove_delete(&keys.delete.proving_key, b, r2, siblings).map(|_| ())
    })?;
    time_runs("Transition (update)", || {
        prove::prove_update(&keys.update.proving_key, Fr::from(31u64), b, r2, siblings).map(|_| ())
    })?;

    Ok(())
}

fn time_runs(
    name: &str,
    mut run: impl FnMut() -> Result<(), smt_prover::ProveError>,
) -> Result<(), smt_prover::ProveError> {
    const RUNS: usize = 3;

    let mut total_us = 0u128;
    for _ in 0..RUNS {
        let start = Instant::now();
        run()?;
        total_us += start.elapsed().as_micros();
    }
    println!("{:20} {:>6}ms", name, total_us / RUNS as u128 / 1000);
    Ok(())
}
