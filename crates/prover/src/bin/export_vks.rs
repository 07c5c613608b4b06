//! Export verifying keys for external verifiers.
//!
//! Loads keys from the keys directory (`SMT_KEYS_DIR`, default `keys`), or runs
//! the trusted setup and saves them there first, then prints every verifying
//! key as hex and writes `verifying_keys.json` next to the keys.

use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use smt_prover::setup::{keys_dir, setup_all_circuits, CircuitKeys};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let keys_dir = keys_dir();

    let keys = if keys_dir.exists() {
        info!(dir = %keys_dir.display(), "loading existing keys");
        CircuitKeys::load_from_directory(&keys_dir)?
    } else {
        info!("running trusted setup (this may take a while)");
        let keys = setup_all_circuits()?;
        keys.save_to_directory(&keys_dir)?;
        keys
    };

    println!("\n=== Verifying Keys ===\n");

    let mut exported = serde_json::Map::new();
    for (name, pair) in keys.named() {
        let vk = pair.serialize_vk()?;
        let encoded = format!("0x{}", hex::encode(&vk));

        println!("{} VK ({} bytes):", name, vk.len());
        println!("{}\n", encoded);

        exported.insert(format!("{name}_vk"), serde_json::Value::String(encoded));
    }

    let json_path = keys_dir.join("verifying_keys.json");
    std::fs::write(
        &json_path,
        serde_json::to_string_pretty(&serde_json::Value::Object(exported))?,
    )?;
    info!(path = %json_path.display(), "exported verifying keys");

    Ok(())
}
