//! Native Poseidon hash functions (outside circuits).

use ark_bn254::Fr;
use ark_crypto_primitives::sponge::poseidon::PoseidonSponge;
use ark_crypto_primitives::sponge::CryptographicSponge;

use super::config::poseidon_config;

/// Hash three field elements in a single permutation.
pub fn poseidon_hash_three(a: Fr, b: Fr, c: Fr) -> Fr {
    let mut sponge = PoseidonSponge::new(poseidon_config());
    sponge.absorb(&a);
    sponge.absorb(&b);
    sponge.absorb(&c);
    sponge.squeeze_field_elements::<Fr>(1)[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let h1 = poseidon_hash_three(Fr::from(42u64), Fr::from(123u64), Fr::from(1u64));
        let h2 = poseidon_hash_three(Fr::from(42u64), Fr::from(123u64), Fr::from(1u64));
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_tag_separates_leaf_from_node() {
        let (a, b) = (Fr::from(42u64), Fr::from(123u64));
        assert_ne!(
            poseidon_hash_three(a, b, Fr::from(1u64)),
            poseidon_hash_three(a, b, Fr::from(0u64))
        );
    }
}
