//! Integration tests for the SMT module.

use super::reference::ReferenceTree;
use super::*;
use crate::error::SmtError;
use crate::field::parse_fr;
use ark_bn254::Fr;
use ark_ff::{UniformRand, Zero};
use ark_std::rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;

const FIXTURE: &str = include_str!("../../fixtures/transitions.json");

// Golden chain computed under this crate's Poseidon parameters. Published roots
// for this tree come from a different Poseidon instantiation that cannot be
// reproduced from its description, so these vectors stand in for them.
const KEY_A: &str = "6693852588934715648293441957189432804845117878065917447360084410943210924351";
const VALUE_A: &str = "4689264374343787409253411267448109475727745255690575907832979433850013746133";
const KEY_B: &str = "16847478067498059233947296916564432488697704682636360937574952000391396673568";
const VALUE_B: &str = "15805959866864804152624163810225137063083896754801582785222398324309764040642";
const VALUE_B2: &str =
    "20103416402206463772450481317777495160491608779719117875203334910504348246700";
const KEY_C: &str = "21442705548598743909212736395765446390906660844486175135177956579648652223929";
const VALUE_C: &str = "10008912051924122925379036290643605640710230851482685146061410400171995181740";

const ROOT_A: &str = "3793225709708261884249686918490956026744001782542975425658945054192441512367";
const ROOT_AB: &str = "11784446090628432737441950798807238171933490628357723561092033720891941008663";
const ROOT_ABC: &str = "7606892475652809902830082558445155271104117534494791195814659304643308583683";
const ROOT_AB2: &str = "15349421417212385431134492500886256712804801846575102793246052334252279745852";
const LEAF_B: &str = "11111028605609319824288955376570073287186841531261328393303191338471422435746";

fn fr(s: &str) -> Fr {
    parse_fr(s).unwrap()
}

fn entry(key: &str, value: &str) -> Entry {
    Entry::new(fr(key), fr(value))
}

#[derive(Deserialize)]
struct Fixture {
    steps: Vec<Step>,
    proofs: Vec<SmtProof>,
}

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Add {
        entry: Entry,
        #[serde(with = "crate::field::serde_fr")]
        old_root: Fr,
        #[serde(with = "crate::field::serde_siblings")]
        siblings: SiblingPath,
        #[serde(with = "crate::field::serde_fr")]
        new_root: Fr,
    },
    Delete {
        entry: Entry,
        #[serde(with = "crate::field::serde_fr")]
        old_root: Fr,
        #[serde(with = "crate::field::serde_siblings")]
        siblings: SiblingPath,
        #[serde(with = "crate::field::serde_fr")]
        new_root: Fr,
    },
    Update {
        old_entry: Entry,
        #[serde(with = "crate::field::serde_fr")]
        new_value: Fr,
        #[serde(with = "crate::field::serde_fr")]
        old_root: Fr,
        #[serde(with = "crate::field::serde_siblings")]
        siblings: SiblingPath,
        #[serde(with = "crate::field::serde_fr")]
        new_root: Fr,
    },
}

fn load_fixture() -> Fixture {
    serde_json::from_str(FIXTURE).unwrap()
}

// ============================================================================
// Golden chain
// ============================================================================

#[test]
fn test_golden_chain_inline() {
    let a = entry(KEY_A, VALUE_A);
    let b = entry(KEY_B, VALUE_B);
    let c = entry(KEY_C, VALUE_C);
    let leaf_a = PoseidonHasher.hash_leaf(a.key, a.value);
    let leaf_b = fr(LEAF_B);
    assert_eq!(PoseidonHasher.hash_leaf(b.key, b.value), leaf_b);

    // empty -> {A}
    let r1 = add(&a, Fr::zero(), &empty_siblings()).unwrap();
    assert_eq!(r1, fr(ROOT_A));
    assert_eq!(r1, leaf_a);

    // {A} -> {A, B}
    let siblings_b = sparse_siblings(&[(255, leaf_a)]).unwrap();
    let r2 = add(&b, r1, &siblings_b).unwrap();
    assert_eq!(r2, fr(ROOT_AB));

    // {A, B} -> {A, B, C}
    let siblings_c = sparse_siblings(&[(254, leaf_a), (255, leaf_b)]).unwrap();
    let r3 = add(&c, r2, &siblings_c).unwrap();
    assert_eq!(r3, fr(ROOT_ABC));

    // delete C -> back to {A, B}
    let r4 = delete(&c, r3, &siblings_c).unwrap();
    assert_eq!(r4, r2);

    // update B
    let r5 = update(fr(VALUE_B2), &b, r4, &siblings_b).unwrap();
    assert_eq!(r5, fr(ROOT_AB2));
}

#[test]
fn test_golden_chain_from_fixture() {
    let fixture = load_fixture();
    assert_eq!(fixture.steps.len(), 5);

    let mut root = Fr::zero();
    for step in &fixture.steps {
        root = match step {
            Step::Add {
                entry,
                old_root,
                siblings,
                new_root,
            } => {
                assert_eq!(*old_root, root);
                let computed = add(entry, *old_root, siblings).unwrap();
                assert_eq!(computed, *new_root);
                computed
            }
            Step::Delete {
                entry,
                old_root,
                siblings,
                new_root,
            } => {
                assert_eq!(*old_root, root);
                let computed = delete(entry, *old_root, siblings).unwrap();
                assert_eq!(computed, *new_root);
                computed
            }
            Step::Update {
                old_entry,
                new_value,
                old_root,
                siblings,
                new_root,
            } => {
                assert_eq!(*old_root, root);
                let computed = update(*new_value, old_entry, *old_root, siblings).unwrap();
                assert_eq!(computed, *new_root);
                computed
            }
        };
    }

    assert_eq!(root, fr(ROOT_AB2));
}

#[test]
fn test_fixture_proofs_verify() {
    let fixture = load_fixture();

    let membership = &fixture.proofs[0];
    assert!(membership.is_membership());
    assert_eq!(membership.root, fr(ROOT_ABC));
    assert_eq!(membership.depth(), 2);
    membership.verify().unwrap();

    let non_membership = &fixture.proofs[1];
    assert!(!non_membership.is_membership());
    assert_eq!(non_membership.root, fr(ROOT_AB));
    assert_eq!(non_membership.matching_entry, Some(entry(KEY_A, VALUE_A)));
    non_membership.verify().unwrap();
}

#[test]
fn test_reference_tree_matches_golden_roots() {
    let mut tree = ReferenceTree::new();
    tree.insert(entry(KEY_A, VALUE_A));
    assert_eq!(tree.root(), fr(ROOT_A));
    tree.insert(entry(KEY_B, VALUE_B));
    assert_eq!(tree.root(), fr(ROOT_AB));
    tree.insert(entry(KEY_C, VALUE_C));
    assert_eq!(tree.root(), fr(ROOT_ABC));
    tree.remove(fr(KEY_C));
    tree.insert(entry(KEY_B, VALUE_B2));
    assert_eq!(tree.len(), 2);
    assert_eq!(tree.root(), fr(ROOT_AB2));
}

// ============================================================================
// Properties against the reference tree
// ============================================================================

fn random_tree(rng: &mut StdRng, size: usize) -> ReferenceTree {
    let entries: Vec<Entry> = (0..size)
        .map(|_| Entry::new(Fr::rand(rng), Fr::rand(rng)))
        .collect();
    ReferenceTree::from_entries(&entries)
}

#[test]
fn test_membership_round_trip() {
    let mut rng = StdRng::seed_from_u64(42);
    let entries: Vec<Entry> = (0..24)
        .map(|_| Entry::new(Fr::rand(&mut rng), Fr::rand(&mut rng)))
        .collect();
    let tree = ReferenceTree::from_entries(&entries);

    for entry in &entries {
        let proof = tree.proof(*entry).unwrap();
        assert!(proof.is_membership());
        proof.verify().unwrap();
    }
}

#[test]
fn test_non_membership_round_trip() {
    let mut rng = StdRng::seed_from_u64(7);
    let tree = random_tree(&mut rng, 16);

    let mut checked = 0;
    for _ in 0..32 {
        let absent = Entry::new(Fr::rand(&mut rng), Fr::zero());
        // An empty slot has no occupant to witness the absence
        let Some(proof) = tree.proof(absent) else {
            continue;
        };
        assert!(!proof.is_membership());
        proof.verify().unwrap();
        checked += 1;
    }
    assert!(checked > 0);
}

#[test]
fn test_add_then_delete_is_identity() {
    let mut rng = StdRng::seed_from_u64(1234);
    let mut tree = random_tree(&mut rng, 12);

    for _ in 0..8 {
        let old_root = tree.root();
        let new_entry = Entry::new(Fr::rand(&mut rng), Fr::rand(&mut rng));
        let siblings = tree.insertion_siblings(new_entry);

        let added = add(&new_entry, old_root, &siblings).unwrap();
        tree.insert(new_entry);
        assert_eq!(added, tree.root());

        let deleted = delete(&new_entry, added, &siblings).unwrap();
        assert_eq!(deleted, old_root);
        tree.remove(new_entry.key);
    }
}

#[test]
fn test_update_to_same_value_is_identity() {
    let mut rng = StdRng::seed_from_u64(99);
    let entries: Vec<Entry> = (0..10)
        .map(|_| Entry::new(Fr::rand(&mut rng), Fr::rand(&mut rng)))
        .collect();
    let tree = ReferenceTree::from_entries(&entries);
    let root = tree.root();

    for entry in &entries {
        let (siblings, _) = tree.siblings(entry.key);
        assert_eq!(update(entry.value, entry, root, &siblings).unwrap(), root);
    }
}

#[test]
fn test_update_matches_reference() {
    let mut rng = StdRng::seed_from_u64(5);
    let entries: Vec<Entry> = (0..10)
        .map(|_| Entry::new(Fr::rand(&mut rng), Fr::rand(&mut rng)))
        .collect();
    let mut tree = ReferenceTree::from_entries(&entries);

    for entry in &entries {
        let old_root = tree.root();
        let (siblings, _) = tree.siblings(entry.key);
        let new_value = Fr::rand(&mut rng);

        let new_root = update(new_value, entry, old_root, &siblings).unwrap();
        tree.insert(Entry::new(entry.key, new_value));
        assert_eq!(new_root, tree.root());
        assert_eq!(tree.get(entry.key).map(|e| e.value), Some(new_value));
    }
}

#[test]
fn test_first_insertion_is_leaf_digest() {
    let new_entry = Entry::new(Fr::from(3u64), Fr::from(4u64));
    // Siblings are ignored for an empty tree
    let junk = sparse_siblings(&[(0, Fr::from(9u64))]).unwrap();
    let root = add(&new_entry, Fr::zero(), &junk).unwrap();
    assert_eq!(root, PoseidonHasher.hash_leaf(new_entry.key, new_entry.value));
}

#[test]
fn test_delete_last_entry_empties_tree() {
    let only = Entry::new(Fr::from(3u64), Fr::from(4u64));
    let root = add(&only, Fr::zero(), &empty_siblings()).unwrap();
    assert!(delete(&only, root, &empty_siblings()).unwrap().is_zero());
}

#[test]
fn test_add_rejects_present_key() {
    let a = entry(KEY_A, VALUE_A);
    let b = entry(KEY_B, VALUE_B);
    let siblings_b = sparse_siblings(&[(255, PoseidonHasher.hash_leaf(a.key, a.value))]).unwrap();

    // B is already under ROOT_AB, so its absent root cannot equal it
    let result = add(&b, fr(ROOT_AB), &siblings_b);
    assert!(matches!(result, Err(SmtError::RootMismatch { .. })));
}

// ============================================================================
// Tamper detection
// ============================================================================

#[test]
fn test_tampered_sibling_is_rejected() {
    let mut rng = StdRng::seed_from_u64(2024);
    let tree = random_tree(&mut rng, 20);
    let target = Entry::new(Fr::rand(&mut rng), Fr::rand(&mut rng));
    let mut tree = tree;
    tree.insert(target);

    let proof = tree.proof(target).unwrap();
    for level in 0..TREE_DEPTH {
        if proof.siblings[level].is_zero() {
            continue;
        }
        let mut tampered = proof.clone();
        tampered.siblings[level] += Fr::from(1u64);
        assert!(matches!(
            tampered.verify(),
            Err(SmtError::RootMismatch { .. })
        ));
    }
}

#[test]
fn test_flipped_selector_is_rejected() {
    let fixture = load_fixture();

    // Membership proof presented as non-membership
    let mut flipped = fixture.proofs[0].clone();
    flipped.matching_entry = Some(entry(KEY_B, VALUE_B));
    assert!(matches!(
        flipped.verify(),
        Err(SmtError::RootMismatch { .. })
    ));

    // Non-membership proof presented as membership
    let mut flipped = fixture.proofs[1].clone();
    flipped.matching_entry = None;
    assert!(matches!(
        flipped.verify(),
        Err(SmtError::RootMismatch { .. })
    ));
}

#[test]
fn test_matching_entry_with_same_key_is_invalid() {
    let a = entry(KEY_A, VALUE_A);
    let same_key = Entry::new(a.key, Fr::from(1u64));
    let result = verify(&a, Some(&same_key), &empty_siblings(), fr(ROOT_A));
    assert!(matches!(result, Err(SmtError::InvalidInput(_))));
}

#[test]
fn test_zero_key_is_invalid_everywhere() {
    let zero_key = Entry::new(Fr::zero(), Fr::from(1u64));
    let siblings = empty_siblings();

    assert!(matches!(
        verify(&zero_key, None, &siblings, Fr::from(1u64)),
        Err(SmtError::InvalidInput(_))
    ));
    assert!(matches!(
        add(&zero_key, Fr::zero(), &siblings),
        Err(SmtError::InvalidInput(_))
    ));
    assert!(matches!(
        delete(&zero_key, Fr::from(1u64), &siblings),
        Err(SmtError::InvalidInput(_))
    ));
    assert!(matches!(
        update(Fr::from(2u64), &zero_key, Fr::from(1u64), &siblings),
        Err(SmtError::InvalidInput(_))
    ));
}

#[test]
fn test_root_mismatch_reports_both_roots() {
    let a = entry(KEY_A, VALUE_A);
    let wrong_root = Fr::from(12345u64);
    let err = verify(&a, None, &empty_siblings(), wrong_root).unwrap_err();
    assert_eq!(
        err,
        SmtError::RootMismatch {
            expected: wrong_root,
            computed: fr(ROOT_A),
        }
    );
}

// ============================================================================
// Batch verification
// ============================================================================

#[test]
fn test_verify_batch_reports_first_failure() {
    let mut rng = StdRng::seed_from_u64(77);
    let entries: Vec<Entry> = (0..8)
        .map(|_| Entry::new(Fr::rand(&mut rng), Fr::rand(&mut rng)))
        .collect();
    let tree = ReferenceTree::from_entries(&entries);

    let mut proofs: Vec<SmtProof> = entries
        .iter()
        .map(|entry| tree.proof(*entry).unwrap())
        .collect();

    let engine = SmtEngine::<PoseidonHasher>::default();
    let results = verify_batch(&engine, &proofs);
    assert_eq!(results.len(), proofs.len());
    assert!(first_failure(&results).is_none());

    proofs[5].entry.value += Fr::from(1u64);
    proofs[6].root = Fr::from(1u64);
    let results = verify_batch(&engine, &proofs);
    let (index, err) = first_failure(&results).unwrap();
    assert_eq!(index, 5);
    assert!(matches!(err, SmtError::RootMismatch { .. }));
    assert!(results[6].is_err());
}
