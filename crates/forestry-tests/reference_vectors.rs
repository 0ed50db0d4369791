// Reference vectors for the trie engine: known roots, membership and
// exclusion proofs over the fruit list, and the regressions around
// nonzero-skip terminal forks.

use forestry_core::{Commitment, Forestry, Proof, Step};
use forestry_crypto::{nibble_at, nibbles, to_path, NULL_HASH};
use forestry_tests::{fruit_trie, fruit_trie_without, fruits, FRUITS, FRUITS_ROOT};

#[test]
fn test_empty_trie_root_is_null() {
    let trie = Forestry::new();
    assert_eq!(trie.root(), NULL_HASH);
    assert_eq!(hex::encode(trie.root()), "0".repeat(64));

    let commitment = Commitment::from_root(&NULL_HASH).unwrap();
    assert!(commitment.is_empty());
}

#[test]
fn test_fruit_root_matches_reference() {
    let trie = fruit_trie().unwrap();
    assert_eq!(hex::encode(trie.root()), FRUITS_ROOT);
    assert_eq!(trie.len().unwrap(), FRUITS.len());
}

#[test]
fn test_fruit_root_is_insertion_order_independent() {
    let mut reversed = fruits();
    reversed.reverse();
    let mut rotated = fruits();
    rotated.rotate_left(13);

    assert_eq!(
        hex::encode(Forestry::from_list(reversed).unwrap().root()),
        FRUITS_ROOT
    );
    assert_eq!(
        hex::encode(Forestry::from_list(rotated).unwrap().root()),
        FRUITS_ROOT
    );
}

#[test]
fn test_fruit_membership_proofs() {
    let trie = fruit_trie().unwrap();
    let commitment = Commitment::from_root(&trie.root()).unwrap();

    for (key, value) in FRUITS {
        let proof = trie.prove(key.as_bytes(), false).unwrap();
        assert!(
            commitment.has(key.as_bytes(), value.as_bytes(), &proof),
            "membership failed for {key}"
        );
        assert!(!commitment.has(key.as_bytes(), "🛸".as_bytes(), &proof));
        assert!(!commitment.miss(key.as_bytes(), &proof));
    }
}

#[test]
fn test_fruit_exclusion_yields_root_without_that_key() {
    // each membership proof doubles as a deletion witness: verifying it in
    // exclusion mode reproduces the root of the list minus that key
    let trie = fruit_trie().unwrap();
    let commitment = Commitment::from_root(&trie.root()).unwrap();

    for (key, value) in FRUITS {
        let proof = trie.prove(key.as_bytes(), false).unwrap();
        let reduced = commitment
            .delete(key.as_bytes(), value.as_bytes(), &proof)
            .unwrap();
        let rebuilt = fruit_trie_without(key).unwrap();
        assert_eq!(reduced.root(), rebuilt.root(), "exclusion failed for {key}");
    }
}

#[test]
fn test_melon_insert_from_exclusion() {
    let melon = "melon[uid: 0]".as_bytes();
    let trie = fruit_trie().unwrap();
    let commitment = Commitment::from_root(&trie.root()).unwrap();

    let proof = trie.prove(melon, true).unwrap();
    assert!(commitment.miss(melon, &proof));

    let advanced = commitment.insert(melon, "🍈".as_bytes(), &proof).unwrap();

    let mut with_melon = fruit_trie().unwrap();
    with_melon.insert(melon, "🍈".as_bytes()).unwrap();
    assert_eq!(advanced.root(), with_melon.root());
    assert!(advanced.has(melon, "🍈".as_bytes(), &proof));
}

/// Deterministically find two keys whose paths agree on their first two
/// nibbles, and a probe that matches only the first. The probe's exclusion
/// proof then ends in a fork with a nonzero skip.
fn diverging_fixture() -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut pair = None;
    'search: for i in 0..400u32 {
        for j in (i + 1)..400 {
            let a = format!("probe-{i}");
            let b = format!("probe-{j}");
            let pa = to_path(a.as_bytes());
            let pb = to_path(b.as_bytes());
            if nibbles(&pa, 0, 2) == nibbles(&pb, 0, 2) && nibble_at(&pa, 2) != nibble_at(&pb, 2)
            {
                pair = Some((a.into_bytes(), b.into_bytes()));
                break 'search;
            }
        }
    }
    let (a, b) = pair.expect("no colliding pair among 400 probes");
    let shared = nibbles(&to_path(&a), 0, 2);

    for i in 0..10_000u32 {
        let candidate = format!("outsider-{i}").into_bytes();
        let path = to_path(&candidate);
        if nibble_at(&path, 0) == shared[0] && nibble_at(&path, 1) != shared[1] {
            return (a, b, candidate);
        }
    }
    panic!("no diverging probe among 10000 candidates");
}

#[test]
fn test_terminal_fork_with_nonzero_skip() {
    let (a, b, probe) = diverging_fixture();
    let trie = Forestry::from_list(vec![(a, b"left".to_vec()), (b, b"right".to_vec())]).unwrap();
    let commitment = Commitment::from_root(&trie.root()).unwrap();

    let proof = trie.prove(&probe, true).unwrap();
    let skip = match proof.steps() {
        [Step::Fork { skip, .. }] => *skip,
        steps => panic!("expected a lone fork step, got {steps:?}"),
    };
    assert_eq!(skip, 1, "probe diverges after one shared nibble");
    assert!(commitment.miss(&probe, &proof));

    // the skipped prefix nibble is part of the reconstruction: collapsing
    // the skip must break verification
    let tampered = match &proof.steps()[0] {
        Step::Fork { neighbor, .. } => Proof::new(vec![Step::Fork {
            skip: 0,
            neighbor: neighbor.clone(),
        }]),
        _ => unreachable!(),
    };
    assert!(!commitment.miss(&probe, &tampered));

    // and the proof still supports inserting the probe
    let advanced = commitment.insert(&probe, b"new", &proof).unwrap();
    let mut trie = trie;
    trie.insert(&probe, b"new").unwrap();
    assert_eq!(advanced.root(), trie.root());
}

#[test]
fn test_fruit_proofs_survive_wire_round_trips() {
    let trie = fruit_trie().unwrap();
    let mut proofs: Vec<Proof> = FRUITS
        .iter()
        .map(|(key, _)| trie.prove(key.as_bytes(), false).unwrap())
        .collect();
    proofs.push(trie.prove("melon[uid: 0]".as_bytes(), true).unwrap());

    for proof in proofs {
        let json = serde_json::to_string(&proof).unwrap();
        assert_eq!(serde_json::from_str::<Proof>(&json).unwrap(), proof);

        let cbor = proof.to_cbor().unwrap();
        assert_eq!(Proof::from_cbor(&cbor).unwrap(), proof);
        assert!(cbor.len() < 1024, "proof exceeded 1 KiB on the wire");
    }
}
