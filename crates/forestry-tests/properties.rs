// Property suites over random tries: canonical form, proof soundness in
// both modes, proof-driven mutation, skip non-malleability, and wire
// round-trips.

use forestry_core::{verify, Commitment, Forestry, Mode, Proof, Step};
use forestry_crypto::{blake2b_256, to_path};
use proptest::collection::{hash_map, vec};
use proptest::prelude::*;

fn pairs_strategy(max: usize) -> impl Strategy<Value = Vec<(Vec<u8>, Vec<u8>)>> {
    hash_map(vec(any::<u8>(), 1..24), vec(any::<u8>(), 0..24), 1..max)
        .prop_map(|map| map.into_iter().collect())
}

/// Deterministic Fisher-Yates driven by a seed, so failures replay.
fn shuffle<T>(items: &mut [T], mut state: u64) {
    for i in (1..items.len()).rev() {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let j = (state >> 33) as usize % (i + 1);
        items.swap(i, j);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_root_is_canonical_under_reordering(
        pairs in pairs_strategy(24),
        seed in any::<u64>(),
    ) {
        let forward = Forestry::from_list(pairs.clone()).unwrap();
        let mut shuffled = pairs;
        shuffle(&mut shuffled, seed);
        let reordered = Forestry::from_list(shuffled).unwrap();
        prop_assert_eq!(forward.root(), reordered.root());
    }

    #[test]
    fn prop_insert_then_delete_is_identity(
        pairs in pairs_strategy(16),
        extra in vec(any::<u8>(), 1..24),
    ) {
        prop_assume!(!pairs.iter().any(|(key, _)| key == &extra));
        let mut trie = Forestry::from_list(pairs).unwrap();
        let root = trie.root();
        trie.insert(&extra, b"transient").unwrap();
        prop_assert_ne!(trie.root(), root);
        trie.delete(&extra).unwrap();
        prop_assert_eq!(trie.root(), root);
    }

    #[test]
    fn prop_inclusion_soundness(pairs in pairs_strategy(16)) {
        let trie = Forestry::from_list(pairs.clone()).unwrap();
        let commitment = Commitment::from_root(&trie.root()).unwrap();
        for (key, value) in &pairs {
            let proof = trie.prove(key, false).unwrap();
            prop_assert!(commitment.has(key, value, &proof));

            let mut wrong = value.clone();
            wrong.push(0xaa);
            prop_assert!(!commitment.has(key, &wrong, &proof));
            prop_assert!(!commitment.miss(key, &proof));
        }
    }

    #[test]
    fn prop_exclusion_soundness(
        pairs in pairs_strategy(16),
        missing in vec(any::<u8>(), 1..24),
    ) {
        prop_assume!(!pairs.iter().any(|(key, _)| key == &missing));
        let trie = Forestry::from_list(pairs).unwrap();
        let commitment = Commitment::from_root(&trie.root()).unwrap();

        let proof = trie.prove(&missing, true).unwrap();
        prop_assert!(commitment.miss(&missing, &proof));
        prop_assert!(!commitment.has(&missing, b"anything", &proof));
    }

    #[test]
    fn prop_insert_via_proof_matches_prover(
        pairs in pairs_strategy(16),
        missing in vec(any::<u8>(), 1..24),
        value in vec(any::<u8>(), 0..24),
    ) {
        prop_assume!(!pairs.iter().any(|(key, _)| key == &missing));
        let mut trie = Forestry::from_list(pairs).unwrap();
        let commitment = Commitment::from_root(&trie.root()).unwrap();

        let proof = trie.prove(&missing, true).unwrap();
        let advanced = commitment.insert(&missing, &value, &proof).unwrap();

        trie.insert(&missing, &value).unwrap();
        prop_assert_eq!(advanced.root(), trie.root());
    }

    #[test]
    fn prop_delete_via_proof_matches_prover(pairs in pairs_strategy(16)) {
        let mut trie = Forestry::from_list(pairs.clone()).unwrap();
        let commitment = Commitment::from_root(&trie.root()).unwrap();
        let (key, value) = &pairs[pairs.len() / 2];

        let proof = trie.prove(key, false).unwrap();
        let advanced = commitment.delete(key, value, &proof).unwrap();

        trie.delete(key).unwrap();
        prop_assert_eq!(advanced.root(), trie.root());
    }

    #[test]
    fn prop_skip_values_are_not_malleable(pairs in pairs_strategy(16)) {
        let trie = Forestry::from_list(pairs.clone()).unwrap();
        for (key, value) in &pairs {
            let proof = trie.prove(key, false).unwrap();
            let path = to_path(key);
            let digest = blake2b_256(value);
            let baseline = verify(&path, Some(&digest), proof.steps(), Mode::Including).unwrap();
            prop_assert_eq!(baseline, trie.root());

            for i in 0..proof.len() {
                let mut steps = proof.steps().to_vec();
                match &mut steps[i] {
                    Step::Branch { skip, .. }
                    | Step::Fork { skip, .. }
                    | Step::Leaf { skip, .. } => *skip += 1,
                }
                let tampered = verify(&path, Some(&digest), &steps, Mode::Including);
                prop_assert!(
                    tampered.map(|root| root != baseline).unwrap_or(true),
                    "bumping skip of step {} went unnoticed", i
                );
            }
        }
    }

    #[test]
    fn prop_exclusion_skips_are_not_malleable(
        pairs in pairs_strategy(16),
        missing in vec(any::<u8>(), 1..24),
    ) {
        prop_assume!(!pairs.iter().any(|(key, _)| key == &missing));
        let trie = Forestry::from_list(pairs).unwrap();
        let path = to_path(&missing);

        let proof = trie.prove(&missing, true).unwrap();
        prop_assume!(!proof.is_empty());
        let baseline = verify(&path, None, proof.steps(), Mode::Excluding).unwrap();
        prop_assert_eq!(baseline, trie.root());

        for i in 0..proof.len() {
            // a terminal leaf collapse re-anchors the neighbor at the cursor
            // and never reads its skip, so that position is exempt
            if i == proof.len() - 1 && matches!(proof.steps()[i], Step::Leaf { .. }) {
                continue;
            }
            let mut steps = proof.steps().to_vec();
            match &mut steps[i] {
                Step::Branch { skip, .. }
                | Step::Fork { skip, .. }
                | Step::Leaf { skip, .. } => *skip += 1,
            }
            let tampered = verify(&path, None, &steps, Mode::Excluding);
            prop_assert!(
                tampered.map(|root| root != baseline).unwrap_or(true),
                "bumping skip of step {} went unnoticed", i
            );
        }
    }

    #[test]
    fn prop_proofs_round_trip_through_wire_formats(pairs in pairs_strategy(12)) {
        let trie = Forestry::from_list(pairs.clone()).unwrap();
        for (key, _) in &pairs {
            let proof = trie.prove(key, false).unwrap();

            let json = serde_json::to_string(&proof).unwrap();
            prop_assert_eq!(&serde_json::from_str::<Proof>(&json).unwrap(), &proof);

            let cbor = proof.to_cbor().unwrap();
            prop_assert_eq!(&Proof::from_cbor(&cbor).unwrap(), &proof);
        }
    }
}
