//! Fixed 16-leaf binary Merkle trees over branch children.
//!
//! A branch commits to its 16 child slots through a 4-level binary Merkle
//! tree; empty slots contribute [`NULL_HASH`]. Membership of one child is
//! shown with exactly four neighbor hashes, carried top-down:
//! `[lvl1, lvl2, lvl3, lvl4]` where lvl1 is the root of the opposite 8-wide
//! half and lvl4 is the adjacent leaf.

use crate::hash::{combine, Hash, NULL_HASH, NULL_HASH_2, NULL_HASH_4, NULL_HASH_8};

/// Merkle root over all 16 child slots.
pub fn merkle_root(children: &[Hash; 16]) -> Hash {
    root_of(children)
}

fn root_of(level: &[Hash]) -> Hash {
    if level.len() == 1 {
        return level[0];
    }
    let next: Vec<Hash> = level.chunks(2).map(|p| combine(&p[0], &p[1])).collect();
    root_of(&next)
}

/// The four neighbor hashes proving slot `me` inside [`merkle_root`],
/// ordered top-down.
pub fn merkle_proof(children: &[Hash; 16], me: u8) -> [Hash; 4] {
    debug_assert!(me < 16);
    let me = me as usize;

    let lvl1 = if me < 8 {
        root_of(&children[8..16])
    } else {
        root_of(&children[0..8])
    };

    let base8 = me / 8 * 8;
    let other4 = base8 + (1 - (me % 8) / 4) * 4;
    let lvl2 = root_of(&children[other4..other4 + 4]);

    let base4 = base8 + (me % 8) / 4 * 4;
    let other2 = base4 + (1 - (me % 4) / 2) * 2;
    let lvl3 = root_of(&children[other2..other2 + 2]);

    let lvl4 = children[me ^ 1];

    [lvl1, lvl2, lvl3, lvl4]
}

/// Recompute [`merkle_root`] from one child hash and its four neighbors.
///
/// The bits of the nibble index select the side of each `combine`, most
/// significant bit at the top level. This table is the single encoding of
/// that mapping; every verifier path funnels through it.
pub fn merkle_16(me: u8, root: &Hash, neighbors: &[Hash; 4]) -> Hash {
    let [n1, n2, n3, n4] = neighbors;
    match me {
        0x0 => combine(&combine(&combine(&combine(root, n4), n3), n2), n1),
        0x1 => combine(&combine(&combine(&combine(n4, root), n3), n2), n1),
        0x2 => combine(&combine(&combine(n3, &combine(root, n4)), n2), n1),
        0x3 => combine(&combine(&combine(n3, &combine(n4, root)), n2), n1),
        0x4 => combine(&combine(n2, &combine(&combine(root, n4), n3)), n1),
        0x5 => combine(&combine(n2, &combine(&combine(n4, root), n3)), n1),
        0x6 => combine(&combine(n2, &combine(n3, &combine(root, n4))), n1),
        0x7 => combine(&combine(n2, &combine(n3, &combine(n4, root))), n1),
        0x8 => combine(n1, &combine(&combine(&combine(root, n4), n3), n2)),
        0x9 => combine(n1, &combine(&combine(&combine(n4, root), n3), n2)),
        0xa => combine(n1, &combine(&combine(n3, &combine(root, n4)), n2)),
        0xb => combine(n1, &combine(&combine(n3, &combine(n4, root)), n2)),
        0xc => combine(n1, &combine(n2, &combine(&combine(root, n4), n3))),
        0xd => combine(n1, &combine(n2, &combine(&combine(n4, root), n3))),
        0xe => combine(n1, &combine(n2, &combine(n3, &combine(root, n4)))),
        0xf => combine(n1, &combine(n2, &combine(n3, &combine(n4, root)))),
        _ => unreachable!("nibble index out of range"),
    }
}

/// Merkle root of a branch holding exactly two populated slots.
///
/// Equals [`merkle_root`] with the other fourteen slots set to
/// [`NULL_HASH`], computed without materializing the empty subtrees.
pub fn sparse_merkle_16(me: u8, me_hash: &Hash, them: u8, them_hash: &Hash) -> Hash {
    debug_assert!(me < 16 && them < 16 && me != them);
    match (me < 8, them < 8) {
        (true, true) => combine(
            &sparse_merkle_8(me, me_hash, them, them_hash),
            &NULL_HASH_8,
        ),
        (false, false) => combine(
            &NULL_HASH_8,
            &sparse_merkle_8(me - 8, me_hash, them - 8, them_hash),
        ),
        (true, false) => combine(
            &merkle_8_single(me, me_hash),
            &merkle_8_single(them - 8, them_hash),
        ),
        (false, true) => combine(
            &merkle_8_single(them, them_hash),
            &merkle_8_single(me - 8, me_hash),
        ),
    }
}

fn sparse_merkle_8(me: u8, me_hash: &Hash, them: u8, them_hash: &Hash) -> Hash {
    match (me < 4, them < 4) {
        (true, true) => combine(
            &sparse_merkle_4(me, me_hash, them, them_hash),
            &NULL_HASH_4,
        ),
        (false, false) => combine(
            &NULL_HASH_4,
            &sparse_merkle_4(me - 4, me_hash, them - 4, them_hash),
        ),
        (true, false) => combine(
            &merkle_4_single(me, me_hash),
            &merkle_4_single(them - 4, them_hash),
        ),
        (false, true) => combine(
            &merkle_4_single(them, them_hash),
            &merkle_4_single(me - 4, me_hash),
        ),
    }
}

fn sparse_merkle_4(me: u8, me_hash: &Hash, them: u8, them_hash: &Hash) -> Hash {
    match (me < 2, them < 2) {
        (true, true) => combine(&sparse_merkle_2(me, me_hash, them, them_hash), &NULL_HASH_2),
        (false, false) => combine(
            &NULL_HASH_2,
            &sparse_merkle_2(me - 2, me_hash, them - 2, them_hash),
        ),
        (true, false) => combine(
            &merkle_2_single(me, me_hash),
            &merkle_2_single(them - 2, them_hash),
        ),
        (false, true) => combine(
            &merkle_2_single(them, them_hash),
            &merkle_2_single(me - 2, me_hash),
        ),
    }
}

fn sparse_merkle_2(me: u8, me_hash: &Hash, _them: u8, them_hash: &Hash) -> Hash {
    if me == 0 {
        combine(me_hash, them_hash)
    } else {
        combine(them_hash, me_hash)
    }
}

fn merkle_8_single(ix: u8, hash: &Hash) -> Hash {
    let h2 = merkle_2_single(ix % 2, hash);
    let h4 = if ix / 2 % 2 == 0 {
        combine(&h2, &NULL_HASH_2)
    } else {
        combine(&NULL_HASH_2, &h2)
    };
    if ix / 4 % 2 == 0 {
        combine(&h4, &NULL_HASH_4)
    } else {
        combine(&NULL_HASH_4, &h4)
    }
}

fn merkle_4_single(ix: u8, hash: &Hash) -> Hash {
    let h2 = merkle_2_single(ix % 2, hash);
    if ix / 2 % 2 == 0 {
        combine(&h2, &NULL_HASH_2)
    } else {
        combine(&NULL_HASH_2, &h2)
    }
}

fn merkle_2_single(ix: u8, hash: &Hash) -> Hash {
    if ix % 2 == 0 {
        combine(hash, &NULL_HASH)
    } else {
        combine(&NULL_HASH, hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::blake2b_256;

    fn leaf(i: u8) -> Hash {
        blake2b_256(&[i])
    }

    fn filled() -> [Hash; 16] {
        let mut children = [NULL_HASH; 16];
        for (i, slot) in children.iter_mut().enumerate() {
            *slot = leaf(i as u8);
        }
        children
    }

    #[test]
    fn test_all_empty_root() {
        let children = [NULL_HASH; 16];
        assert_eq!(merkle_root(&children), combine(&NULL_HASH_8, &NULL_HASH_8));
    }

    #[test]
    fn test_proof_reconstructs_root_for_every_slot() {
        let children = filled();
        let root = merkle_root(&children);
        for me in 0..16u8 {
            let neighbors = merkle_proof(&children, me);
            assert_eq!(
                merkle_16(me, &children[me as usize], &neighbors),
                root,
                "slot {me} failed to reconstruct"
            );
        }
    }

    #[test]
    fn test_proof_rejects_wrong_leaf() {
        let children = filled();
        let root = merkle_root(&children);
        let neighbors = merkle_proof(&children, 5);
        assert_ne!(merkle_16(5, &leaf(6), &neighbors), root);
    }

    #[test]
    fn test_sparse_matches_full_for_all_pairs() {
        for me in 0..16u8 {
            for them in 0..16u8 {
                if me == them {
                    continue;
                }
                let mut children = [NULL_HASH; 16];
                children[me as usize] = leaf(me);
                children[them as usize] = leaf(them);
                assert_eq!(
                    sparse_merkle_16(me, &leaf(me), them, &leaf(them)),
                    merkle_root(&children),
                    "sparse/full mismatch at ({me}, {them})"
                );
            }
        }
    }

    proptest::proptest! {
        #[test]
        fn prop_sparse_matches_full_on_random_hashes(
            me in 0u8..16,
            them in 0u8..16,
            me_hash in proptest::prelude::any::<[u8; 32]>(),
            them_hash in proptest::prelude::any::<[u8; 32]>(),
        ) {
            proptest::prop_assume!(me != them);
            let mut children = [NULL_HASH; 16];
            children[me as usize] = me_hash;
            children[them as usize] = them_hash;
            proptest::prop_assert_eq!(
                sparse_merkle_16(me, &me_hash, them, &them_hash),
                merkle_root(&children)
            );
        }

        #[test]
        fn prop_reconstruction_inverts_proof(
            me in 0u8..16,
            seed in proptest::prelude::any::<[u8; 32]>(),
        ) {
            let mut children = [NULL_HASH; 16];
            for (i, slot) in children.iter_mut().enumerate() {
                let mut material = seed.to_vec();
                material.push(i as u8);
                *slot = blake2b_256(&material);
            }
            let neighbors = merkle_proof(&children, me);
            proptest::prop_assert_eq!(
                merkle_16(me, &children[me as usize], &neighbors),
                merkle_root(&children)
            );
        }
    }

    #[test]
    fn test_proof_over_sparse_children() {
        // neighbors of a mostly-empty branch collapse to the null ladder
        let mut children = [NULL_HASH; 16];
        children[0] = leaf(0);
        children[9] = leaf(9);
        let neighbors = merkle_proof(&children, 0);
        assert_eq!(neighbors[3], NULL_HASH);
        assert_eq!(neighbors[2], *NULL_HASH_2);
        assert_eq!(neighbors[1], *NULL_HASH_4);
        assert_eq!(
            merkle_16(0, &leaf(0), &neighbors),
            merkle_root(&children)
        );
    }
}
