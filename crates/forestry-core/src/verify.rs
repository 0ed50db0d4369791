//! Proof verification.
//!
//! Verification is total: it recomputes a root hash from a path, an optional
//! value digest, and a list of steps, and leaves the comparison with a
//! claimed root to the caller. It performs no I/O and allocates only small
//! nibble buffers.

use crate::error::{ForestryError, Result};
use crate::node::{branch_hash, leaf_hash};
use crate::proof::{Proof, Step};
use forestry_crypto::{
    blake2b_256, merkle_16, nibble_at, nibbles, sparse_merkle_16, to_path, Hash, NULL_HASH,
    PATH_NIBBLES,
};

/// Whether a proof shows the target present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Including,
    Excluding,
}

/// Recompute the root committed to by `steps` for the given path.
///
/// In [`Mode::Including`] the value digest is required and the recomputed
/// root is that of a trie holding the target pair. In [`Mode::Excluding`]
/// the value is ignored and the root is that of a trie without the target.
pub fn verify(
    path: &Hash,
    value_digest: Option<&Hash>,
    steps: &[Step],
    mode: Mode,
) -> Result<Hash> {
    walk(path, value_digest, steps, 0, mode)
}

fn walk(
    path: &Hash,
    value_digest: Option<&Hash>,
    steps: &[Step],
    cursor: usize,
    mode: Mode,
) -> Result<Hash> {
    let Some((step, rest)) = steps.split_first() else {
        return match mode {
            Mode::Including => {
                let digest = value_digest.ok_or_else(|| {
                    ForestryError::MalformedInput(
                        "inclusion verification requires a value".into(),
                    )
                })?;
                Ok(leaf_hash(&nibbles(path, cursor, PATH_NIBBLES), digest))
            }
            Mode::Excluding => Ok(NULL_HASH),
        };
    };

    match step {
        Step::Branch { skip, neighbors } => {
            let next = checked_cursor(cursor, *skip)?;
            let me = walk(path, value_digest, rest, next, mode)?;
            let nibble = nibble_at(path, next - 1);
            let children_root = merkle_16(nibble, &me, neighbors);
            Ok(branch_hash(&nibbles(path, cursor, next - 1), &children_root))
        }
        Step::Fork { skip, neighbor } => {
            if neighbor.nibble >= 16 {
                return Err(ForestryError::MalformedInput(format!(
                    "fork neighbor nibble {} out of range",
                    neighbor.nibble
                )));
            }
            if mode == Mode::Excluding && rest.is_empty() {
                // without the target the branch collapses onto the sibling;
                // the skipped nibbles are taken from the caller's path
                if cursor + skip > PATH_NIBBLES {
                    return Err(ForestryError::MalformedInput("skip overruns path".into()));
                }
                let mut preimage = nibbles(path, cursor, cursor + skip);
                preimage.push(neighbor.nibble);
                preimage.extend_from_slice(&neighbor.prefix);
                preimage.extend_from_slice(&neighbor.root);
                return Ok(blake2b_256(&preimage));
            }
            let next = checked_cursor(cursor, *skip)?;
            let me = walk(path, value_digest, rest, next, mode)?;
            let nibble = nibble_at(path, next - 1);
            if neighbor.nibble == nibble {
                return Err(ForestryError::MalformedInput(
                    "fork neighbor collides with the target nibble".into(),
                ));
            }
            let mut preimage = neighbor.prefix.clone();
            preimage.extend_from_slice(&neighbor.root);
            let neighbor_hash = blake2b_256(&preimage);
            let children_root = sparse_merkle_16(nibble, &me, neighbor.nibble, &neighbor_hash);
            Ok(branch_hash(&nibbles(path, cursor, next - 1), &children_root))
        }
        Step::Leaf {
            skip,
            key: neighbor_path,
            value: neighbor_value,
        } => {
            if nibbles(neighbor_path, 0, cursor) != nibbles(path, 0, cursor) {
                return Err(ForestryError::MalformedInput(
                    "leaf neighbor diverges from the consumed path".into(),
                ));
            }
            if mode == Mode::Excluding && rest.is_empty() {
                // without the target the branch collapses onto the sibling
                // leaf, re-anchored at the current depth
                return Ok(leaf_hash(
                    &nibbles(neighbor_path, cursor, PATH_NIBBLES),
                    neighbor_value,
                ));
            }
            let next = checked_cursor(cursor, *skip)?;
            let me = walk(path, value_digest, rest, next, mode)?;
            let nibble = nibble_at(path, next - 1);
            let neighbor_nibble = nibble_at(neighbor_path, next - 1);
            if neighbor_nibble == nibble {
                return Err(ForestryError::MalformedInput(
                    "leaf neighbor collides with the target nibble".into(),
                ));
            }
            let neighbor_hash = leaf_hash(
                &nibbles(neighbor_path, next, PATH_NIBBLES),
                neighbor_value,
            );
            let children_root = sparse_merkle_16(nibble, &me, neighbor_nibble, &neighbor_hash);
            Ok(branch_hash(&nibbles(path, cursor, next - 1), &children_root))
        }
    }
}

fn checked_cursor(cursor: usize, skip: usize) -> Result<usize> {
    let next = cursor + 1 + skip;
    if next > PATH_NIBBLES {
        return Err(ForestryError::MalformedInput("skip overruns path".into()));
    }
    Ok(next)
}

/// A 32-byte root commitment, the verifier-side handle over a trie.
///
/// All operations are purely computational: they re-derive roots from
/// proofs and compare. An invalid proof can never produce a new commitment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commitment {
    root: Hash,
}

impl Commitment {
    /// The commitment of the empty trie.
    pub fn empty() -> Self {
        Self { root: NULL_HASH }
    }

    /// Wrap a known 32-byte root.
    pub fn from_root(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(ForestryError::MalformedInput(format!(
                "expected a 32-byte root, got {} bytes",
                bytes.len()
            )));
        }
        let mut root = [0u8; 32];
        root.copy_from_slice(bytes);
        Ok(Self { root })
    }

    pub fn root(&self) -> Hash {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root == NULL_HASH
    }

    /// Does the trie hold exactly this key-value pair?
    pub fn has(&self, key: &[u8], value: &[u8], proof: &Proof) -> bool {
        let path = to_path(key);
        let digest = blake2b_256(value);
        verify(&path, Some(&digest), proof.steps(), Mode::Including)
            .map(|root| root == self.root)
            .unwrap_or(false)
    }

    /// Is this key absent from the trie?
    pub fn miss(&self, key: &[u8], proof: &Proof) -> bool {
        let path = to_path(key);
        verify(&path, None, proof.steps(), Mode::Excluding)
            .map(|root| root == self.root)
            .unwrap_or(false)
    }

    /// Advance the commitment by inserting a pair shown absent by `proof`.
    pub fn insert(&self, key: &[u8], value: &[u8], proof: &Proof) -> Result<Commitment> {
        if !self.miss(key, proof) {
            return Err(ForestryError::InvalidProof);
        }
        let path = to_path(key);
        let digest = blake2b_256(value);
        let root = verify(&path, Some(&digest), proof.steps(), Mode::Including)?;
        Ok(Commitment { root })
    }

    /// Advance the commitment by deleting a pair shown present by `proof`.
    pub fn delete(&self, key: &[u8], value: &[u8], proof: &Proof) -> Result<Commitment> {
        if !self.has(key, value, proof) {
            return Err(ForestryError::InvalidProof);
        }
        let path = to_path(key);
        let root = verify(&path, None, proof.steps(), Mode::Excluding)?;
        Ok(Commitment { root })
    }

    /// Replace the value under a key, reusing one proof for both the old and
    /// the new value (one hash recomputation fewer than delete-then-insert).
    pub fn update(&self, key: &[u8], proof: &Proof, old: &[u8], new: &[u8]) -> Result<Commitment> {
        if !self.has(key, old, proof) {
            return Err(ForestryError::InvalidProof);
        }
        let path = to_path(key);
        let digest = blake2b_256(new);
        let root = verify(&path, Some(&digest), proof.steps(), Mode::Including)?;
        Ok(Commitment { root })
    }
}
