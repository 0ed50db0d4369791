//! # Forestry Core
//!
//! The Merkle Patricia Forestry trie engine: an authenticated key-value
//! store combining a radix-16 Patricia trie with per-node sparse Merkle
//! sub-trees.
//!
//! The prover side ([`Forestry`]) owns the full trie over a [`Store`] and
//! produces succinct proofs. The verifier side ([`Commitment`]) holds only a
//! 32-byte root and decides membership, non-membership, insertion, deletion,
//! and updates from proofs alone.

pub mod cbor;
pub mod error;
pub mod json;
pub mod node;
pub mod proof;
pub mod store;
pub mod trie;
pub mod verify;

pub use cbor::{TAG_BRANCH, TAG_FORK, TAG_LEAF};
pub use error::{ForestryError, Result};
pub use node::{branch_hash, leaf_hash, Node, NodeRef};
pub use proof::{Neighbor, Proof, Step};
pub use store::{parse_hash, read_root, BatchOp, MemoryStore, Store, ROOT_KEY};
pub use trie::Forestry;
pub use verify::{verify, Commitment, Mode};
