//! # Forestry Cryptography
//!
//! Hashing primitives for the Merkle Patricia Forestry.
//!
//! ## Features
//! - blake2b-256 digests and pairwise combination
//! - Nibble-path addressing and parity-tagged suffix encoding
//! - 16-leaf sparse Merkle roots, proofs, and reconstruction
//!
//! This crate performs no I/O and is the dependency slice shared by the
//! proof verifier.

pub mod hash;
pub mod merkle;
pub mod nibble;

pub use hash::{blake2b_256, combine, Hash, NULL_HASH, NULL_HASH_2, NULL_HASH_4, NULL_HASH_8};
pub use merkle::{merkle_16, merkle_proof, merkle_root, sparse_merkle_16};
pub use nibble::{
    common_prefix_len, encode_suffix, hex_to_nibbles, nibble_at, nibbles, nibbles_to_hex, to_path,
    PATH_NIBBLES,
};
