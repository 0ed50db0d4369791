//! CBOR wire shape for proofs, as consumed on-chain.
//!
//! A proof is an indefinite-length list. Each step is tagged — branch 121,
//! fork 122, leaf 123 — wrapping a list of its fields in JSON order. A
//! branch's four neighbor hashes travel as one indefinite-length byte string
//! split into two 64-byte chunks, preserving the split the on-chain decoder
//! expects. A fork's neighbor is itself a tag-121 list `[nibble, prefix,
//! root]` with the prefix carried as one byte per nibble.
//!
//! The decoder also accepts definite-length framing.

use crate::error::{ForestryError, Result};
use crate::proof::{Neighbor, Proof, Step};
use ciborium_ll::{Decoder, Encoder, Header};
use forestry_crypto::Hash;

pub const TAG_BRANCH: u64 = 121;
pub const TAG_FORK: u64 = 122;
pub const TAG_LEAF: u64 = 123;

/// Tag of the fork neighbor record (first constructor).
const TAG_NEIGHBOR: u64 = 121;

/// Chunk size of the branch-neighbors byte string.
const NEIGHBOR_CHUNK: usize = 64;

fn cbor_err<E: std::fmt::Debug>(err: E) -> ForestryError {
    ForestryError::Serialization(format!("cbor: {err:?}"))
}

impl Proof {
    /// Encode for on-chain consumption.
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut encoder = Encoder::from(&mut out);
        encoder.push(Header::Array(None)).map_err(cbor_err)?;
        for step in self.iter() {
            match step {
                Step::Branch { skip, neighbors } => {
                    encoder.push(Header::Tag(TAG_BRANCH)).map_err(cbor_err)?;
                    encoder.push(Header::Array(Some(2))).map_err(cbor_err)?;
                    encoder
                        .push(Header::Positive(*skip as u64))
                        .map_err(cbor_err)?;
                    let mut concat = Vec::with_capacity(4 * 32);
                    for neighbor in neighbors {
                        concat.extend_from_slice(neighbor);
                    }
                    encoder
                        .bytes(&concat, Some(NEIGHBOR_CHUNK))
                        .map_err(cbor_err)?;
                }
                Step::Fork { skip, neighbor } => {
                    encoder.push(Header::Tag(TAG_FORK)).map_err(cbor_err)?;
                    encoder.push(Header::Array(Some(2))).map_err(cbor_err)?;
                    encoder
                        .push(Header::Positive(*skip as u64))
                        .map_err(cbor_err)?;
                    encoder.push(Header::Tag(TAG_NEIGHBOR)).map_err(cbor_err)?;
                    encoder.push(Header::Array(Some(3))).map_err(cbor_err)?;
                    encoder
                        .push(Header::Positive(neighbor.nibble as u64))
                        .map_err(cbor_err)?;
                    encoder.bytes(&neighbor.prefix, None).map_err(cbor_err)?;
                    encoder.bytes(&neighbor.root, None).map_err(cbor_err)?;
                }
                Step::Leaf { skip, key, value } => {
                    encoder.push(Header::Tag(TAG_LEAF)).map_err(cbor_err)?;
                    encoder.push(Header::Array(Some(3))).map_err(cbor_err)?;
                    encoder
                        .push(Header::Positive(*skip as u64))
                        .map_err(cbor_err)?;
                    encoder.bytes(key, None).map_err(cbor_err)?;
                    encoder.bytes(value, None).map_err(cbor_err)?;
                }
            }
        }
        encoder.push(Header::Break).map_err(cbor_err)?;
        Ok(out)
    }

    /// Decode a proof from its CBOR encoding.
    pub fn from_cbor(bytes: &[u8]) -> Result<Proof> {
        let mut decoder = Decoder::from(bytes);
        let count = match pull(&mut decoder)? {
            Header::Array(len) => len,
            other => {
                return Err(ForestryError::Serialization(format!(
                    "expected a proof list, got {other:?}"
                )))
            }
        };
        let mut steps = Vec::new();
        match count {
            Some(n) => {
                for _ in 0..n {
                    let tag = expect_tag(&mut decoder)?;
                    steps.push(decode_step(&mut decoder, tag)?);
                }
            }
            None => loop {
                match pull(&mut decoder)? {
                    Header::Break => break,
                    Header::Tag(tag) => steps.push(decode_step(&mut decoder, tag)?),
                    other => {
                        return Err(ForestryError::Serialization(format!(
                            "expected a tagged step, got {other:?}"
                        )))
                    }
                }
            },
        }
        Ok(Proof::new(steps))
    }
}

type SliceDecoder<'a> = Decoder<&'a [u8]>;

fn pull(decoder: &mut SliceDecoder) -> Result<Header> {
    decoder.pull().map_err(cbor_err)
}

fn expect_tag(decoder: &mut SliceDecoder) -> Result<u64> {
    match pull(decoder)? {
        Header::Tag(tag) => Ok(tag),
        other => Err(ForestryError::Serialization(format!(
            "expected a tagged step, got {other:?}"
        ))),
    }
}

fn expect_array(decoder: &mut SliceDecoder) -> Result<Option<usize>> {
    match pull(decoder)? {
        Header::Array(len) => Ok(len),
        other => Err(ForestryError::Serialization(format!(
            "expected a field list, got {other:?}"
        ))),
    }
}

fn expect_uint(decoder: &mut SliceDecoder) -> Result<u64> {
    match pull(decoder)? {
        Header::Positive(value) => Ok(value),
        other => Err(ForestryError::Serialization(format!(
            "expected an unsigned integer, got {other:?}"
        ))),
    }
}

fn read_bytes(decoder: &mut SliceDecoder) -> Result<Vec<u8>> {
    let len = match pull(decoder)? {
        Header::Bytes(len) => len,
        other => {
            return Err(ForestryError::Serialization(format!(
                "expected a byte string, got {other:?}"
            )))
        }
    };
    let mut out = Vec::new();
    let mut segments = decoder.bytes(len);
    while let Some(mut segment) = segments.pull().map_err(cbor_err)? {
        let mut chunk = [0u8; NEIGHBOR_CHUNK];
        while let Some(part) = segment.pull(&mut chunk).map_err(cbor_err)? {
            out.extend_from_slice(part);
        }
    }
    Ok(out)
}

fn read_hash(decoder: &mut SliceDecoder) -> Result<Hash> {
    let bytes = read_bytes(decoder)?;
    if bytes.len() != 32 {
        return Err(ForestryError::Serialization(format!(
            "expected a 32-byte hash, got {} bytes",
            bytes.len()
        )));
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

/// Consume the end of a field list: nothing for a definite list of the
/// right arity, the break marker for an indefinite one.
fn finish_array(decoder: &mut SliceDecoder, len: Option<usize>, arity: usize) -> Result<()> {
    match len {
        Some(n) if n == arity => Ok(()),
        Some(n) => Err(ForestryError::Serialization(format!(
            "expected {arity} fields, got {n}"
        ))),
        None => match pull(decoder)? {
            Header::Break => Ok(()),
            other => Err(ForestryError::Serialization(format!(
                "expected end of field list, got {other:?}"
            ))),
        },
    }
}

fn decode_step(decoder: &mut SliceDecoder, tag: u64) -> Result<Step> {
    match tag {
        TAG_BRANCH => {
            let len = expect_array(decoder)?;
            let skip = expect_uint(decoder)? as usize;
            let bytes = read_bytes(decoder)?;
            finish_array(decoder, len, 2)?;
            if bytes.len() != 4 * 32 {
                return Err(ForestryError::Serialization(format!(
                    "expected 128 neighbor bytes, got {}",
                    bytes.len()
                )));
            }
            let mut neighbors = [[0u8; 32]; 4];
            for (slot, chunk) in neighbors.iter_mut().zip(bytes.chunks(32)) {
                slot.copy_from_slice(chunk);
            }
            Ok(Step::Branch { skip, neighbors })
        }
        TAG_FORK => {
            let len = expect_array(decoder)?;
            let skip = expect_uint(decoder)? as usize;
            let neighbor_tag = expect_tag(decoder)?;
            if neighbor_tag != TAG_NEIGHBOR {
                return Err(ForestryError::Serialization(format!(
                    "unexpected fork neighbor tag {neighbor_tag}"
                )));
            }
            let neighbor_len = expect_array(decoder)?;
            let nibble = expect_uint(decoder)?;
            if nibble >= 16 {
                return Err(ForestryError::Serialization(format!(
                    "nibble {nibble} out of range"
                )));
            }
            let prefix = read_bytes(decoder)?;
            if let Some(bad) = prefix.iter().find(|n| **n >= 16) {
                return Err(ForestryError::Serialization(format!(
                    "prefix nibble {bad} out of range"
                )));
            }
            let root = read_hash(decoder)?;
            finish_array(decoder, neighbor_len, 3)?;
            finish_array(decoder, len, 2)?;
            Ok(Step::Fork {
                skip,
                neighbor: Neighbor {
                    nibble: nibble as u8,
                    prefix,
                    root,
                },
            })
        }
        TAG_LEAF => {
            let len = expect_array(decoder)?;
            let skip = expect_uint(decoder)? as usize;
            let key = read_hash(decoder)?;
            let value = read_hash(decoder)?;
            finish_array(decoder, len, 3)?;
            Ok(Step::Leaf { skip, key, value })
        }
        other => Err(ForestryError::Serialization(format!(
            "unknown step tag {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_proof() -> Proof {
        Proof::new(vec![
            Step::Branch {
                skip: 0,
                neighbors: [[1u8; 32], [2u8; 32], [3u8; 32], [4u8; 32]],
            },
            Step::Fork {
                skip: 4,
                neighbor: Neighbor {
                    nibble: 7,
                    prefix: vec![9, 10, 11],
                    root: [5u8; 32],
                },
            },
            Step::Leaf {
                skip: 1,
                key: [6u8; 32],
                value: [7u8; 32],
            },
        ])
    }

    #[test]
    fn test_cbor_round_trip() {
        let proof = sample_proof();
        let bytes = proof.to_cbor().unwrap();
        assert_eq!(Proof::from_cbor(&bytes).unwrap(), proof);
    }

    #[test]
    fn test_branch_framing() {
        let proof = Proof::new(vec![Step::Branch {
            skip: 0,
            neighbors: [[0xaa; 32], [0xbb; 32], [0xcc; 32], [0xdd; 32]],
        }]);
        let bytes = proof.to_cbor().unwrap();

        // indefinite proof list, tag 121, two-field list, skip 0
        assert_eq!(&bytes[..5], &[0x9f, 0xd8, 0x79, 0x82, 0x00]);
        // neighbors: indefinite byte string of two 64-byte chunks
        assert_eq!(bytes[5], 0x5f);
        assert_eq!(&bytes[6..8], &[0x58, 0x40]);
        assert_eq!(&bytes[8 + 64..8 + 66], &[0x58, 0x40]);
        // byte-string break, then list break
        assert_eq!(&bytes[bytes.len() - 2..], &[0xff, 0xff]);
    }

    #[test]
    fn test_step_tags() {
        let bytes = sample_proof().to_cbor().unwrap();
        // branch, fork, and leaf tags appear in order
        let tags: Vec<usize> = bytes
            .windows(2)
            .enumerate()
            .filter(|(_, w)| w[0] == 0xd8 && (0x79..=0x7b).contains(&w[1]))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(bytes[tags[0] + 1], 0x79);
        assert!(bytes[tags.last().unwrap() + 1] == 0x7b);
    }

    #[test]
    fn test_decoder_accepts_definite_framing() {
        // hand-rolled: definite one-element list holding a definite leaf step
        let mut bytes = vec![0x81, 0xd8, 0x7b, 0x83, 0x02, 0x58, 0x20];
        bytes.extend_from_slice(&[0x11; 32]);
        bytes.extend_from_slice(&[0x58, 0x20]);
        bytes.extend_from_slice(&[0x22; 32]);
        let proof = Proof::from_cbor(&bytes).unwrap();
        assert_eq!(
            proof.steps(),
            &[Step::Leaf {
                skip: 2,
                key: [0x11; 32],
                value: [0x22; 32],
            }]
        );
    }

    #[test]
    fn test_decoder_rejects_garbage() {
        assert!(Proof::from_cbor(&[0x00]).is_err());
        // unknown tag
        assert!(Proof::from_cbor(&[0x9f, 0xd8, 0x80, 0xff]).is_err());
        // truncated input
        let bytes = sample_proof().to_cbor().unwrap();
        assert!(Proof::from_cbor(&bytes[..bytes.len() - 3]).is_err());
    }

    #[test]
    fn test_empty_proof_encodes_to_bare_list() {
        let bytes = Proof::default().to_cbor().unwrap();
        assert_eq!(bytes, vec![0x9f, 0xff]);
        assert!(Proof::from_cbor(&bytes).unwrap().is_empty());
    }
}
