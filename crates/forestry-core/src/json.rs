//! JSON wire shape for proofs.
//!
//! Steps serialize as tagged objects:
//! `{"type":"branch","skip":N,"neighbors":"<hex of 128 bytes>"}`,
//! `{"type":"fork","skip":N,"neighbor":{"nibble":N,"prefix":"<one hex digit
//! per nibble>","root":"<hex-32>"}}`,
//! `{"type":"leaf","skip":N,"neighbor":{"key":"<hex-32>","value":"<hex-32>"}}`.

use crate::error::ForestryError;
use crate::proof::{Neighbor, Proof, Step};
use crate::store::parse_hash;
use forestry_crypto::{hex_to_nibbles, nibbles_to_hex};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum StepRepr {
    Branch { skip: usize, neighbors: String },
    Fork { skip: usize, neighbor: ForkNeighborRepr },
    Leaf { skip: usize, neighbor: LeafNeighborRepr },
}

#[derive(Serialize, Deserialize)]
struct ForkNeighborRepr {
    nibble: u8,
    prefix: String,
    root: String,
}

#[derive(Serialize, Deserialize)]
struct LeafNeighborRepr {
    key: String,
    value: String,
}

impl From<&Step> for StepRepr {
    fn from(step: &Step) -> Self {
        match step {
            Step::Branch { skip, neighbors } => {
                let mut concat = Vec::with_capacity(128);
                for neighbor in neighbors {
                    concat.extend_from_slice(neighbor);
                }
                StepRepr::Branch {
                    skip: *skip,
                    neighbors: hex::encode(concat),
                }
            }
            Step::Fork { skip, neighbor } => StepRepr::Fork {
                skip: *skip,
                neighbor: ForkNeighborRepr {
                    nibble: neighbor.nibble,
                    prefix: nibbles_to_hex(&neighbor.prefix),
                    root: hex::encode(neighbor.root),
                },
            },
            Step::Leaf { skip, key, value } => StepRepr::Leaf {
                skip: *skip,
                neighbor: LeafNeighborRepr {
                    key: hex::encode(key),
                    value: hex::encode(value),
                },
            },
        }
    }
}

impl TryFrom<StepRepr> for Step {
    type Error = ForestryError;

    fn try_from(repr: StepRepr) -> Result<Self, Self::Error> {
        match repr {
            StepRepr::Branch { skip, neighbors } => {
                let bytes = hex::decode(&neighbors)
                    .map_err(|e| ForestryError::MalformedInput(format!("neighbors hex: {e}")))?;
                if bytes.len() != 128 {
                    return Err(ForestryError::MalformedInput(format!(
                        "expected 128 neighbor bytes, got {}",
                        bytes.len()
                    )));
                }
                let mut hashes = [[0u8; 32]; 4];
                for (slot, chunk) in hashes.iter_mut().zip(bytes.chunks(32)) {
                    slot.copy_from_slice(chunk);
                }
                Ok(Step::Branch {
                    skip,
                    neighbors: hashes,
                })
            }
            StepRepr::Fork { skip, neighbor } => {
                if neighbor.nibble >= 16 {
                    return Err(ForestryError::MalformedInput(format!(
                        "nibble {} out of range",
                        neighbor.nibble
                    )));
                }
                let prefix = hex_to_nibbles(&neighbor.prefix).ok_or_else(|| {
                    ForestryError::MalformedInput(format!(
                        "invalid prefix digits: {}",
                        neighbor.prefix
                    ))
                })?;
                Ok(Step::Fork {
                    skip,
                    neighbor: Neighbor {
                        nibble: neighbor.nibble,
                        prefix,
                        root: parse_hash(&neighbor.root)?,
                    },
                })
            }
            StepRepr::Leaf { skip, neighbor } => Ok(Step::Leaf {
                skip,
                key: parse_hash(&neighbor.key)?,
                value: parse_hash(&neighbor.value)?,
            }),
        }
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        StepRepr::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = StepRepr::deserialize(deserializer)?;
        Step::try_from(repr).map_err(serde::de::Error::custom)
    }
}

impl Serialize for Proof {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.steps().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Proof {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Proof::new(Vec::<Step>::deserialize(deserializer)?))
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
    fn test_json_round_trip() {
        let proof = sample_proof();
        let text = serde_json::to_string(&proof).unwrap();
        let back: Proof = serde_json::from_str(&text).unwrap();
        assert_eq!(back, proof);
    }

    #[test]
    fn test_json_shape() {
        let proof = sample_proof();
        let value: serde_json::Value = serde_json::to_value(&proof).unwrap();
        let steps = value.as_array().unwrap();

        assert_eq!(steps[0]["type"], "branch");
        assert_eq!(steps[0]["neighbors"].as_str().unwrap().len(), 256);

        assert_eq!(steps[1]["type"], "fork");
        assert_eq!(steps[1]["neighbor"]["nibble"], 7);
        assert_eq!(steps[1]["neighbor"]["prefix"], "9ab");

        assert_eq!(steps[2]["type"], "leaf");
        assert!(steps[2]["neighbor"]["key"].is_string());
        assert!(steps[2]["neighbor"]["value"].is_string());
    }

    #[test]
    fn test_json_rejects_malformed_steps() {
        let truncated = r#"[{"type":"branch","skip":0,"neighbors":"abcd"}]"#;
        assert!(serde_json::from_str::<Proof>(truncated).is_err());

        let bad_nibble =
            r#"[{"type":"fork","skip":0,"neighbor":{"nibble":16,"prefix":"","root":""}}]"#;
        assert!(serde_json::from_str::<Proof>(bad_nibble).is_err());

        let odd_prefix_is_fine = format!(
            r#"[{{"type":"fork","skip":0,"neighbor":{{"nibble":3,"prefix":"abc","root":"{}"}}}}]"#,
            "00".repeat(32)
        );
        let proof: Proof = serde_json::from_str(&odd_prefix_is_fine).unwrap();
        assert_eq!(
            proof.steps()[0],
            Step::Fork {
                skip: 0,
                neighbor: Neighbor {
                    nibble: 3,
                    prefix: vec![0xa, 0xb, 0xc],
                    root: [0u8; 32],
                },
            }
        );
    }
}
