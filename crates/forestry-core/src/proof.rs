use forestry_crypto::{nibbles_to_hex, Hash};
use std::fmt;

/// The sibling recorded by a fork step: the one other populated child of a
/// branch, itself a branch. `H(prefix || root)` is that child's node hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbor {
    /// Routing nibble of the sibling inside its parent.
    pub nibble: u8,
    /// The sibling branch's own prefix, one nibble value per byte.
    pub prefix: Vec<u8>,
    /// Merkle root over the sibling branch's sixteen children.
    pub root: Hash,
}

/// One level of a proof, recorded while descending from the root toward the
/// target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The level is a branch with at least two populated children besides
    /// the target slot; `neighbors` are the four sparse-Merkle siblings of
    /// that slot, top-down.
    Branch { skip: usize, neighbors: [Hash; 4] },
    /// The level is a branch with exactly one other populated child and it
    /// is a branch, recorded whole.
    Fork { skip: usize, neighbor: Neighbor },
    /// The level is a branch with exactly one other populated child and it
    /// is a leaf; its full path and value digest allow re-hashing it.
    Leaf { skip: usize, key: Hash, value: Hash },
}

impl Step {
    /// Number of prefix nibbles this level consumes.
    pub fn skip(&self) -> usize {
        match self {
            Step::Branch { skip, .. } | Step::Fork { skip, .. } | Step::Leaf { skip, .. } => *skip,
        }
    }
}

/// An ordered list of [`Step`]s, root first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Proof {
    steps: Vec<Step>,
}

impl Proof {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl From<Vec<Step>> for Proof {
    fn from(steps: Vec<Step>) -> Self {
        Self::new(steps)
    }
}

impl IntoIterator for Proof {
    type Item = Step;
    type IntoIter = std::vec::IntoIter<Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.into_iter()
    }
}

fn short(hash: &Hash) -> String {
    let full = hex::encode(hash);
    format!("{}..{}", &full[..8], &full[56..])
}

impl fmt::Display for Proof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "proof ({} steps)", self.steps.len())?;
        for (depth, step) in self.steps.iter().enumerate() {
            match step {
                Step::Branch { skip, neighbors } => {
                    writeln!(
                        f,
                        " #{depth} branch skip={skip} neighbors=[{}, {}, {}, {}]",
                        short(&neighbors[0]),
                        short(&neighbors[1]),
                        short(&neighbors[2]),
                        short(&neighbors[3]),
                    )?;
                }
                Step::Fork { skip, neighbor } => {
                    writeln!(
                        f,
                        " #{depth} fork   skip={skip} nibble={:x} prefix={} root={}",
                        neighbor.nibble,
                        nibbles_to_hex(&neighbor.prefix),
                        short(&neighbor.root),
                    )?;
                }
                Step::Leaf { skip, key, value } => {
                    writeln!(
                        f,
                        " #{depth} leaf   skip={skip} key={} value={}",
                        short(key),
                        short(value),
                    )?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_every_step() {
        let proof = Proof::new(vec![
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
                skip: 0,
                key: [6u8; 32],
                value: [7u8; 32],
            },
        ]);
        let rendered = proof.to_string();
        assert!(rendered.contains("3 steps"));
        assert!(rendered.contains("branch skip=0"));
        assert!(rendered.contains("fork   skip=4"));
        assert!(rendered.contains("prefix=9ab"));
        assert!(rendered.contains("leaf   skip=0"));
    }

    #[test]
    fn test_skip_accessor() {
        let step = Step::Leaf {
            skip: 3,
            key: [0u8; 32],
            value: [0u8; 32],
        };
        assert_eq!(step.skip(), 3);
    }
}
