use crate::error::{ForestryError, Result};
use crate::store::Store;
use forestry_crypto::{blake2b_256, encode_suffix, merkle_root, Hash, NULL_HASH};
use serde::{Deserialize, Serialize};

/// Reference to a sub-trie: either a materialized node or a content-addressed
/// handle resolved against the store on demand.
#[derive(Debug, Clone)]
pub enum NodeRef {
    Node(Box<Node>),
    Hash(Hash),
}

/// A trie node. The empty trie is the absence of a node; empty child slots
/// are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// One key-value pair, plus the remaining nibbles of the key's path
    /// below the point this leaf hangs in the trie.
    Leaf {
        suffix: Vec<u8>,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    /// Interior node: the common nibble prefix of every descendant, plus
    /// sixteen child slots. At least two slots are always populated.
    Branch {
        prefix: Vec<u8>,
        children: [Option<NodeRef>; 16],
    },
}

/// Hash of a leaf: the parity-tagged suffix concatenated with the value
/// digest.
pub fn leaf_hash(suffix: &[u8], value_digest: &Hash) -> Hash {
    let mut buf = encode_suffix(suffix);
    buf.extend_from_slice(value_digest);
    blake2b_256(&buf)
}

/// Hash of a branch: the prefix nibbles (one byte each) concatenated with
/// the Merkle root of the sixteen child hashes.
pub fn branch_hash(prefix: &[u8], children_root: &Hash) -> Hash {
    let mut buf = Vec::with_capacity(prefix.len() + 32);
    buf.extend_from_slice(prefix);
    buf.extend_from_slice(children_root);
    blake2b_256(&buf)
}

impl NodeRef {
    /// The hash this reference resolves to, computing it when materialized.
    pub fn hash(&self) -> Hash {
        match self {
            NodeRef::Node(node) => node.hash(),
            NodeRef::Hash(hash) => *hash,
        }
    }

    /// An owned node: a clone when materialized, a store fetch otherwise.
    pub fn materialize<S: Store>(&self, store: &S) -> Result<Node> {
        match self {
            NodeRef::Node(node) => Ok((**node).clone()),
            NodeRef::Hash(hash) => Node::fetch(store, hash),
        }
    }
}

impl Node {
    pub fn hash(&self) -> Hash {
        match self {
            Node::Leaf { suffix, value, .. } => leaf_hash(suffix, &blake2b_256(value)),
            Node::Branch { prefix, children } => {
                branch_hash(prefix, &merkle_root(&child_hashes(children)))
            }
        }
    }

    /// Load and decode the node stored under `hash`.
    pub fn fetch<S: Store>(store: &S, hash: &Hash) -> Result<Node> {
        let key = store_key(hash);
        let bytes = store
            .get(&key)?
            .ok_or_else(|| ForestryError::Store(format!("missing node {key}")))?;
        let stored: StoredNode = bincode::deserialize(&bytes)?;
        Ok(stored.into())
    }

    /// Encode this node for persistence. Children are written as hashes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&StoredNode::from(self))?)
    }
}

/// Hashes of all sixteen child slots; empty slots contribute the null hash.
pub fn child_hashes(children: &[Option<NodeRef>; 16]) -> [Hash; 16] {
    let mut hashes = [NULL_HASH; 16];
    for (slot, child) in hashes.iter_mut().zip(children.iter()) {
        if let Some(child) = child {
            *slot = child.hash();
        }
    }
    hashes
}

/// Store key of a node: its hash, hex-encoded.
pub fn store_key(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Persistence representation: identical to [`Node`] with children
/// collapsed to their hashes.
#[derive(Serialize, Deserialize)]
enum StoredNode {
    Leaf {
        suffix: Vec<u8>,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Branch {
        prefix: Vec<u8>,
        children: [Option<Hash>; 16],
    },
}

impl From<&Node> for StoredNode {
    fn from(node: &Node) -> Self {
        match node {
            Node::Leaf { suffix, key, value } => StoredNode::Leaf {
                suffix: suffix.clone(),
                key: key.clone(),
                value: value.clone(),
            },
            Node::Branch { prefix, children } => {
                let mut hashes: [Option<Hash>; 16] = Default::default();
                for (slot, child) in hashes.iter_mut().zip(children.iter()) {
                    *slot = child.as_ref().map(NodeRef::hash);
                }
                StoredNode::Branch {
                    prefix: prefix.clone(),
                    children: hashes,
                }
            }
        }
    }
}

impl From<StoredNode> for Node {
    fn from(stored: StoredNode) -> Self {
        match stored {
            StoredNode::Leaf { suffix, key, value } => Node::Leaf { suffix, key, value },
            StoredNode::Branch { prefix, children } => {
                let mut refs: [Option<NodeRef>; 16] = Default::default();
                for (slot, hash) in refs.iter_mut().zip(children.into_iter()) {
                    *slot = hash.map(NodeRef::Hash);
                }
                Node::Branch {
                    prefix,
                    children: refs,
                }
            }
        }
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}

impl Eq for NodeRef {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use forestry_crypto::{nibbles, to_path, PATH_NIBBLES};

    #[test]
    fn test_leaf_hash_binds_suffix_parity() {
        let value_digest = blake2b_256(b"value");
        let even = leaf_hash(&[1, 2], &value_digest);
        let odd = leaf_hash(&[1, 2, 3], &value_digest);
        assert_ne!(even, odd);
    }

    #[test]
    fn test_single_leaf_hash_matches_formula() {
        let key = b"foo".to_vec();
        let value = b"bar".to_vec();
        let path = to_path(&key);
        let node = Node::Leaf {
            suffix: nibbles(&path, 0, PATH_NIBBLES),
            key,
            value: value.clone(),
        };
        assert_eq!(
            node.hash(),
            leaf_hash(&nibbles(&path, 0, PATH_NIBBLES), &blake2b_256(&value))
        );
    }

    #[test]
    fn test_stored_node_round_trip() {
        let store = MemoryStore::new();
        let key = b"apple".to_vec();
        let path = to_path(&key);
        let node = Node::Leaf {
            suffix: nibbles(&path, 3, PATH_NIBBLES),
            key,
            value: b"red".to_vec(),
        };
        let hash = node.hash();
        store.put(&store_key(&hash), node.to_bytes().unwrap()).unwrap();

        let loaded = Node::fetch(&store, &hash).unwrap();
        assert_eq!(loaded, node);
        assert_eq!(loaded.hash(), hash);
    }

    #[test]
    fn test_fetch_missing_node_errors() {
        let store = MemoryStore::new();
        assert!(matches!(
            Node::fetch(&store, &[9u8; 32]),
            Err(ForestryError::Store(_))
        ));
    }

    #[test]
    fn test_branch_children_round_trip_as_hashes() {
        let leaf = |key: &[u8], value: &[u8]| {
            let path = to_path(key);
            Node::Leaf {
                suffix: nibbles(&path, 1, PATH_NIBBLES),
                key: key.to_vec(),
                value: value.to_vec(),
            }
        };
        let a = leaf(b"a", b"1");
        let b = leaf(b"b", b"2");
        let mut children: [Option<NodeRef>; 16] = Default::default();
        children[0] = Some(NodeRef::Node(Box::new(a.clone())));
        children[7] = Some(NodeRef::Node(Box::new(b.clone())));
        let branch = Node::Branch {
            prefix: vec![],
            children,
        };

        let bytes = branch.to_bytes().unwrap();
        let stored: Node = {
            let decoded: StoredNode = bincode::deserialize(&bytes).unwrap();
            decoded.into()
        };
        // children come back as hash handles but the node hash is unchanged
        assert_eq!(stored.hash(), branch.hash());
        match stored {
            Node::Branch { children, .. } => {
                assert!(matches!(children[0], Some(NodeRef::Hash(h)) if h == a.hash()));
                assert!(matches!(children[7], Some(NodeRef::Hash(h)) if h == b.hash()));
            }
            _ => panic!("expected a branch"),
        }
    }
}
