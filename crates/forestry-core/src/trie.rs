//! The prover-side trie.
//!
//! A [`Forestry`] owns a [`Store`] and a root reference. Between mutations
//! the tree lives in the store; walks materialize nodes on demand and every
//! successful mutation commits one atomic batch (new nodes, removed nodes,
//! root update) before collapsing the touched path back to hash handles.

use crate::error::{ForestryError, Result};
use crate::node::{child_hashes, store_key, Node, NodeRef};
use crate::proof::{Neighbor, Proof, Step};
use crate::store::{read_root, BatchOp, MemoryStore, Store, ROOT_KEY};
use forestry_crypto::{
    blake2b_256, common_prefix_len, merkle_proof, merkle_root, nibble_at, nibbles, to_path, Hash,
    NULL_HASH, PATH_NIBBLES,
};
use tracing::debug;

/// An authenticated key-value store: a radix-16 Patricia trie whose branches
/// commit to their children through sparse Merkle trees.
pub struct Forestry<S: Store> {
    root: Option<NodeRef>,
    root_hash: Hash,
    store: S,
}

impl Forestry<MemoryStore> {
    /// Create a new empty trie over an in-memory store.
    pub fn new() -> Self {
        Self {
            root: None,
            root_hash: NULL_HASH,
            store: MemoryStore::new(),
        }
    }

    /// Build a trie from key-value pairs. The resulting root does not depend
    /// on the order of the pairs.
    pub fn from_list<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vec<u8>, Vec<u8>)>,
    {
        let mut trie = Self::new();
        for (key, value) in pairs {
            trie.insert(&key, &value)?;
        }
        Ok(trie)
    }
}

impl Default for Forestry<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Store> Forestry<S> {
    /// Open a trie over a store, reading the persisted root. A store without
    /// a root entry is initialized as empty.
    pub fn load(store: S) -> Result<Self> {
        let root_hash = match read_root(&store)? {
            Some(hash) => hash,
            None => {
                store.put(ROOT_KEY, hex::encode(NULL_HASH).into_bytes())?;
                NULL_HASH
            }
        };
        Ok(Self {
            root: (root_hash != NULL_HASH).then_some(NodeRef::Hash(root_hash)),
            root_hash,
            store,
        })
    }

    /// The current root hash; the all-zero hash for an empty trie.
    pub fn root(&self) -> Hash {
        self.root_hash
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of key-value pairs. Walks the trie, fetching paged-out nodes.
    pub fn len(&self) -> Result<usize> {
        match &self.root {
            None => Ok(0),
            Some(root) => {
                let node = root.materialize(&self.store)?;
                count_leaves(&node, &self.store)
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Look up the value held at `key`, if any.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let Some(root) = &self.root else {
            return Ok(None);
        };
        let path = to_path(key);
        let mut node = root.materialize(&self.store)?;
        let mut cursor = 0usize;
        loop {
            node = match node {
                Node::Leaf {
                    key: held_key,
                    value,
                    ..
                } => {
                    return Ok((held_key.as_slice() == key).then_some(value));
                }
                Node::Branch { prefix, children } => {
                    let rest = nibbles(&path, cursor, cursor + prefix.len());
                    if rest != prefix {
                        return Ok(None);
                    }
                    let nibble = nibble_at(&path, cursor + prefix.len()) as usize;
                    match &children[nibble] {
                        None => return Ok(None),
                        Some(child) => {
                            let next = child.materialize(&self.store)?;
                            cursor += prefix.len() + 1;
                            next
                        }
                    }
                }
            };
        }
    }

    /// Insert a key-value pair. Fails with [`ForestryError::AlreadyPresent`]
    /// when the key is already held, even under the same value.
    pub fn insert(&mut self, key: &[u8], value: &[u8]) -> Result<()> {
        let path = to_path(key);
        let mut stale = Vec::new();
        let outcome = match self.root.take() {
            None => Ok(Node::Leaf {
                suffix: nibbles(&path, 0, PATH_NIBBLES),
                key: key.to_vec(),
                value: value.to_vec(),
            }),
            Some(root) => insert_at(root, &self.store, &path, 0, key, value, &mut stale),
        };
        match outcome.and_then(|root| self.commit(Some(root), stale)) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Remove a key. Single-child branches left behind collapse so the trie
    /// stays canonical.
    pub fn delete(&mut self, key: &[u8]) -> Result<()> {
        let path = to_path(key);
        let mut stale = Vec::new();
        let outcome = match self.root.take() {
            None => Err(ForestryError::NotPresent),
            Some(root) => delete_at(root, &self.store, &path, 0, key, &mut stale),
        };
        match outcome.and_then(|root| self.commit(root, stale)) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Build a proof for `key`, walking from the root down to the target.
    ///
    /// When the key is absent and `allow_missing` is set, the partial proof
    /// is suitable for exclusion verification (and for inserting the key via
    /// the verifier).
    pub fn prove(&self, key: &[u8], allow_missing: bool) -> Result<Proof> {
        let path = to_path(key);
        let Some(root) = &self.root else {
            return if allow_missing {
                Ok(Proof::default())
            } else {
                Err(ForestryError::EmptyTrie)
            };
        };
        let mut steps = Vec::new();
        let mut node = root.materialize(&self.store)?;
        let mut cursor = 0usize;
        loop {
            node = match node {
                Node::Leaf {
                    key: held_key,
                    value: held_value,
                    ..
                } => {
                    if held_key.as_slice() == key {
                        return Ok(Proof::new(steps));
                    }
                    if !allow_missing {
                        return Err(ForestryError::NotPresent);
                    }
                    // the probed slot holds a diverging leaf; record it whole
                    let held_path = to_path(&held_key);
                    let skip = common_prefix_len(
                        &nibbles(&path, cursor, PATH_NIBBLES),
                        &nibbles(&held_path, cursor, PATH_NIBBLES),
                    );
                    steps.push(Step::Leaf {
                        skip,
                        key: held_path,
                        value: blake2b_256(&held_value),
                    });
                    return Ok(Proof::new(steps));
                }
                Node::Branch { prefix, children } => {
                    let rest = nibbles(&path, cursor, cursor + prefix.len());
                    let common = common_prefix_len(&prefix, &rest);
                    if common < prefix.len() {
                        // the target diverges inside this branch's prefix;
                        // the branch as a whole becomes the neighbor
                        if !allow_missing {
                            return Err(ForestryError::NotPresent);
                        }
                        steps.push(Step::Fork {
                            skip: common,
                            neighbor: Neighbor {
                                nibble: prefix[common],
                                prefix: prefix[common + 1..].to_vec(),
                                root: merkle_root(&child_hashes(&children)),
                            },
                        });
                        return Ok(Proof::new(steps));
                    }

                    let nibble = nibble_at(&path, cursor + prefix.len());
                    let hashes = child_hashes(&children);
                    let siblings: Vec<usize> = (0..children.len())
                        .filter(|i| *i != nibble as usize && children[*i].is_some())
                        .collect();
                    if siblings.len() == 1 && children[nibble as usize].is_some() {
                        let sibling_nibble = siblings[0];
                        let sibling = match &children[sibling_nibble] {
                            Some(child) => child.materialize(&self.store)?,
                            None => {
                                return Err(ForestryError::Store(
                                    "branch sibling vanished mid-walk".into(),
                                ))
                            }
                        };
                        match sibling {
                            Node::Branch {
                                prefix: sibling_prefix,
                                children: sibling_children,
                            } => {
                                steps.push(Step::Fork {
                                    skip: prefix.len(),
                                    neighbor: Neighbor {
                                        nibble: sibling_nibble as u8,
                                        prefix: sibling_prefix,
                                        root: merkle_root(&child_hashes(&sibling_children)),
                                    },
                                });
                            }
                            Node::Leaf {
                                key: sibling_key,
                                value: sibling_value,
                                ..
                            } => {
                                steps.push(Step::Leaf {
                                    skip: prefix.len(),
                                    key: to_path(&sibling_key),
                                    value: blake2b_256(&sibling_value),
                                });
                            }
                        }
                    } else {
                        steps.push(Step::Branch {
                            skip: prefix.len(),
                            neighbors: merkle_proof(&hashes, nibble),
                        });
                    }

                    match &children[nibble as usize] {
                        Some(child) => {
                            let next = child.materialize(&self.store)?;
                            cursor += prefix.len() + 1;
                            next
                        }
                        None => {
                            return if allow_missing {
                                Ok(Proof::new(steps))
                            } else {
                                Err(ForestryError::NotPresent)
                            };
                        }
                    }
                }
            };
        }
    }

    /// Fetch the sub-trie hanging at a nibble path, when that path is a
    /// prefix of the trie's structure.
    pub fn child_at(&self, nibble_path: &[u8]) -> Result<Option<Node>> {
        if let Some(bad) = nibble_path.iter().find(|n| **n >= 16) {
            return Err(ForestryError::MalformedInput(format!(
                "nibble {bad} out of range"
            )));
        }
        let Some(root) = &self.root else {
            return Ok(None);
        };
        let mut node = root.materialize(&self.store)?;
        let mut remaining = nibble_path;
        loop {
            if remaining.is_empty() {
                return Ok(Some(node));
            }
            node = match node {
                Node::Leaf { suffix, key, value } => {
                    return Ok(suffix
                        .starts_with(remaining)
                        .then_some(Node::Leaf { suffix, key, value }));
                }
                Node::Branch { prefix, children } => {
                    if remaining.len() <= prefix.len() {
                        return Ok(prefix
                            .starts_with(remaining)
                            .then_some(Node::Branch { prefix, children }));
                    }
                    if !remaining.starts_with(&prefix) {
                        return Ok(None);
                    }
                    let nibble = remaining[prefix.len()] as usize;
                    match &children[nibble] {
                        None => return Ok(None),
                        Some(child) => {
                            let next = child.materialize(&self.store)?;
                            remaining = &remaining[prefix.len() + 1..];
                            next
                        }
                    }
                }
            };
        }
    }

    /// Persist a mutation: deletions of replaced nodes, insertions of new
    /// ones, then the root update, in one atomic batch. On success the
    /// touched path collapses back to a hash handle.
    fn commit(&mut self, new_root: Option<Node>, stale: Vec<Hash>) -> Result<()> {
        let mut ops: Vec<BatchOp> = stale
            .into_iter()
            .map(|hash| BatchOp::Del(store_key(&hash)))
            .collect();
        let root_hash = match &new_root {
            Some(node) => collect_puts(node, &mut ops)?,
            None => NULL_HASH,
        };
        ops.push(BatchOp::Put(
            ROOT_KEY.to_string(),
            hex::encode(root_hash).into_bytes(),
        ));
        self.store.batch(ops)?;
        self.root_hash = root_hash;
        self.root = (root_hash != NULL_HASH).then_some(NodeRef::Hash(root_hash));
        debug!(root = %hex::encode(root_hash), "committed trie mutation");
        Ok(())
    }

    /// Drop any half-mutated in-memory state and fall back to the last
    /// persisted root. Callers resume from a consistent handle.
    fn reset(&mut self) {
        self.root = (self.root_hash != NULL_HASH).then_some(NodeRef::Hash(self.root_hash));
    }
}

fn count_leaves<S: Store>(node: &Node, store: &S) -> Result<usize> {
    match node {
        Node::Leaf { .. } => Ok(1),
        Node::Branch { children, .. } => {
            let mut total = 0;
            for child in children.iter().flatten() {
                let owned;
                let node = match child {
                    NodeRef::Node(node) => node.as_ref(),
                    NodeRef::Hash(hash) => {
                        owned = Node::fetch(store, hash)?;
                        &owned
                    }
                };
                total += count_leaves(node, store)?;
            }
            Ok(total)
        }
    }
}

/// Serialize every materialized node of a finished mutation, children first,
/// and return the subtree's hash.
fn collect_puts(node: &Node, ops: &mut Vec<BatchOp>) -> Result<Hash> {
    if let Node::Branch { children, .. } = node {
        for child in children.iter().flatten() {
            if let NodeRef::Node(child) = child {
                collect_puts(child, ops)?;
            }
        }
    }
    let hash = node.hash();
    ops.push(BatchOp::Put(store_key(&hash), node.to_bytes()?));
    Ok(hash)
}

/// Take ownership of a reference's node, recording its pre-mutation hash for
/// deletion from the store.
fn take_node<S: Store>(node_ref: NodeRef, store: &S, stale: &mut Vec<Hash>) -> Result<Node> {
    match node_ref {
        NodeRef::Node(node) => {
            stale.push(node.hash());
            Ok(*node)
        }
        NodeRef::Hash(hash) => {
            stale.push(hash);
            Node::fetch(store, &hash)
        }
    }
}

fn insert_at<S: Store>(
    node_ref: NodeRef,
    store: &S,
    path: &Hash,
    cursor: usize,
    key: &[u8],
    value: &[u8],
    stale: &mut Vec<Hash>,
) -> Result<Node> {
    let node = take_node(node_ref, store, stale)?;
    match node {
        Node::Leaf {
            suffix,
            key: held_key,
            value: held_value,
        } => {
            if held_key.as_slice() == key {
                return Err(ForestryError::AlreadyPresent);
            }
            // distinct keys hash to distinct paths, so the suffixes diverge
            let new_suffix = nibbles(path, cursor, PATH_NIBBLES);
            let common = common_prefix_len(&suffix, &new_suffix);
            let held_nibble = suffix[common] as usize;
            let new_nibble = new_suffix[common] as usize;
            let mut children: [Option<NodeRef>; 16] = Default::default();
            children[held_nibble] = Some(NodeRef::Node(Box::new(Node::Leaf {
                suffix: suffix[common + 1..].to_vec(),
                key: held_key,
                value: held_value,
            })));
            children[new_nibble] = Some(NodeRef::Node(Box::new(Node::Leaf {
                suffix: new_suffix[common + 1..].to_vec(),
                key: key.to_vec(),
                value: value.to_vec(),
            })));
            Ok(Node::Branch {
                prefix: new_suffix[..common].to_vec(),
                children,
            })
        }
        Node::Branch {
            prefix,
            mut children,
        } => {
            let rest = nibbles(path, cursor, cursor + prefix.len());
            let common = common_prefix_len(&prefix, &rest);
            if common == prefix.len() {
                // route into the child at the next nibble
                let nibble = nibble_at(path, cursor + common) as usize;
                let child_cursor = cursor + common + 1;
                let new_child = match children[nibble].take() {
                    None => Node::Leaf {
                        suffix: nibbles(path, child_cursor, PATH_NIBBLES),
                        key: key.to_vec(),
                        value: value.to_vec(),
                    },
                    Some(child) => insert_at(child, store, path, child_cursor, key, value, stale)?,
                };
                children[nibble] = Some(NodeRef::Node(Box::new(new_child)));
                Ok(Node::Branch { prefix, children })
            } else {
                // the new path diverges inside the prefix: split the branch
                let held_nibble = prefix[common] as usize;
                let new_nibble = nibble_at(path, cursor + common) as usize;
                let demoted = Node::Branch {
                    prefix: prefix[common + 1..].to_vec(),
                    children,
                };
                let mut split: [Option<NodeRef>; 16] = Default::default();
                split[held_nibble] = Some(NodeRef::Node(Box::new(demoted)));
                split[new_nibble] = Some(NodeRef::Node(Box::new(Node::Leaf {
                    suffix: nibbles(path, cursor + common + 1, PATH_NIBBLES),
                    key: key.to_vec(),
                    value: value.to_vec(),
                })));
                Ok(Node::Branch {
                    prefix: prefix[..common].to_vec(),
                    children: split,
                })
            }
        }
    }
}

fn delete_at<S: Store>(
    node_ref: NodeRef,
    store: &S,
    path: &Hash,
    cursor: usize,
    key: &[u8],
    stale: &mut Vec<Hash>,
) -> Result<Option<Node>> {
    let node = take_node(node_ref, store, stale)?;
    match node {
        Node::Leaf { key: held_key, .. } => {
            if held_key.as_slice() == key {
                Ok(None)
            } else {
                Err(ForestryError::NotPresent)
            }
        }
        Node::Branch {
            mut prefix,
            mut children,
        } => {
            let rest = nibbles(path, cursor, cursor + prefix.len());
            if rest != prefix {
                return Err(ForestryError::NotPresent);
            }
            let nibble = nibble_at(path, cursor + prefix.len()) as usize;
            let child = children[nibble]
                .take()
                .ok_or(ForestryError::NotPresent)?;
            match delete_at(child, store, path, cursor + prefix.len() + 1, key, stale)? {
                Some(kept) => {
                    children[nibble] = Some(NodeRef::Node(Box::new(kept)));
                    Ok(Some(Node::Branch { prefix, children }))
                }
                None => {
                    let populated = children.iter().filter(|c| c.is_some()).count();
                    if populated >= 2 {
                        return Ok(Some(Node::Branch { prefix, children }));
                    }
                    // a single child remains: the branch collapses into it,
                    // absorbing the routing nibble into the merged prefix
                    let (last_nibble, last) = children
                        .iter_mut()
                        .enumerate()
                        .find_map(|(i, c)| c.take().map(|c| (i as u8, c)))
                        .expect("a branch keeps at least two children");
                    let merged = take_node(last, store, stale)?;
                    prefix.push(last_nibble);
                    Ok(Some(match merged {
                        Node::Leaf { suffix, key, value } => {
                            prefix.extend_from_slice(&suffix);
                            Node::Leaf {
                                suffix: prefix,
                                key,
                                value,
                            }
                        }
                        Node::Branch {
                            prefix: child_prefix,
                            children,
                        } => {
                            prefix.extend_from_slice(&child_prefix);
                            Node::Branch { prefix, children }
                        }
                    }))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::leaf_hash;
    use std::sync::Arc;

    #[test]
    fn test_empty_trie_has_null_root() {
        let trie = Forestry::new();
        assert_eq!(trie.root(), NULL_HASH);
        assert!(trie.is_empty());
        assert_eq!(trie.len().unwrap(), 0);
    }

    #[test]
    fn test_insert_and_get() {
        let mut trie = Forestry::new();
        trie.insert(b"hello", b"world").unwrap();
        assert_eq!(trie.get(b"hello").unwrap(), Some(b"world".to_vec()));
        assert_eq!(trie.get(b"missing").unwrap(), None);
    }

    #[test]
    fn test_single_leaf_root_hash() {
        let mut trie = Forestry::new();
        trie.insert(b"foo", b"bar").unwrap();
        let path = to_path(b"foo");
        assert_eq!(
            trie.root(),
            leaf_hash(&nibbles(&path, 0, PATH_NIBBLES), &blake2b_256(b"bar"))
        );
    }

    #[test]
    fn test_duplicate_insert_fails_and_keeps_root() {
        let mut trie = Forestry::new();
        trie.insert(b"key", b"value").unwrap();
        let root = trie.root();
        assert!(matches!(
            trie.insert(b"key", b"value"),
            Err(ForestryError::AlreadyPresent)
        ));
        assert!(matches!(
            trie.insert(b"key", b"other"),
            Err(ForestryError::AlreadyPresent)
        ));
        assert_eq!(trie.root(), root);
        assert_eq!(trie.get(b"key").unwrap(), Some(b"value".to_vec()));
    }

    #[test]
    fn test_root_is_order_independent() {
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = (0..32u32)
            .map(|i| (format!("key_{i}").into_bytes(), format!("v{i}").into_bytes()))
            .collect();
        let forward = Forestry::from_list(pairs.clone()).unwrap();
        let mut reversed = pairs;
        reversed.reverse();
        let backward = Forestry::from_list(reversed).unwrap();
        assert_eq!(forward.root(), backward.root());
    }

    #[test]
    fn test_delete_matches_fresh_trie() {
        let mut with_all = Forestry::new();
        with_all.insert(b"aaa", b"1").unwrap();
        with_all.insert(b"bbb", b"2").unwrap();
        with_all.insert(b"ccc", b"3").unwrap();
        with_all.delete(b"bbb").unwrap();

        let mut without = Forestry::new();
        without.insert(b"aaa", b"1").unwrap();
        without.insert(b"ccc", b"3").unwrap();

        assert_eq!(with_all.root(), without.root());
        assert_eq!(with_all.len().unwrap(), 2);
    }

    #[test]
    fn test_insert_then_delete_is_identity() {
        let mut trie = Forestry::new();
        for i in 0..20u32 {
            trie.insert(format!("key_{i}").as_bytes(), b"v").unwrap();
        }
        let root = trie.root();
        trie.insert(b"ephemeral", b"x").unwrap();
        trie.delete(b"ephemeral").unwrap();
        assert_eq!(trie.root(), root);
    }

    #[test]
    fn test_delete_last_key_empties_trie() {
        let mut trie = Forestry::new();
        trie.insert(b"only", b"value").unwrap();
        trie.delete(b"only").unwrap();
        assert!(trie.is_empty());
        assert_eq!(trie.root(), NULL_HASH);
    }

    #[test]
    fn test_delete_missing_key_fails_and_keeps_root() {
        let mut trie = Forestry::new();
        trie.insert(b"exists", b"val").unwrap();
        let root = trie.root();
        assert!(matches!(
            trie.delete(b"ghost"),
            Err(ForestryError::NotPresent)
        ));
        assert_eq!(trie.root(), root);
        assert_eq!(trie.get(b"exists").unwrap(), Some(b"val".to_vec()));
    }

    #[test]
    fn test_many_keys_stress() {
        let mut trie = Forestry::new();
        for i in 0..200u32 {
            let key = format!("key_{i:04}");
            let value = format!("value_{i:04}");
            trie.insert(key.as_bytes(), value.as_bytes()).unwrap();
        }
        assert_eq!(trie.len().unwrap(), 200);
        for i in 0..200u32 {
            let key = format!("key_{i:04}");
            let value = format!("value_{i:04}");
            assert_eq!(trie.get(key.as_bytes()).unwrap(), Some(value.into_bytes()));
        }
    }

    #[test]
    fn test_reload_from_shared_store() {
        let store = Arc::new(MemoryStore::new());
        let mut trie = Forestry::load(Arc::clone(&store)).unwrap();
        trie.insert(b"persisted", b"yes").unwrap();
        trie.insert(b"another", b"entry").unwrap();
        let root = trie.root();
        drop(trie);

        let reloaded = Forestry::load(store).unwrap();
        assert_eq!(reloaded.root(), root);
        assert_eq!(reloaded.get(b"persisted").unwrap(), Some(b"yes".to_vec()));
        assert_eq!(reloaded.len().unwrap(), 2);
    }

    #[test]
    fn test_store_stays_compact_across_churn() {
        // replaced nodes are deleted by the mutation batch, so the store
        // holds exactly the live nodes plus the root entry
        let store = Arc::new(MemoryStore::new());
        let mut trie = Forestry::load(Arc::clone(&store)).unwrap();
        for i in 0..30u32 {
            trie.insert(format!("key_{i}").as_bytes(), b"v").unwrap();
        }
        for i in 0..30u32 {
            trie.delete(format!("key_{i}").as_bytes()).unwrap();
        }
        assert!(trie.is_empty());
        assert_eq!(store.len(), 1, "only the root entry should remain");
    }

    #[test]
    fn test_child_at_prefix_walk() {
        let mut trie = Forestry::new();
        trie.insert(b"foo", b"14").unwrap();
        trie.insert(b"bar", b"42").unwrap();

        let foo_path = to_path(b"foo");
        let first = nibbles(&foo_path, 0, 1);
        let child = trie.child_at(&first).unwrap();
        assert!(child.is_some());
        assert!(trie.child_at(&[16]).is_err());
    }

    #[test]
    fn test_prefix_collision_resistance() {
        let mut trie = Forestry::new();
        let prefixed_keys: [&[u8]; 8] = [
            b"aaaa1", b"aaaa2", b"aaab1", b"aaab2", b"aaba1", b"aaba2", b"abaa1", b"abaa2",
        ];
        for (i, key) in prefixed_keys.iter().enumerate() {
            trie.insert(key, format!("v{i}").as_bytes()).unwrap();
        }
        for (i, key) in prefixed_keys.iter().enumerate() {
            assert_eq!(
                trie.get(key).unwrap(),
                Some(format!("v{i}").into_bytes())
            );
        }
    }
}
