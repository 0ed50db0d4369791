use crate::error::{ForestryError, Result};
use forestry_crypto::Hash;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Reserved key under which the current root hash is persisted.
pub const ROOT_KEY: &str = "__root__";

/// A single operation inside an atomic write batch.
#[derive(Debug, Clone)]
pub enum BatchOp {
    Put(String, Vec<u8>),
    Del(String),
}

/// Content-addressed node storage.
///
/// Node keys are the 64-hex-character node hashes; the reserved [`ROOT_KEY`]
/// entry holds the current root hash in the same hex encoding. Empty tries
/// store the all-zero hash there.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn put(&self, key: &str, value: Vec<u8>) -> Result<()>;
    fn del(&self, key: &str) -> Result<()>;

    /// Apply all operations atomically, in order.
    fn batch(&self, ops: Vec<BatchOp>) -> Result<()>;
}

/// Read the persisted root hash, if any.
pub fn read_root<S: Store>(store: &S) -> Result<Option<Hash>> {
    match store.get(ROOT_KEY)? {
        Some(bytes) => {
            let text = std::str::from_utf8(&bytes)
                .map_err(|_| ForestryError::Store("root entry is not valid utf-8".into()))?;
            parse_hash(text).map(Some)
        }
        None => Ok(None),
    }
}

/// Decode a 64-hex-character hash.
pub fn parse_hash(text: &str) -> Result<Hash> {
    let bytes = hex::decode(text)
        .map_err(|e| ForestryError::MalformedInput(format!("invalid hash hex: {e}")))?;
    let mut hash = [0u8; 32];
    if bytes.len() != hash.len() {
        return Err(ForestryError::MalformedInput(format!(
            "expected a 32-byte hash, got {} bytes",
            bytes.len()
        )));
    }
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

impl<S: Store + ?Sized> Store for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        (**self).put(key, value)
    }

    fn del(&self, key: &str) -> Result<()> {
        (**self).del(key)
    }

    fn batch(&self, ops: Vec<BatchOp>) -> Result<()> {
        (**self).batch(ops)
    }
}

/// In-memory store backed by a hash map. The default backend for tries
/// built with [`crate::Forestry::new`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, the root entry included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn put(&self, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn del(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn batch(&self, ops: Vec<BatchOp>) -> Result<()> {
        let mut entries = self.entries.write();
        for op in ops {
            match op {
                BatchOp::Put(key, value) => {
                    entries.insert(key, value);
                }
                BatchOp::Del(key) => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}
