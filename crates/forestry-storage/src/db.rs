use crate::error::{Result, StorageError};
use forestry_core::{BatchOp, Store};
use rocksdb::{ColumnFamilyDescriptor, Options, WriteBatch, DB};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Column family holding trie nodes and the root entry.
const CF_NODES: &str = "nodes";

/// RocksDB-backed node store.
///
/// Keys are 64-hex-character node hashes plus the reserved root entry;
/// values are the bincode encoding of the stored nodes.
pub struct NodeDb {
    db: Arc<DB>,
}

impl NodeDb {
    /// Open a node database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let cfs = vec![ColumnFamilyDescriptor::new(CF_NODES, Options::default())];
        let db = DB::open_cf_descriptors(&opts, path, cfs)?;
        debug!("opened node database");

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db
            .cf_handle(CF_NODES)
            .ok_or_else(|| StorageError::Database("CF_NODES not found".to_string()))
    }
}

impl Store for NodeDb {
    fn get(&self, key: &str) -> forestry_core::Result<Option<Vec<u8>>> {
        let cf = self.cf()?;
        let value = self
            .db
            .get_cf(cf, key.as_bytes())
            .map_err(StorageError::from)?;
        Ok(value)
    }

    fn put(&self, key: &str, value: Vec<u8>) -> forestry_core::Result<()> {
        let cf = self.cf()?;
        self.db
            .put_cf(cf, key.as_bytes(), value)
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn del(&self, key: &str) -> forestry_core::Result<()> {
        let cf = self.cf()?;
        self.db
            .delete_cf(cf, key.as_bytes())
            .map_err(StorageError::from)?;
        Ok(())
    }

    fn batch(&self, ops: Vec<BatchOp>) -> forestry_core::Result<()> {
        let cf = self.cf()?;
        let mut batch = WriteBatch::default();
        let count = ops.len();
        for op in ops {
            match op {
                BatchOp::Put(key, value) => batch.put_cf(cf, key.as_bytes(), value),
                BatchOp::Del(key) => batch.delete_cf(cf, key.as_bytes()),
            }
        }
        self.db.write(batch).map_err(StorageError::from)?;
        debug!(ops = count, "committed node batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_del_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = NodeDb::open(dir.path()).unwrap();

        db.put("aa", vec![1, 2, 3]).unwrap();
        assert_eq!(db.get("aa").unwrap(), Some(vec![1, 2, 3]));

        db.del("aa").unwrap();
        assert_eq!(db.get("aa").unwrap(), None);
    }

    #[test]
    fn test_batch_is_applied_whole() {
        let dir = tempfile::tempdir().unwrap();
        let db = NodeDb::open(dir.path()).unwrap();
        db.put("stale", vec![0]).unwrap();

        db.batch(vec![
            BatchOp::Del("stale".into()),
            BatchOp::Put("fresh".into(), vec![1]),
            BatchOp::Put("root".into(), vec![2]),
        ])
        .unwrap();

        assert_eq!(db.get("stale").unwrap(), None);
        assert_eq!(db.get("fresh").unwrap(), Some(vec![1]));
        assert_eq!(db.get("root").unwrap(), Some(vec![2]));
    }

    #[test]
    fn test_reopen_preserves_data() {
        let dir = tempfile::tempdir().unwrap();
        {
            let db = NodeDb::open(dir.path()).unwrap();
            db.put("key", vec![9]).unwrap();
        }
        let db = NodeDb::open(dir.path()).unwrap();
        assert_eq!(db.get("key").unwrap(), Some(vec![9]));
    }
}
