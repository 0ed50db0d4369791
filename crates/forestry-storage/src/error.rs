use forestry_core::ForestryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for StorageError {
    fn from(err: rocksdb::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

impl From<StorageError> for ForestryError {
    fn from(err: StorageError) -> Self {
        ForestryError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
