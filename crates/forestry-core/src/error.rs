use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForestryError {
    #[error("key is already present in the trie")]
    AlreadyPresent,

    #[error("key is not present in the trie")]
    NotPresent,

    #[error("cannot walk an empty trie")]
    EmptyTrie,

    #[error("proof does not verify against the expected root")]
    InvalidProof,

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for ForestryError {
    fn from(err: bincode::Error) -> Self {
        ForestryError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ForestryError>;
