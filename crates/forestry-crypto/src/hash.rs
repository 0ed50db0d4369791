use blake2::{Blake2b, Digest};
use digest::consts::U32;
use lazy_static::lazy_static;

pub type Hash = [u8; 32];

/// Hash of the empty trie and of any empty sub-slot.
pub const NULL_HASH: Hash = [0u8; 32];

type Blake2b256 = Blake2b<U32>;

/// blake2b-256 hash function
pub fn blake2b_256(data: &[u8]) -> Hash {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&result);
    hash
}

/// Hash two nodes together: `H(left || right)`
pub fn combine(left: &Hash, right: &Hash) -> Hash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(left);
    buf[32..].copy_from_slice(right);
    blake2b_256(&buf)
}

lazy_static! {
    /// Root of two empty Merkle leaves.
    pub static ref NULL_HASH_2: Hash = combine(&NULL_HASH, &NULL_HASH);
    /// Root of four empty Merkle leaves.
    pub static ref NULL_HASH_4: Hash = combine(&NULL_HASH_2, &NULL_HASH_2);
    /// Root of eight empty Merkle leaves.
    pub static ref NULL_HASH_8: Hash = combine(&NULL_HASH_4, &NULL_HASH_4);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blake2b_256_len() {
        let hash = blake2b_256(b"hello world");
        assert_eq!(hash.len(), 32);
        assert_ne!(hash, NULL_HASH);
    }

    #[test]
    fn test_blake2b_256_known_vector() {
        // blake2b-256 of the empty string
        let hash = blake2b_256(b"");
        assert_eq!(
            hex::encode(hash),
            "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
        );
    }

    #[test]
    fn test_combine_is_concat_then_hash() {
        let l = blake2b_256(b"left");
        let r = blake2b_256(b"right");
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&l);
        buf.extend_from_slice(&r);
        assert_eq!(combine(&l, &r), blake2b_256(&buf));
        assert_ne!(combine(&l, &r), combine(&r, &l));
    }

    #[test]
    fn test_null_hash_ladder() {
        assert_eq!(*NULL_HASH_2, combine(&NULL_HASH, &NULL_HASH));
        assert_eq!(*NULL_HASH_4, combine(&NULL_HASH_2, &NULL_HASH_2));
        assert_eq!(*NULL_HASH_8, combine(&NULL_HASH_4, &NULL_HASH_4));
    }
}
