//! Hash functions the merkle engine is parametric over
//!
//! The engine only ever needs two operations from a hash function: digest a
//! raw record into a leaf, and combine two digests into their parent. The
//! parent rule is fixed as `H(left ++ right)` with no separator or domain tag,
//! which is what `keccak256(abi.encodePacked(left, right))` computes on-chain.

use crate::core::error::MerkleError;
use crate::core::types::{Hash, HASH_SIZE};
use digest::consts::U32;
use digest::Digest;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

/// A 256-bit hash function usable for leaves and interior nodes
pub trait MerkleHasher: Send + Sync {
    /// Digest an arbitrary byte sequence
    fn hash(&self, data: &[u8]) -> Hash;

    /// Digest the concatenation `left ++ right`
    fn hash_pair(&self, left: &Hash, right: &Hash) -> Hash {
        let mut buf = [0u8; HASH_SIZE * 2];
        buf[..HASH_SIZE].copy_from_slice(left.as_bytes());
        buf[HASH_SIZE..].copy_from_slice(right.as_bytes());
        self.hash(&buf)
    }
}

impl<H: MerkleHasher + ?Sized> MerkleHasher for &H {
    fn hash(&self, data: &[u8]) -> Hash {
        (**self).hash(data)
    }

    fn hash_pair(&self, left: &Hash, right: &Hash) -> Hash {
        (**self).hash_pair(left, right)
    }
}

/// Adapter turning any RustCrypto [`Digest`] with 32-byte output into a [`MerkleHasher`]
pub struct DigestHasher<D> {
    _digest: PhantomData<fn() -> D>,
}

impl<D> DigestHasher<D> {
    pub fn new() -> Self {
        Self {
            _digest: PhantomData,
        }
    }
}

impl<D> Default for DigestHasher<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Clone for DigestHasher<D> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<D> Copy for DigestHasher<D> {}

impl<D> fmt::Debug for DigestHasher<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DigestHasher")
    }
}

impl<D: Digest<OutputSize = U32>> MerkleHasher for DigestHasher<D> {
    fn hash(&self, data: &[u8]) -> Hash {
        Hash::from_bytes(D::digest(data).into())
    }

    fn hash_pair(&self, left: &Hash, right: &Hash) -> Hash {
        let mut hasher = D::new();
        hasher.update(left.as_bytes());
        hasher.update(right.as_bytes());
        Hash::from_bytes(hasher.finalize().into())
    }
}

/// SHA-256
pub type Sha256Hasher = DigestHasher<sha2::Sha256>;

/// NIST SHA3-256
pub type Sha3Hasher = DigestHasher<sha3::Sha3_256>;

/// Keccak-256 as used by the EVM (`keccak256` in Solidity)
pub type Keccak256Hasher = DigestHasher<sha3::Keccak256>;

/// Runtime-selectable hash algorithm, used by configuration and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum HashAlgorithm {
    #[serde(rename = "sha256")]
    #[value(name = "sha256")]
    Sha256,
    #[serde(rename = "sha3-256")]
    #[value(name = "sha3-256")]
    Sha3_256,
    #[default]
    #[serde(rename = "keccak256")]
    #[value(name = "keccak256")]
    Keccak256,
}

impl HashAlgorithm {
    /// Canonical name, as accepted by `FromStr` and written to config files
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Keccak256 => "keccak256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = MerkleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha256" | "sha-256" | "sha2" => Ok(HashAlgorithm::Sha256),
            "sha3-256" | "sha3_256" | "sha3" => Ok(HashAlgorithm::Sha3_256),
            "keccak256" | "keccak-256" | "keccak" => Ok(HashAlgorithm::Keccak256),
            _ => Err(MerkleError::UnknownHashAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

impl MerkleHasher for HashAlgorithm {
    fn hash(&self, data: &[u8]) -> Hash {
        match self {
            HashAlgorithm::Sha256 => Sha256Hasher::new().hash(data),
            HashAlgorithm::Sha3_256 => Sha3Hasher::new().hash(data),
            HashAlgorithm::Keccak256 => Keccak256Hasher::new().hash(data),
        }
    }

    fn hash_pair(&self, left: &Hash, right: &Hash) -> Hash {
        match self {
            HashAlgorithm::Sha256 => Sha256Hasher::new().hash_pair(left, right),
            HashAlgorithm::Sha3_256 => Sha3Hasher::new().hash_pair(left, right),
            HashAlgorithm::Keccak256 => Keccak256Hasher::new().hash_pair(left, right),
        }
    }
}

/// Compute SHA-256 hash of data
pub fn sha256(data: &[u8]) -> Hash {
    Sha256Hasher::new().hash(data)
}

/// Compute Keccak-256 hash of data
pub fn keccak256(data: &[u8]) -> Hash {
    Keccak256Hasher::new().hash(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_known_vector() {
        // sha256("abc")
        assert_eq!(
            sha256(b"abc").to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_keccak256_known_vector() {
        // keccak256("") differs from sha3-256("")
        assert_eq!(
            keccak256(b"").to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            Sha3Hasher::new().hash(b"").to_hex(),
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        );
    }

    #[test]
    fn test_hash_pair_is_plain_concatenation() {
        let hash1 = sha256(b"first");
        let hash2 = sha256(b"second");

        let mut concat = Vec::new();
        concat.extend_from_slice(hash1.as_bytes());
        concat.extend_from_slice(hash2.as_bytes());

        let hasher = Sha256Hasher::new();
        assert_eq!(hasher.hash_pair(&hash1, &hash2), sha256(&concat));

        // Order should matter
        assert_ne!(hasher.hash_pair(&hash1, &hash2), hasher.hash_pair(&hash2, &hash1));
    }

    #[test]
    fn test_default_pair_rule_matches_streaming_override() {
        struct ViaDefault;
        impl MerkleHasher for ViaDefault {
            fn hash(&self, data: &[u8]) -> Hash {
                keccak256(data)
            }
        }

        let a = keccak256(b"a");
        let b = keccak256(b"b");
        assert_eq!(
            ViaDefault.hash_pair(&a, &b),
            Keccak256Hasher::new().hash_pair(&a, &b)
        );
    }

    #[test]
    fn test_algorithm_dispatch() {
        let data = b"alice -> bob";
        assert_eq!(HashAlgorithm::Sha256.hash(data), sha256(data));
        assert_eq!(HashAlgorithm::Keccak256.hash(data), keccak256(data));
        assert_eq!(
            HashAlgorithm::Sha3_256.hash(data),
            Sha3Hasher::new().hash(data)
        );
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("sha256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("SHA3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha3_256);
        assert_eq!("keccak".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Keccak256);
        assert!(matches!(
            "md5".parse::<HashAlgorithm>(),
            Err(MerkleError::UnknownHashAlgorithm { .. })
        ));
        for alg in [HashAlgorithm::Sha256, HashAlgorithm::Sha3_256, HashAlgorithm::Keccak256] {
            assert_eq!(alg.as_str().parse::<HashAlgorithm>().unwrap(), alg);
        }
    }
}
