//! Hash function adapters used by the key/IV generators.

use digest::{Digest, core_api::BlockSizeUser};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

/// A secure hash function as seen by the KDFs.
///
/// `hash` is a single fresh digest over the concatenation of `parts`; the
/// generators drive any re-hashing themselves.
pub trait DigestAdapter: Send + Sync {
    /// Human readable algorithm name.
    fn name(&self) -> &'static str;

    /// Output length in bytes (`u` in RFC 7292).
    fn digest_size(&self) -> usize;

    /// Internal block length in bytes (`v` in RFC 7292).
    fn block_size(&self) -> usize;

    /// Digest of `parts[0] || parts[1] || ...`.
    fn hash(&self, parts: &[&[u8]]) -> Vec<u8>;
}

impl<T: DigestAdapter + ?Sized> DigestAdapter for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn digest_size(&self) -> usize {
        (**self).digest_size()
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        (**self).hash(parts)
    }
}

fn hash_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        Digest::update(&mut hasher, *part);
    }
    hasher.finalize().to_vec()
}

/// SHA-256 (u = 32, v = 64).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Digest;

impl DigestAdapter for Sha256Digest {
    fn name(&self) -> &'static str {
        "SHA-256"
    }

    fn digest_size(&self) -> usize {
        <Sha256 as Digest>::output_size()
    }

    fn block_size(&self) -> usize {
        <Sha256 as BlockSizeUser>::block_size()
    }

    fn hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        hash_parts::<Sha256>(parts)
    }
}

/// MD5 (u = 16, v = 64). Only used by the legacy OpenSSL-style suite.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digest;

impl DigestAdapter for Md5Digest {
    fn name(&self) -> &'static str {
        "MD5"
    }

    fn digest_size(&self) -> usize {
        <Md5 as Digest>::output_size()
    }

    fn block_size(&self) -> usize {
        <Md5 as BlockSizeUser>::block_size()
    }

    fn hash(&self, parts: &[&[u8]]) -> Vec<u8> {
        hash_parts::<Md5>(parts)
    }
}

/// Digest algorithms a cipher suite can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Sha256,
    Md5,
}

impl DigestAlgorithm {
    pub fn adapter(self) -> Box<dyn DigestAdapter> {
        match self {
            DigestAlgorithm::Sha256 => Box::new(Sha256Digest),
            DigestAlgorithm::Md5 => Box::new(Md5Digest),
        }
    }
}
