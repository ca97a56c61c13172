//! Salt sources: fresh OS randomness or a caller supplied constant.

use std::str::FromStr;

use getrandom::fill;
use serde::{Deserialize, Serialize};

use super::DEFAULT_SALT_SIZE;
use crate::error::PbeError;

/// Produces the salt prepended to every ciphertext.
pub trait SaltGenerator: Send + Sync {
    /// Salt length in bytes; also where decryption splits the payload.
    fn salt_size(&self) -> usize;

    fn generate_salt(&self) -> Result<Vec<u8>, PbeError>;
}

/// Fill buffer with cryptographically secure random bytes
fn secure_random(buf: &mut [u8]) -> Result<(), PbeError> {
    fill(buf).map_err(|_| PbeError::Random)
}

#[derive(Debug, Clone, Copy)]
pub struct RandomSaltGenerator {
    salt_size: usize,
}

impl RandomSaltGenerator {
    pub fn new(salt_size: usize) -> Self {
        Self { salt_size }
    }
}

impl Default for RandomSaltGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SALT_SIZE)
    }
}

impl SaltGenerator for RandomSaltGenerator {
    fn salt_size(&self) -> usize {
        self.salt_size
    }

    fn generate_salt(&self) -> Result<Vec<u8>, PbeError> {
        let mut salt = vec![0u8; self.salt_size];
        secure_random(&mut salt)?;
        Ok(salt)
    }
}

/// A fixed salt, either text (used as its UTF-8 bytes) or raw bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SaltValue {
    Text(String),
    Bytes(Vec<u8>),
}

impl SaltValue {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SaltValue::Text(text) => text.as_bytes(),
            SaltValue::Bytes(bytes) => bytes,
        }
    }
}

impl From<&str> for SaltValue {
    fn from(value: &str) -> Self {
        SaltValue::Text(value.to_string())
    }
}

impl From<String> for SaltValue {
    fn from(value: String) -> Self {
        SaltValue::Text(value)
    }
}

impl From<Vec<u8>> for SaltValue {
    fn from(value: Vec<u8>) -> Self {
        SaltValue::Bytes(value)
    }
}

impl From<&[u8]> for SaltValue {
    fn from(value: &[u8]) -> Self {
        SaltValue::Bytes(value.to_vec())
    }
}

/// Always returns the same salt. Makes encryption deterministic; meant for
/// tests and interop fixtures.
#[derive(Debug, Clone)]
pub struct FixedSaltGenerator {
    salt: Vec<u8>,
}

impl FixedSaltGenerator {
    /// # Errors
    ///
    /// Returns a configuration error if the salt is missing or empty, or if
    /// its length differs from `salt_size`.
    pub fn new(salt_size: usize, salt: Option<SaltValue>) -> Result<Self, PbeError> {
        let salt = match salt {
            Some(value) if !value.as_bytes().is_empty() => value.as_bytes().to_vec(),
            _ => return Err(PbeError::Configuration("salt not provided".to_string())),
        };

        if salt.len() != salt_size {
            return Err(PbeError::Configuration(format!(
                "fixed salt is {} bytes but the salt block size is {salt_size}",
                salt.len()
            )));
        }

        Ok(Self { salt })
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

impl SaltGenerator for FixedSaltGenerator {
    fn salt_size(&self) -> usize {
        self.salt.len()
    }

    fn generate_salt(&self) -> Result<Vec<u8>, PbeError> {
        Ok(self.salt.clone())
    }
}

/// Salt generator names accepted by string-based construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltStrategy {
    Random,
    Fixed,
}

impl FromStr for SaltStrategy {
    type Err = PbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Random" => Ok(SaltStrategy::Random),
            "Fixed" => Ok(SaltStrategy::Fixed),
            other => Err(PbeError::UnsupportedSaltGenerator(other.to_string())),
        }
    }
}
