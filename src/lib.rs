//! Jasypt-compatible password-based string encryption.
//!
//! Produces and consumes `base64(salt || AES-CBC ciphertext)` strings that
//! Jasypt's `StandardPBEStringEncryptor` (with the Bouncy Castle provider)
//! reads and writes for the same password, algorithm, salt size and
//! iteration count.
//!
//! ```no_run
//! use jasypt::{Algorithm, StandardPbeStringEncryptor};
//!
//! let jasypt = StandardPbeStringEncryptor::new(Algorithm::Sha256Aes256Cbc);
//! let encrypted = jasypt.encrypt("password", "secret value")?;
//! assert_eq!(jasypt.decrypt("password", &encrypted)?, "secret value");
//! # Ok::<(), jasypt::PbeError>(())
//! ```

pub mod algorithm;
pub mod config;
pub mod crypto;
mod encryptor;
mod error;
pub mod format;

pub use crate::algorithm::{Algorithm, CipherSuite, KeyDerivation};
pub use crate::config::{EncryptorConfig, SaltConfig, SaltOptions};
pub use crate::crypto::{
    FixedSaltGenerator, PaddingMode, RandomSaltGenerator, SaltGenerator, SaltStrategy, SaltValue,
};
pub use crate::encryptor::{DEFAULT_ITERATIONS, StandardPbeStringEncryptor};
pub use crate::error::PbeError;
