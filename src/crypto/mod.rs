//! Cryptographic building blocks for the PBE codec.
//!
//! Provides digest adapters, salt sources, the PKCS#12 and OpenSSL-style
//! key/IV generators, PKCS#7 padding and raw AES-CBC.

pub mod aes_cbc;
pub mod hash;
pub mod kdf;
pub mod openssl;
pub mod padding;
pub mod salt;

pub use hash::{DigestAdapter, DigestAlgorithm, Md5Digest, Sha256Digest};
pub use kdf::{
    DerivedParameters, IV_MATERIAL, KEY_MATERIAL, MAC_MATERIAL, ParameterGenerator,
    Pkcs12ParameterGenerator,
};
pub use openssl::OpenSslParameterGenerator;
pub use padding::PaddingMode;
pub use salt::{FixedSaltGenerator, RandomSaltGenerator, SaltGenerator, SaltStrategy, SaltValue};

/// AES block size in bytes (16 bytes / 128 bits).
pub const AES_BLOCK_SIZE: usize = 16;
/// Default salt length (16 bytes).
pub const DEFAULT_SALT_SIZE: usize = 16;
/// Key size of the 256-bit AES suites.
pub const KEY_SIZE_256: usize = 256;
/// Key size of the 128-bit AES suites.
pub const KEY_SIZE_128: usize = 128;
/// IV size shared by every AES-CBC suite (one AES block).
pub const DEFAULT_IV_SIZE: usize = 128;
