//! Error types for the PBE codec.

use std::string::FromUtf8Error;

/// Errors produced while configuring or running an encryptor.
#[derive(Debug, thiserror::Error)]
pub enum PbeError {
    /// The algorithm name is not one of the supported PBE algorithms.
    #[error("algorithm '{0}' is not implemented")]
    UnsupportedAlgorithm(String),

    /// The salt generator name is neither `Random` nor `Fixed`.
    #[error("salt generator '{0}' is not implemented")]
    UnsupportedSaltGenerator(String),

    /// Invalid construction parameters (missing or mistyped fixed salt, bad sizes).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The transport string is not valid base64.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The decoded payload cannot be split into salt and ciphertext.
    #[error("malformed payload: {0}")]
    Format(String),

    /// Padding is out of range after decryption; the key material is almost
    /// certainly wrong (password, salt length or iteration count).
    #[error("invalid padding; wrong password or corrupted data")]
    Padding,

    /// Decrypted bytes are not UTF-8; usually the same cause as [`PbeError::Padding`].
    #[error("decrypted text is not valid UTF-8; wrong password or corrupted data")]
    InvalidUtf8(#[from] FromUtf8Error),

    /// The PKCS#12 KDF requires at least one hash iteration.
    #[error("iteration count must be >= 1")]
    InvalidIterations,

    /// The OS random generator could not produce a salt.
    #[error("OS random generator unavailable")]
    Random,

    /// The block cipher rejected its inputs.
    #[error("cipher error: {0}")]
    Cipher(String),
}

impl PbeError {
    /// Construction-time errors: unknown names or an invalid salt setup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PbeError::UnsupportedAlgorithm(_)
                | PbeError::UnsupportedSaltGenerator(_)
                | PbeError::Configuration(_)
        )
    }

    /// Decode-time errors: the input could not be parsed at all.
    pub fn is_format(&self) -> bool {
        matches!(self, PbeError::Base64(_) | PbeError::Format(_))
    }

    /// Errors callers should treat as an authentication failure.
    pub fn is_authentication(&self) -> bool {
        matches!(self, PbeError::Padding | PbeError::InvalidUtf8(_))
    }
}
