//! Transport format.
//!
//! ```text
//! base64( SALT (N) | AES-CBC CIPHERTEXT )
//! ```
//!
//! `N` is not stored; both sides must agree on the salt size.

use base64::{Engine, engine::general_purpose::STANDARD};

use crate::error::PbeError;

/// A decoded payload split into salt and ciphertext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    salt: Vec<u8>,
    ciphertext: Vec<u8>,
}

impl Payload {
    pub fn new(salt: Vec<u8>, ciphertext: Vec<u8>) -> Self {
        Self { salt, ciphertext }
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn into_ciphertext(self) -> Vec<u8> {
        self.ciphertext
    }
}

/// Decodes a transport string.
///
/// # Errors
///
/// Returns an error if:
/// - The string is not valid base64
/// - The payload has no room for the salt plus one cipher block
/// - The ciphertext is not a whole number of cipher blocks
pub fn parse(encoded: &str, salt_size: usize, block_size: usize) -> Result<Payload, PbeError> {
    let mut data = STANDARD.decode(encoded.trim())?;

    if data.len() < salt_size + block_size {
        return Err(PbeError::Format(format!(
            "payload is {} bytes, expected at least {} (salt) + {} (one block)",
            data.len(),
            salt_size,
            block_size
        )));
    }

    let ciphertext = data.split_off(salt_size);
    if ciphertext.len() % block_size != 0 {
        return Err(PbeError::Format(format!(
            "ciphertext length {} is not a multiple of the {block_size}-byte block size",
            ciphertext.len()
        )));
    }

    Ok(Payload::new(data, ciphertext))
}

/// Encodes salt and ciphertext as a transport string.
pub fn serialize(payload: &Payload) -> String {
    let mut buf = Vec::with_capacity(payload.salt.len() + payload.ciphertext.len());
    buf.extend_from_slice(&payload.salt);
    buf.extend_from_slice(&payload.ciphertext);
    STANDARD.encode(buf)
}
