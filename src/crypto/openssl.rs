//! OpenSSL `EVP_BytesToKey`-style key/IV generation.
//!
//! Used by `PBEWITHMD5AND128BITAES-CBC-OPENSSL`. Bouncy Castle's
//! `OpenSSLPBEParametersGenerator` hashes once per output block and ignores the
//! PBE iteration count.

use zeroize::Zeroizing;

use super::{
    DEFAULT_IV_SIZE, KEY_SIZE_128,
    hash::DigestAdapter,
    kdf::{DerivedParameters, ParameterGenerator},
};
use crate::error::PbeError;

#[derive(Debug, Clone)]
pub struct OpenSslParameterGenerator<D> {
    digest: D,
    key_size_bits: usize,
    iv_size_bits: usize,
}

impl<D: DigestAdapter> OpenSslParameterGenerator<D> {
    /// 128-bit key and 128-bit IV.
    pub fn new(digest: D) -> Self {
        Self {
            digest,
            key_size_bits: KEY_SIZE_128,
            iv_size_bits: DEFAULT_IV_SIZE,
        }
    }

    pub fn with_sizes(mut self, key_size_bits: usize, iv_size_bits: usize) -> Self {
        self.key_size_bits = key_size_bits;
        self.iv_size_bits = iv_size_bits;
        self
    }

    /// Produce `size` bytes: `D_i = H(D_{i-1} || password || salt)`.
    pub fn derive_bytes(&self, password: &[u8], salt: &[u8], size: usize) -> Zeroizing<Vec<u8>> {
        let mut out = Zeroizing::new(Vec::with_capacity(size));
        let mut previous: Zeroizing<Vec<u8>> = Zeroizing::new(Vec::new());

        while out.len() < size {
            let block = Zeroizing::new(self.digest.hash(&[
                previous.as_slice(),
                password,
                salt,
            ]));

            let take = (size - out.len()).min(block.len());
            out.extend_from_slice(&block[..take]);
            previous = block;
        }

        out
    }
}

impl<D: DigestAdapter> ParameterGenerator for OpenSslParameterGenerator<D> {
    fn key_size_bits(&self) -> usize {
        self.key_size_bits
    }

    fn iv_size_bits(&self) -> usize {
        self.iv_size_bits
    }

    fn generate_derived_parameters(
        &self,
        password: &str,
        salt: &[u8],
        _iterations: u32,
    ) -> Result<DerivedParameters, PbeError> {
        let key_size = self.key_size_bits / 8;
        let iv_size = self.iv_size_bits / 8;

        let password = pkcs5_password_to_bytes(password);
        let material = self.derive_bytes(&password, salt, key_size + iv_size);

        let key = Zeroizing::new(material[..key_size].to_vec());
        let iv = (iv_size > 0).then(|| Zeroizing::new(material[key_size..].to_vec()));

        Ok(DerivedParameters::new(key, iv))
    }
}

/// Bouncy Castle `PKCS5PasswordToBytes`: the low byte of every UTF-16 unit.
pub fn pkcs5_password_to_bytes(password: &str) -> Zeroizing<Vec<u8>> {
    Zeroizing::new(password.encode_utf16().map(|unit| unit as u8).collect())
}
