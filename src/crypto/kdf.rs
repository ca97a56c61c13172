//! PKCS#12 password-to-key/IV derivation (RFC 7292 Appendix B).
//!
//! Reproduces Bouncy Castle's `PKCS12ParameterGenerator`, which is what Jasypt
//! uses for its `PBEWITHSHA256AND*BITAES-CBC` algorithms.

use zeroize::Zeroizing;

use super::{DEFAULT_IV_SIZE, KEY_SIZE_256, hash::DigestAdapter};
use crate::error::PbeError;

/// Material id for key bytes.
pub const KEY_MATERIAL: u8 = 1;
/// Material id for IV bytes.
pub const IV_MATERIAL: u8 = 2;
/// Material id for MAC key bytes.
pub const MAC_MATERIAL: u8 = 3;

/// Key (and optional IV) derived for a single encrypt or decrypt call.
pub struct DerivedParameters {
    key: Zeroizing<Vec<u8>>,
    iv: Option<Zeroizing<Vec<u8>>>,
}

impl DerivedParameters {
    pub fn new(key: Zeroizing<Vec<u8>>, iv: Option<Zeroizing<Vec<u8>>>) -> Self {
        Self { key, iv }
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_deref().map(Vec::as_slice)
    }
}

/// Turns a password, salt and iteration count into cipher parameters.
pub trait ParameterGenerator: Send + Sync {
    fn key_size_bits(&self) -> usize;

    fn iv_size_bits(&self) -> usize;

    fn generate_derived_parameters(
        &self,
        password: &str,
        salt: &[u8],
        iterations: u32,
    ) -> Result<DerivedParameters, PbeError>;
}

/// Equivalent of the Bouncy Castle `PKCS12ParameterGenerator`.
#[derive(Debug, Clone)]
pub struct Pkcs12ParameterGenerator<D> {
    digest: D,
    key_size_bits: usize,
    iv_size_bits: usize,
}

impl<D: DigestAdapter> Pkcs12ParameterGenerator<D> {
    /// 256-bit key and 128-bit IV.
    pub fn new(digest: D) -> Self {
        Self::with_sizes(digest, KEY_SIZE_256, DEFAULT_IV_SIZE)
    }

    /// Sizes are in bits; an IV size of 0 skips IV derivation.
    pub fn with_sizes(digest: D, key_size_bits: usize, iv_size_bits: usize) -> Self {
        Self {
            digest,
            key_size_bits,
            iv_size_bits,
        }
    }

    pub fn digest(&self) -> &D {
        &self.digest
    }

    /// Derive `size` bytes of material `material_id` from a text password.
    pub fn derive(
        &self,
        password: &str,
        salt: &[u8],
        iterations: u32,
        material_id: u8,
        size: usize,
    ) -> Result<Zeroizing<Vec<u8>>, PbeError> {
        let password = pkcs12_password_to_bytes(password);
        pkcs12_kdf(&self.digest, material_id, &password, salt, iterations, size)
    }
}

impl<D: DigestAdapter> ParameterGenerator for Pkcs12ParameterGenerator<D> {
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
        iterations: u32,
    ) -> Result<DerivedParameters, PbeError> {
        let key_size = self.key_size_bits / 8;
        let iv_size = self.iv_size_bits / 8;

        let password = pkcs12_password_to_bytes(password);

        let key = pkcs12_kdf(
            &self.digest,
            KEY_MATERIAL,
            &password,
            salt,
            iterations,
            key_size,
        )?;
        let iv = if iv_size > 0 {
            Some(pkcs12_kdf(
                &self.digest,
                IV_MATERIAL,
                &password,
                salt,
                iterations,
                iv_size,
            )?)
        } else {
            None
        };

        Ok(DerivedParameters::new(key, iv))
    }
}

/// Encode a password as a PKCS#12 BMPString: big-endian UTF-16 with two
/// trailing zero bytes. An empty password still carries the terminator.
pub fn pkcs12_password_to_bytes(password: &str) -> Zeroizing<Vec<u8>> {
    let mut bytes = Zeroizing::new(Vec::with_capacity((password.len() + 1) * 2));
    for unit in password.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes.extend_from_slice(&[0, 0]);
    bytes
}

/// The RFC 7292 Appendix B.2 derivation over an already encoded password.
pub fn pkcs12_kdf(
    digest: &dyn DigestAdapter,
    material_id: u8,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    size: usize,
) -> Result<Zeroizing<Vec<u8>>, PbeError> {
    if size == 0 {
        return Ok(Zeroizing::new(Vec::new()));
    }
    if iterations == 0 {
        return Err(PbeError::InvalidIterations);
    }

    let u = digest.digest_size();
    let v = digest.block_size();

    let d = vec![material_id; v];

    let s = fill_to_block_multiple(salt, v);
    let p = fill_to_block_multiple(password, v);

    let mut i = Zeroizing::new(Vec::with_capacity(s.len() + p.len()));
    i.extend_from_slice(&s);
    i.extend_from_slice(&p);

    let c = size.div_ceil(u);
    let mut out = Zeroizing::new(Vec::with_capacity(c * u));

    for block in 1..=c {
        let mut a = Zeroizing::new(digest.hash(&[d.as_slice(), i.as_slice()]));
        for _ in 1..iterations {
            a = Zeroizing::new(digest.hash(&[a.as_slice()]));
        }

        let take = if block == c { size - (c - 1) * u } else { u };
        out.extend_from_slice(&a[..take]);

        // I is only read again by the next block
        if block < c {
            let b = Zeroizing::new(fill_to_length(&a, v));
            for i_j in i.chunks_exact_mut(v) {
                add_with_carry(i_j, &b);
            }
        }
    }

    Ok(out)
}

/// Repeat `data` cyclically up to the smallest multiple of `v` >= its length.
fn fill_to_block_multiple(data: &[u8], v: usize) -> Zeroizing<Vec<u8>> {
    if data.is_empty() {
        return Zeroizing::new(Vec::new());
    }
    Zeroizing::new(fill_to_length(data, data.len().div_ceil(v) * v))
}

fn fill_to_length(data: &[u8], len: usize) -> Vec<u8> {
    data.iter().copied().cycle().take(len).collect()
}

/// `block = (block + addend + 1) mod 2^(8 * len)`, both big-endian and of
/// equal length.
pub fn add_with_carry(block: &mut [u8], addend: &[u8]) {
    debug_assert_eq!(block.len(), addend.len());

    let mut carry: u16 = 1;
    for (x, y) in block.iter_mut().zip(addend).rev() {
        let sum = u16::from(*x) + u16::from(*y) + carry;
        *x = sum as u8;
        carry = sum >> 8;
    }
}
