//! PKCS#7-style block padding.

use serde::{Deserialize, Serialize};

use crate::error::PbeError;

/// How strictly padding is checked after decryption.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingMode {
    /// Jasypt-compatible: only the last byte is read and must be in
    /// `1..=block_size`; the padding bytes themselves are not checked.
    #[default]
    Lenient,
    /// Every padding byte must equal the pad length.
    Strict,
}

/// Append `n` bytes of value `n`, `n = block_size - len % block_size`.
/// Aligned input gets a full block.
pub fn pad(block_size: usize, data: &[u8]) -> Vec<u8> {
    let n = block_size - data.len() % block_size;
    let mut out = Vec::with_capacity(data.len() + n);
    out.extend_from_slice(data);
    out.resize(data.len() + n, n as u8);
    out
}

/// Strip the padding announced by the final byte.
pub fn unpad(block_size: usize, data: &[u8], mode: PaddingMode) -> Result<&[u8], PbeError> {
    let Some(&last) = data.last() else {
        return Err(PbeError::Padding);
    };
    let n = usize::from(last);

    if n == 0 || n > block_size || n > data.len() {
        return Err(PbeError::Padding);
    }

    let (body, padding) = data.split_at(data.len() - n);
    if mode == PaddingMode::Strict && padding.iter().any(|&b| b != last) {
        return Err(PbeError::Padding);
    }

    Ok(body)
}
