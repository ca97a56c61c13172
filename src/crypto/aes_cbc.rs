//! Raw AES-CBC over already padded data.
//!
//! The AES variant follows the key length (16, 24 or 32 bytes). No padding is
//! added or removed here; see [`super::padding`].

use aes::{Aes128, Aes192, Aes256};
use cipher::{
    BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit, block_padding::NoPadding,
};

use super::AES_BLOCK_SIZE;
use crate::error::PbeError;

/// Encrypt block-aligned `data` in place.
pub fn encrypt(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), PbeError> {
    check_aligned(data)?;
    match key.len() {
        16 => cbc_encrypt::<Aes128>(key, iv, data),
        24 => cbc_encrypt::<Aes192>(key, iv, data),
        32 => cbc_encrypt::<Aes256>(key, iv, data),
        other => Err(invalid_key_length(other)),
    }
}

/// Decrypt block-aligned `data` in place.
pub fn decrypt(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), PbeError> {
    check_aligned(data)?;
    match key.len() {
        16 => cbc_decrypt::<Aes128>(key, iv, data),
        24 => cbc_decrypt::<Aes192>(key, iv, data),
        32 => cbc_decrypt::<Aes256>(key, iv, data),
        other => Err(invalid_key_length(other)),
    }
}

fn check_aligned(data: &[u8]) -> Result<(), PbeError> {
    if data.len() % AES_BLOCK_SIZE != 0 {
        return Err(PbeError::Cipher(format!(
            "data length {} is not a multiple of the AES block size",
            data.len()
        )));
    }
    Ok(())
}

fn invalid_key_length(len: usize) -> PbeError {
    PbeError::Cipher(format!("unsupported AES key length: {len} bytes"))
}

fn cbc_encrypt<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), PbeError>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let len = data.len();
    cbc::Encryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| PbeError::Cipher(format!("AES-CBC init failed: {e}")))?
        .encrypt_padded_mut::<NoPadding>(data, len)
        .map_err(|_| PbeError::Cipher("AES-CBC encrypt failed".to_string()))?;
    Ok(())
}

fn cbc_decrypt<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<(), PbeError>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    cbc::Decryptor::<C>::new_from_slices(key, iv)
        .map_err(|e| PbeError::Cipher(format!("AES-CBC init failed: {e}")))?
        .decrypt_padded_mut::<NoPadding>(data)
        .map_err(|_| PbeError::Cipher("AES-CBC decrypt failed".to_string()))?;
    Ok(())
}
