//! ChaCha20-Poly1305 AEAD sealing, with associated data.
//!
//! The `chacha20poly1305` crate's `Aead::encrypt` returns `ciphertext ||
//! tag` (tag last). Tresor's envelope places the tag *before* the
//! ciphertext (spec §6), so every call here splits or reassembles that
//! trailing tag explicitly rather than trusting field order.

use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};

use crate::error::{Result, TresorError};
use crate::header::{CHACHA20_POLY1305_IV_LEN, CHACHA20_POLY1305_KEY_LEN, CHACHA20_POLY1305_TAG_LEN};

/// Encrypts `plaintext` under `key`/`iv`, authenticating `aad` alongside it.
/// Returns `(tag, ciphertext)` — exactly the two pieces the envelope codec
/// writes, tag first.
pub fn encrypt(
    key: &[u8; CHACHA20_POLY1305_KEY_LEN],
    iv: &[u8; CHACHA20_POLY1305_IV_LEN],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<([u8; CHACHA20_POLY1305_TAG_LEN], Vec<u8>)> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = Nonce::from_slice(iv);

    let mut sealed = cipher
        .encrypt(nonce, Payload { msg: plaintext, aad })
        .map_err(|_| TresorError::AuthFail)?;

    let tag_start = sealed.len() - CHACHA20_POLY1305_TAG_LEN;
    let mut tag = [0u8; CHACHA20_POLY1305_TAG_LEN];
    tag.copy_from_slice(&sealed[tag_start..]);
    sealed.truncate(tag_start);
    Ok((tag, sealed))
}

/// Decrypts `ciphertext` under `key`/`iv`, verifying `tag` against `aad`.
/// An authentication failure is indistinguishable from a wrong password
/// (spec §6 step 6), surfaced identically as [`TresorError::AuthFail`].
pub fn decrypt(
    key: &[u8; CHACHA20_POLY1305_KEY_LEN],
    iv: &[u8; CHACHA20_POLY1305_IV_LEN],
    aad: &[u8],
    tag: &[u8; CHACHA20_POLY1305_TAG_LEN],
    ciphertext: &[u8],
) -> Result<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key));
    let nonce = Nonce::from_slice(iv);

    let mut sealed = Vec::with_capacity(ciphertext.len() + tag.len());
    sealed.extend_from_slice(ciphertext);
    sealed.extend_from_slice(tag);

    cipher
        .decrypt(nonce, Payload { msg: &sealed, aad })
        .map_err(|_| TresorError::AuthFail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> [u8; CHACHA20_POLY1305_KEY_LEN] {
        [0x42; CHACHA20_POLY1305_KEY_LEN]
    }

    fn iv() -> [u8; CHACHA20_POLY1305_IV_LEN] {
        [0x24; CHACHA20_POLY1305_IV_LEN]
    }

    #[test]
    fn round_trips_plaintext_with_matching_aad() {
        let (tag, ct) = encrypt(&key(), &iv(), b"header-bytes", b"secret payload").unwrap();
        let pt = decrypt(&key(), &iv(), b"header-bytes", &tag, &ct).unwrap();
        assert_eq!(pt, b"secret payload");
    }

    #[test]
    fn mismatched_aad_fails_auth() {
        let (tag, ct) = encrypt(&key(), &iv(), b"header-v1", b"secret payload").unwrap();
        let err = decrypt(&key(), &iv(), b"header-v2", &tag, &ct).unwrap_err();
        assert!(matches!(err, TresorError::AuthFail));
    }

    #[test]
    fn flipped_ciphertext_bit_fails_auth() {
        let (tag, mut ct) = encrypt(&key(), &iv(), b"aad", b"secret payload").unwrap();
        ct[0] ^= 0x01;
        let err = decrypt(&key(), &iv(), b"aad", &tag, &ct).unwrap_err();
        assert!(matches!(err, TresorError::AuthFail));
    }

    #[test]
    fn wrong_key_fails_auth() {
        let (tag, ct) = encrypt(&key(), &iv(), b"aad", b"secret payload").unwrap();
        let mut wrong_key = key();
        wrong_key[0] ^= 0x01;
        let err = decrypt(&wrong_key, &iv(), b"aad", &tag, &ct).unwrap_err();
        assert!(matches!(err, TresorError::AuthFail));
    }
}
