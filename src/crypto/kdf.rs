//! Argon2id key derivation. Memory-hard password hashing, run once per seal
//! and once per open; the parameters that produced a given key are always
//! carried alongside it in the header so open reproduces the same key.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroize;

use crate::error::{Result, TresorError};
use crate::header::{Argon2Params, CHACHA20_POLY1305_KEY_LEN};

/// Derives a `CHACHA20_POLY1305_KEY_LEN`-byte key from `password` and
/// `params`. The caller is responsible for zeroing the returned key on
/// every exit path, per spec §4.3.
pub fn derive_key(password: &str, params: &Argon2Params) -> Result<[u8; CHACHA20_POLY1305_KEY_LEN]> {
    let argon2_params = Params::new(
        params.memory_kib,
        params.iterations,
        params.parallelism,
        Some(CHACHA20_POLY1305_KEY_LEN),
    )
    .map_err(|e| TresorError::KeyDerivation(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params);

    let mut key = [0u8; CHACHA20_POLY1305_KEY_LEN];
    let result = argon2.hash_password_into(password.as_bytes(), &params.salt, &mut key);
    if let Err(e) = result {
        key.zeroize();
        return Err(TresorError::KeyDerivation(e.to_string()));
    }
    Ok(key)
}
