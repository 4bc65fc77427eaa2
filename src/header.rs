//! The authenticated, unencrypted metadata block (`OuterHeader`):
//! versioning plus algorithm-parameter metadata for the cipher and KDF.
//!
//! Algorithm ids are wire-encoded as small integers (stable across library
//! versions, per spec §4.7) and validated into the public enums below only
//! after the surrounding structure has parsed successfully. This keeps a
//! structurally corrupt header ([`TresorError::BadHeader`]) distinct from a
//! well-formed header naming an id this build doesn't recognize
//! ([`TresorError::UnsupportedAlgorithm`]) — the same two-step validation
//! `zff`'s `PBEHeader` decoder uses for its KDF/PBE scheme bytes.

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{Result, TresorError};

pub const VERSION_MAJOR: u16 = 1;
pub const VERSION_MINOR: u16 = 0;

pub const CHACHA20_POLY1305_IV_LEN: usize = 12;
pub const CHACHA20_POLY1305_TAG_LEN: usize = 16;
pub const CHACHA20_POLY1305_KEY_LEN: usize = 32;

/// OWASP "interactive" Argon2id tier — chosen for authentication that
/// happens on a human's login path rather than in a hot loop.
pub const ARGON2_SALT_LEN: usize = 16;
pub const ARGON2_DEFAULT_ITERATIONS: u32 = 3;
pub const ARGON2_DEFAULT_MEMORY_KIB: u32 = 65536;
pub const ARGON2_DEFAULT_PARALLELISM: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherId {
    ChaCha20Poly1305,
}

impl CipherId {
    fn wire_id(self) -> u8 {
        match self {
            CipherId::ChaCha20Poly1305 => 0,
        }
    }

    fn from_wire_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(CipherId::ChaCha20Poly1305),
            _ => Err(TresorError::UnsupportedAlgorithm),
        }
    }

    pub fn iv_len(self) -> usize {
        match self {
            CipherId::ChaCha20Poly1305 => CHACHA20_POLY1305_IV_LEN,
        }
    }

    pub fn tag_len(self) -> usize {
        match self {
            CipherId::ChaCha20Poly1305 => CHACHA20_POLY1305_TAG_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionId {
    None,
}

impl CompressionId {
    fn wire_id(self) -> u8 {
        match self {
            CompressionId::None => 0,
        }
    }

    fn from_wire_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(CompressionId::None),
            _ => Err(TresorError::UnsupportedAlgorithm),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfId {
    Argon2id,
}

impl KdfId {
    fn wire_id(self) -> u8 {
        match self {
            KdfId::Argon2id => 0,
        }
    }

    fn from_wire_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(KdfId::Argon2id),
            _ => Err(TresorError::UnsupportedAlgorithm),
        }
    }
}

/// Argon2id parameters, carried in the header so `open` derives the same
/// key `seal` did. The salt is not sensitive (it is, by design, public);
/// only the derived key and password are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Argon2Params {
    #[serde(with = "serde_bytes")]
    pub salt: Vec<u8>,
    pub iterations: u32,
    pub memory_kib: u32,
    pub parallelism: u32,
}

impl Argon2Params {
    pub fn interactive_defaults() -> Self {
        Self {
            salt: Vec::new(),
            iterations: ARGON2_DEFAULT_ITERATIONS,
            memory_kib: ARGON2_DEFAULT_MEMORY_KIB,
            parallelism: ARGON2_DEFAULT_PARALLELISM,
        }
    }

    /// Refills the salt with fresh random bytes. Called exactly once per
    /// seal (spec §4.3).
    pub fn seed(&mut self, rng: &mut dyn crate::rng::RandomSource) {
        let mut salt = vec![0u8; ARGON2_SALT_LEN];
        rng.fill_bytes(&mut salt);
        self.salt = salt;
    }
}

/// Wire representation of `OuterHeader` — the struct that is actually
/// CBOR-encoded and decoded. Ids are raw integers here; see module docs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OuterHeader {
    pub(crate) version_major: u16,
    pub(crate) version_minor: u16,
    pub(crate) cipher_id: u8,
    #[serde(with = "serde_bytes")]
    pub(crate) iv: Option<Vec<u8>>,
    pub(crate) compression_id: u8,
    pub(crate) kdf_id: u8,
    pub(crate) kdf_params: Argon2Params,
}

impl OuterHeader {
    pub fn new(cipher: CipherId, compression: CompressionId, kdf: KdfId) -> Self {
        Self {
            version_major: VERSION_MAJOR,
            version_minor: VERSION_MINOR,
            cipher_id: cipher.wire_id(),
            iv: None,
            compression_id: compression.wire_id(),
            kdf_id: kdf.wire_id(),
            kdf_params: Argon2Params::interactive_defaults(),
        }
    }

    pub fn cipher_id(&self) -> Result<CipherId> {
        CipherId::from_wire_id(self.cipher_id)
    }

    pub fn compression_id(&self) -> Result<CompressionId> {
        CompressionId::from_wire_id(self.compression_id)
    }

    pub fn kdf_id(&self) -> Result<KdfId> {
        KdfId::from_wire_id(self.kdf_id)
    }

    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_deref()
    }

    pub fn kdf_params(&self) -> &Argon2Params {
        &self.kdf_params
    }

    pub fn kdf_params_mut(&mut self) -> &mut Argon2Params {
        &mut self.kdf_params
    }

    /// Validates that every id in the header is one this build recognizes,
    /// and that the header declares a version this build can open. Called
    /// once, right after structural parsing, before any key derivation.
    pub fn validate(&self) -> Result<()> {
        if self.version_major > VERSION_MAJOR {
            return Err(TresorError::UnsupportedVersion {
                major: self.version_major,
                minor: self.version_minor,
            });
        }
        self.cipher_id()?;
        self.compression_id()?;
        self.kdf_id()?;
        Ok(())
    }

    /// Replaces the IV, zeroing out whatever was there before. IVs are not
    /// sensitive, but consistent scoped-release discipline costs nothing.
    pub(crate) fn set_iv(&mut self, new_iv: Vec<u8>) {
        if let Some(mut old) = self.iv.take() {
            old.zeroize();
        }
        self.iv = Some(new_iv);
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| TresorError::BadHeader(e.to_string()))?;
        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| TresorError::BadHeader(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{OsRandom, RandomSource};

    #[test]
    fn round_trips_through_cbor() {
        let mut header = OuterHeader::new(
            CipherId::ChaCha20Poly1305,
            CompressionId::None,
            KdfId::Argon2id,
        );
        let mut rng: Box<dyn RandomSource> = Box::new(OsRandom);
        header.kdf_params_mut().seed(rng.as_mut());
        header.set_iv(vec![7; CHACHA20_POLY1305_IV_LEN]);

        let bytes = header.encode().unwrap();
        let decoded = OuterHeader::decode(&bytes).unwrap();
        decoded.validate().unwrap();
        assert_eq!(decoded.cipher_id().unwrap(), CipherId::ChaCha20Poly1305);
        assert_eq!(decoded.iv(), Some(&[7u8; CHACHA20_POLY1305_IV_LEN][..]));
    }

    #[test]
    fn unrecognized_id_is_unsupported_algorithm_not_bad_header() {
        let mut header = OuterHeader::new(
            CipherId::ChaCha20Poly1305,
            CompressionId::None,
            KdfId::Argon2id,
        );
        header.cipher_id = 200;
        let bytes = header.encode().unwrap();
        let decoded = OuterHeader::decode(&bytes).expect("structurally still a valid header");
        assert!(matches!(
            decoded.validate(),
            Err(TresorError::UnsupportedAlgorithm)
        ));
    }

    #[test]
    fn newer_major_version_is_refused() {
        let mut header = OuterHeader::new(
            CipherId::ChaCha20Poly1305,
            CompressionId::None,
            KdfId::Argon2id,
        );
        header.version_major = VERSION_MAJOR + 1;
        assert!(matches!(
            header.validate(),
            Err(TresorError::UnsupportedVersion { .. })
        ));
    }
}
