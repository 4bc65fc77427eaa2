use thiserror::Error;

/// All failure modes the library can surface.
///
/// `BadMagic`, `Truncated`, `BadHeader`, `UnsupportedAlgorithm`, `AuthFail`
/// and `BadPayload` are kept distinct so tests can assert exactly which
/// envelope check fired, but `Store::open` callers that must avoid leaking
/// a password-guessing oracle should branch on [`TresorError::cannot_open`]
/// rather than matching variants directly.
#[derive(Debug, Error)]
pub enum TresorError {
    #[error("an entry or field with that identifier already exists")]
    Duplicate,

    #[error("no entry or field with that identifier exists")]
    NotFound,

    #[error("blob is missing the SECRET magic bytes")]
    BadMagic,

    #[error("blob is truncated: header or ciphertext runs past the end")]
    Truncated,

    #[error("outer header could not be parsed: {0}")]
    BadHeader(String),

    #[error("cipher, compression, or KDF id in the header is not recognized")]
    UnsupportedAlgorithm,

    #[error("header declares a version newer than this library supports: {major}.{minor}")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("AEAD authentication failed (wrong password or corrupted data)")]
    AuthFail,

    #[error("decrypted payload could not be parsed: {0}")]
    BadPayload(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("writer or reader I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl TresorError {
    /// Collapses every open-time envelope/auth failure to one predicate, so
    /// a caller can present a single "cannot open this store" message
    /// instead of distinguishing a wrong password from a corrupted blob.
    pub fn cannot_open(&self) -> bool {
        matches!(
            self,
            TresorError::BadMagic
                | TresorError::Truncated
                | TresorError::BadHeader(_)
                | TresorError::UnsupportedAlgorithm
                | TresorError::UnsupportedVersion { .. }
                | TresorError::AuthFail
                | TresorError::BadPayload(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TresorError>;
