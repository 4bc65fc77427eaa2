//! The envelope codec: seal writes `magic | hlen | header | tag |
//! ciphertext`; open is its mirror. The header's on-wire bytes — never a
//! freshly re-serialized copy — are what gets authenticated as AAD on both
//! sides (spec §4.6's "critical invariant").

use std::io::Write;

use zeroize::Zeroizing;

use crate::clock::Clock;
use crate::data::Data;
use crate::error::{Result, TresorError};
use crate::header::{CipherId, OuterHeader};
use crate::rng::RandomSource;
use crate::store::Store;
use crate::{crypto, header};

const MAGIC: [u8; 6] = *b"SECRET";
const PREFIX_LEN: usize = MAGIC.len() + 4; // magic + u32 hlen

/// Serializes `header` and `data`, derives a fresh key and IV, encrypts,
/// and writes the full envelope to `writer`. Any failure leaves the key
/// and the serialized payload zeroized; nothing written to `writer` before
/// the failure should be treated as a usable blob (spec §4.5, §7).
pub fn seal(store: &mut Store, writer: &mut dyn Write, password: &str) -> Result<()> {
    store.header.kdf_params_mut().seed(store.rng.as_mut());

    let key = Zeroizing::new(crypto::kdf::derive_key(password, store.header.kdf_params())?);

    let cipher_id = store.header.cipher_id()?;
    let mut iv = vec![0u8; cipher_id.iv_len()];
    store.rng.fill_bytes(&mut iv);
    store.header.set_iv(iv.clone());

    let h = store.header.encode()?;

    let plaintext = Zeroizing::new(store.data.encode()?);

    let iv_array = to_iv_array(&iv, cipher_id)?;
    let key_array: &[u8; header::CHACHA20_POLY1305_KEY_LEN] = &key;
    let (tag, ciphertext) = crypto::cipher::encrypt(key_array, &iv_array, &h, &plaintext)?;

    writer.write_all(&MAGIC)?;
    writer.write_all(&(h.len() as u32).to_le_bytes())?;
    writer.write_all(&h)?;
    writer.write_all(&tag)?;
    writer.write_all(&ciphertext)?;

    tracing::info!(
        store = store.data.name(),
        entries = store.data.entries().len(),
        "store sealed"
    );
    Ok(())
}

/// Parses a blob produced by [`seal`], derives the key from `password` and
/// the header's own KDF parameters, authenticates the header, and decrypts
/// the payload. An auth failure is returned identically whether caused by a
/// wrong password or by tampering (spec §7).
pub fn open(
    blob: &[u8],
    password: &str,
    rng: Box<dyn RandomSource>,
    clock: Box<dyn Clock>,
) -> Result<Store> {
    if blob.len() < PREFIX_LEN || &blob[..MAGIC.len()] != &MAGIC {
        tracing::warn!("open refused: bad magic");
        return Err(TresorError::BadMagic);
    }

    let hlen = u32::from_le_bytes(blob[MAGIC.len()..PREFIX_LEN].try_into().unwrap()) as usize;

    let header_start = PREFIX_LEN;
    let header_end = header_start
        .checked_add(hlen)
        .ok_or(TresorError::Truncated)?;
    let tag_end = header_end
        .checked_add(header::CHACHA20_POLY1305_TAG_LEN)
        .ok_or(TresorError::Truncated)?;
    if tag_end > blob.len() {
        tracing::warn!("open refused: truncated blob");
        return Err(TresorError::Truncated);
    }

    let header_bytes = &blob[header_start..header_end];
    let header = OuterHeader::decode(header_bytes)?;
    header.validate().map_err(|e| {
        tracing::warn!("open refused: {e}");
        e
    })?;

    let key = Zeroizing::new(crypto::kdf::derive_key(password, header.kdf_params())?);

    let cipher_id = header.cipher_id()?;
    let iv_bytes = header.iv().ok_or_else(|| {
        TresorError::BadHeader("sealed header is missing its IV".to_string())
    })?;
    let iv_array = to_iv_array(iv_bytes, cipher_id)?;

    let tag: [u8; header::CHACHA20_POLY1305_TAG_LEN] =
        blob[header_end..tag_end].try_into().unwrap();
    let ciphertext = &blob[tag_end..];

    let key_array: &[u8; header::CHACHA20_POLY1305_KEY_LEN] = &key;
    let plaintext = Zeroizing::new(crypto::cipher::decrypt(
        key_array,
        &iv_array,
        header_bytes,
        &tag,
        ciphertext,
    )?);

    let data = Data::decode(&plaintext)?;

    tracing::info!(store = data.name(), entries = data.entries().len(), "store opened");

    Ok(Store {
        header,
        data,
        rng,
        clock,
    })
}

fn to_iv_array(
    iv: &[u8],
    cipher_id: CipherId,
) -> Result<[u8; header::CHACHA20_POLY1305_IV_LEN]> {
    if iv.len() != cipher_id.iv_len() {
        return Err(TresorError::BadHeader(format!(
            "iv length {} does not match cipher's required {}",
            iv.len(),
            cipher_id.iv_len()
        )));
    }
    let mut out = [0u8; header::CHACHA20_POLY1305_IV_LEN];
    out.copy_from_slice(iv);
    Ok(out)
}
