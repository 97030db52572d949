//! headers/encode.rs
//!
//! Header encoding.
//!
//! Design notes:
//! - Key-field presence is checked against the image type first, then every
//!   trailer field against its fixed size. Nothing is written on failure.
//! - `magic` is always written as `SHDR_MAGIC`, whatever the caller set.
//! - Output length is exactly `expected_total_size(img_type)`.

use byteorder::{ByteOrder, NativeEndian};

use crate::constants::{HEADER_INFO_SIZE, RSA_PUB_KEY_SIZE, SHA_DIGEST_SIZE, SHDR_MAGIC, SIG_SIZE};
use crate::headers::layout::expected_total_size;
use crate::headers::types::{HeaderError, SignedHeader, TrailerField, TrailerFields};

fn check_size(field: TrailerField, bytes: &[u8], expected: usize) -> Result<(), HeaderError> {
    if bytes.len() != expected {
        tracing::debug!(%field, expected, actual = bytes.len(), "trailer field size mismatch");
        return Err(HeaderError::FieldSizeMismatch { field, expected, actual: bytes.len() });
    }
    Ok(())
}

/// Check trailer fields against the header's image type.
pub fn validate_trailer(header: &SignedHeader, trailer: &TrailerFields<'_>) -> Result<(), HeaderError> {
    match (header.img_type.has_key_fields(), trailer.pub_key, trailer.sig_key) {
        (true, Some(pub_key), Some(sig_key)) => {
            check_size(TrailerField::PubKey, pub_key, RSA_PUB_KEY_SIZE)?;
            check_size(TrailerField::SigKey, sig_key, RSA_PUB_KEY_SIZE)?;
        }
        (false, None, None) => {}
        (_, pub_key, sig_key) => {
            tracing::debug!(img_type = %header.img_type, "key fields do not match image type");
            return Err(HeaderError::InconsistentKeyFields {
                img_type: header.img_type,
                pub_key_present: pub_key.is_some(),
                sig_key_present: sig_key.is_some(),
            });
        }
    }
    check_size(TrailerField::Hash, trailer.hash, SHA_DIGEST_SIZE)?;
    check_size(TrailerField::Sig, trailer.sig, SIG_SIZE)?;
    Ok(())
}

fn put_u32<O: ByteOrder>(out: &mut [u8], i: &mut usize, v: u32) {
    O::write_u32(&mut out[*i..*i + 4], v);
    *i += 4;
}

fn put_bytes(out: &mut [u8], i: &mut usize, b: &[u8]) {
    out[*i..*i + b.len()].copy_from_slice(b);
    *i += b.len();
}

fn put_info<O: ByteOrder>(out: &mut [u8], i: &mut usize, header: &SignedHeader) {
    put_u32::<O>(out, i, SHDR_MAGIC);                 // 0..4
    put_u32::<O>(out, i, header.version);             // 4..8
    put_u32::<O>(out, i, header.flags);               // 8..12
    put_u32::<O>(out, i, header.algo);                // 12..16
    put_u32::<O>(out, i, header.arb_cvn);             // 16..20
    put_u32::<O>(out, i, header.img_type as u32);     // 20..24
    put_u32::<O>(out, i, header.img_size);            // 24..28
    put_u32::<O>(out, i, header.key_type as u32);     // 28..32
    put_u32::<O>(out, i, header.marketid);            // 32..36
    for word in header.reserved {
        put_u32::<O>(out, i, word);                   // 36..64
    }
    put_bytes(out, i, &header.nonce);                 // 64..80
    put_bytes(out, i, &header.aes_key);               // 80..112
    put_bytes(out, i, &header.aes_iv);                // 112..128
}

/// Serialize only the fixed struct using word order `O`.
///
/// These are the bytes an image digest covers ahead of the payload, so a
/// signer can hash them before the trailer exists.
pub fn encode_info_with<O: ByteOrder>(header: &SignedHeader) -> [u8; HEADER_INFO_SIZE] {
    let mut out = [0u8; HEADER_INFO_SIZE];
    let mut i = 0usize;
    put_info::<O>(&mut out, &mut i, header);
    debug_assert_eq!(i, HEADER_INFO_SIZE, "fixed struct wrote incorrect length");
    out
}

/// Fixed struct in native word order.
#[inline]
pub fn encode_info(header: &SignedHeader) -> [u8; HEADER_INFO_SIZE] {
    encode_info_with::<NativeEndian>(header)
}

/// Serialize a header and its trailer using word order `O`.
pub fn encode_with<O: ByteOrder>(header: &SignedHeader, trailer: &TrailerFields<'_>) -> Result<Vec<u8>, HeaderError> {
    validate_trailer(header, trailer)?;

    let total = expected_total_size(header.img_type);
    let mut out = vec![0u8; total];
    let mut i = 0usize;

    put_info::<O>(&mut out, &mut i, header);
    debug_assert_eq!(i, HEADER_INFO_SIZE, "fixed struct wrote incorrect length");

    put_bytes(&mut out, &mut i, trailer.hash);        // 128..160
    put_bytes(&mut out, &mut i, trailer.sig);         // 160..416
    if let (Some(pub_key), Some(sig_key)) = (trailer.pub_key, trailer.sig_key) {
        put_bytes(&mut out, &mut i, pub_key);         // 416..672
        put_bytes(&mut out, &mut i, sig_key);         // 672..928
    }
    debug_assert_eq!(i, total, "encoding wrote incorrect length");

    tracing::trace!(img_type = %header.img_type, len = total, "encoded signed header");
    Ok(out)
}

/// Serialize a header and its trailer in native word order.
///
/// # Errors
/// - `InconsistentKeyFields` when key fields do not match `img_type`.
/// - `FieldSizeMismatch` when a trailer field has the wrong length.
#[inline]
pub fn encode(header: &SignedHeader, trailer: &TrailerFields<'_>) -> Result<Vec<u8>, HeaderError> {
    encode_with::<NativeEndian>(header, trailer)
}
