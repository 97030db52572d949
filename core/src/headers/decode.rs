//! headers/decode.rs
//!
//! Header decoding.
//!
//! Design notes:
//! - Reads the fixed 128-byte struct field by field at explicit offsets.
//! - Order of checks: fixed length, magic, image type, key type, then the
//!   trailer length derived from the (now trusted) image type.
//! - The returned trailer borrows the input; nothing is copied.

use byteorder::{ByteOrder, NativeEndian};

use crate::constants::{offsets, HEADER_INFO_SIZE, RESERVED_WORDS, SHDR_MAGIC};
use crate::headers::layout::expected_total_size;
use crate::headers::types::{HeaderError, ImageType, KeyType, SignedHeader, TrailerView};

/// Decode a header and its trailer using word order `O`.
pub fn decode_with<O: ByteOrder>(buf: &[u8]) -> Result<(SignedHeader, TrailerView<'_>), HeaderError> {
    if buf.len() < HEADER_INFO_SIZE {
        tracing::debug!(have = buf.len(), need = HEADER_INFO_SIZE, "header truncated");
        return Err(HeaderError::TruncatedBuffer { have: buf.len(), need: HEADER_INFO_SIZE });
    }

    #[inline] fn get_u32<O: ByteOrder>(buf: &[u8], off: usize) -> u32 { O::read_u32(&buf[off..off + 4]) }
    #[inline] fn get_bytes<const N: usize>(buf: &[u8], off: usize) -> [u8; N] {
        let mut dst = [0u8; N]; dst.copy_from_slice(&buf[off..off + N]); dst
    }

    let magic = get_u32::<O>(buf, offsets::MAGIC);
    if magic != SHDR_MAGIC {
        tracing::debug!(magic = format_args!("0x{magic:08x}"), "bad header magic");
        return Err(HeaderError::InvalidMagic { have: magic, need: SHDR_MAGIC });
    }

    // Must be trusted before it decides how much trailer to read.
    let img_type = ImageType::verify(get_u32::<O>(buf, offsets::IMG_TYPE))?;
    let key_type = KeyType::verify(get_u32::<O>(buf, offsets::KEY_TYPE))?;

    let need = expected_total_size(img_type);
    if buf.len() < need {
        tracing::debug!(have = buf.len(), need, %img_type, "trailer truncated");
        return Err(HeaderError::TruncatedBuffer { have: buf.len(), need });
    }

    let mut reserved = [0u32; RESERVED_WORDS];
    O::read_u32_into(&buf[offsets::RESERVED..offsets::NONCE], &mut reserved);

    let header = SignedHeader {
        magic,
        version:  get_u32::<O>(buf, offsets::VERSION),
        flags:    get_u32::<O>(buf, offsets::FLAGS),
        algo:     get_u32::<O>(buf, offsets::ALGO),
        arb_cvn:  get_u32::<O>(buf, offsets::ARB_CVN),
        img_type,
        img_size: get_u32::<O>(buf, offsets::IMG_SIZE),
        key_type,
        marketid: get_u32::<O>(buf, offsets::MARKETID),
        reserved,
        nonce:    get_bytes(buf, offsets::NONCE),
        aes_key:  get_bytes(buf, offsets::AES_KEY),
        aes_iv:   get_bytes(buf, offsets::AES_IV),
    };

    let trailer = TrailerView::locate(buf, img_type)?;

    tracing::trace!(header = %header.summary(), "decoded signed header");
    Ok((header, trailer))
}

/// Decode a header and its trailer in native word order.
///
/// # Errors
/// - `TruncatedBuffer` when `buf` is shorter than 128 bytes or than the
///   trailer the image type requires.
/// - `InvalidMagic`, `InvalidImageType`, `InvalidKeyType` for bad fields.
#[inline]
pub fn decode(buf: &[u8]) -> Result<(SignedHeader, TrailerView<'_>), HeaderError> {
    decode_with::<NativeEndian>(buf)
}
