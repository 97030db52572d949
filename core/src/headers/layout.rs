//! headers/layout.rs
//!
//! Offset and size arithmetic for the trailer.
//!
//! Every accessor here returns a checked range or slice; nothing indexes the
//! buffer before the image type has been validated.

use std::ops::Range;

use byteorder::ByteOrder;

use crate::constants::{offsets, BASE_HEADER_SIZE, MAX_HEADER_SIZE, RSA_PUB_KEY_SIZE, SHA_DIGEST_SIZE, SHDR_MAGIC, SIG_SIZE};
use crate::headers::types::{HeaderError, ImageType, TrailerView};

/// Header + trailer size for an image type: 928 for `Signed`, 416 otherwise.
#[inline]
pub const fn expected_total_size(img_type: ImageType) -> usize {
    if img_type.has_key_fields() {
        MAX_HEADER_SIZE
    } else {
        BASE_HEADER_SIZE
    }
}

#[inline]
pub const fn hash_range() -> Range<usize> {
    offsets::HASH..offsets::HASH + SHA_DIGEST_SIZE
}

#[inline]
pub const fn sig_range() -> Range<usize> {
    offsets::SIG..offsets::SIG + SIG_SIZE
}

#[inline]
pub const fn pub_key_range() -> Range<usize> {
    offsets::PUB_KEY..offsets::PUB_KEY + RSA_PUB_KEY_SIZE
}

#[inline]
pub const fn sig_key_range() -> Range<usize> {
    offsets::SIG_KEY..offsets::SIG_KEY + RSA_PUB_KEY_SIZE
}

/// Quick check: does `buf` start with the header magic in word order `O`?
pub fn is_signed_header_with<O: ByteOrder>(buf: &[u8]) -> bool {
    buf.get(offsets::MAGIC..offsets::MAGIC + 4)
        .map(|m| O::read_u32(m) == SHDR_MAGIC)
        .unwrap_or(false)
}

/// Magic check in native word order.
pub fn is_signed_header(buf: &[u8]) -> bool {
    is_signed_header_with::<byteorder::NativeEndian>(buf)
}

fn slice(buf: &[u8], range: Range<usize>) -> Result<&[u8], HeaderError> {
    let need = range.end;
    buf.get(range)
        .ok_or(HeaderError::TruncatedBuffer { have: buf.len(), need })
}

impl<'a> TrailerView<'a> {
    /// Resolve the trailer of an already-validated image type inside `buf`.
    pub fn locate(buf: &'a [u8], img_type: ImageType) -> Result<Self, HeaderError> {
        let (pub_key, sig_key) = if img_type.has_key_fields() {
            (Some(slice(buf, pub_key_range())?), Some(slice(buf, sig_key_range())?))
        } else {
            (None, None)
        };

        Ok(Self {
            hash: slice(buf, hash_range())?,
            sig: slice(buf, sig_range())?,
            pub_key,
            sig_key,
        })
    }
}
