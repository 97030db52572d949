//! image.rs
//!
//! A complete signed image: header, trailer and the payload behind them.

use crate::constants::HEADER_INFO_SIZE;
use crate::headers::{expected_total_size, EncryptionParams, HeaderCodec, HeaderError, SignedHeader, TrailerView};

/// Borrowed view of a signed image buffer.
///
/// Bytes past `total_size + img_size` are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedImage<'a> {
    header: SignedHeader,
    trailer: TrailerView<'a>,
    header_bytes: &'a [u8],
    payload: &'a [u8],
}

impl<'a> SignedImage<'a> {
    /// Parse in native word order.
    pub fn parse(buf: &'a [u8]) -> Result<Self, HeaderError> {
        Self::parse_with(&HeaderCodec::default(), buf)
    }

    pub fn parse_with(codec: &HeaderCodec, buf: &'a [u8]) -> Result<Self, HeaderError> {
        let (header, trailer) = codec.decode(buf)?;

        let start = expected_total_size(header.img_type);
        let need = start
            .checked_add(header.img_size as usize)
            .ok_or(HeaderError::TruncatedImage { have: buf.len(), need: usize::MAX })?;
        let payload = buf.get(start..need).ok_or_else(|| {
            tracing::debug!(have = buf.len(), need, "payload truncated");
            HeaderError::TruncatedImage { have: buf.len(), need }
        })?;

        Ok(Self {
            header,
            trailer,
            header_bytes: &buf[..HEADER_INFO_SIZE],
            payload,
        })
    }

    pub fn header(&self) -> &SignedHeader {
        &self.header
    }

    pub fn trailer(&self) -> &TrailerView<'a> {
        &self.trailer
    }

    /// Raw fixed struct, exactly as stored.
    pub fn header_bytes(&self) -> &'a [u8] {
        self.header_bytes
    }

    /// The `img_size` bytes following the trailer.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    pub fn encryption(&self) -> Option<EncryptionParams<'_>> {
        self.header.encryption()
    }

    /// Header + trailer + payload length.
    pub fn total_len(&self) -> usize {
        expected_total_size(self.header.img_type) + self.payload.len()
    }
}
