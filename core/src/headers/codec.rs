//! headers/codec.rs
//!
//! `HeaderCodec`: decode / encode bound to one word order.
//!
//! The format never declared its byte order; signer and verifier simply
//! shared an architecture. `WireOrder::Native` keeps that behaviour and is
//! the default. Images signed on a known foreign architecture can be read
//! by picking `Little` or `Big` explicitly.

use std::fmt;

use byteorder::{BigEndian, LittleEndian, NativeEndian};

use crate::constants::HEADER_INFO_SIZE;
use crate::headers::decode::decode_with;
use crate::headers::encode::{encode_info_with, encode_with};
use crate::headers::layout::{expected_total_size, is_signed_header_with};
use crate::headers::types::{HeaderError, ImageType, SignedHeader, TrailerFields, TrailerView};

/// Word order of the 32-bit header fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WireOrder {
    /// Host order; binary compatible with images signed on the same architecture.
    #[default]
    Native,
    Little,
    Big,
}

impl fmt::Display for WireOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WireOrder::Native => "native",
            WireOrder::Little => "little-endian",
            WireOrder::Big => "big-endian",
        })
    }
}

/// Stateless signed-header codec.
///
/// Cheap to copy; every call is independent of every other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderCodec {
    order: WireOrder,
}

impl HeaderCodec {
    pub const fn new(order: WireOrder) -> Self {
        Self { order }
    }

    pub const fn order(&self) -> WireOrder {
        self.order
    }

    pub fn decode<'a>(&self, buf: &'a [u8]) -> Result<(SignedHeader, TrailerView<'a>), HeaderError> {
        match self.order {
            WireOrder::Native => decode_with::<NativeEndian>(buf),
            WireOrder::Little => decode_with::<LittleEndian>(buf),
            WireOrder::Big => decode_with::<BigEndian>(buf),
        }
    }

    pub fn encode(&self, header: &SignedHeader, trailer: &TrailerFields<'_>) -> Result<Vec<u8>, HeaderError> {
        match self.order {
            WireOrder::Native => encode_with::<NativeEndian>(header, trailer),
            WireOrder::Little => encode_with::<LittleEndian>(header, trailer),
            WireOrder::Big => encode_with::<BigEndian>(header, trailer),
        }
    }

    /// Fixed struct only; see [`encode_info_with`].
    pub fn encode_info(&self, header: &SignedHeader) -> [u8; HEADER_INFO_SIZE] {
        match self.order {
            WireOrder::Native => encode_info_with::<NativeEndian>(header),
            WireOrder::Little => encode_info_with::<LittleEndian>(header),
            WireOrder::Big => encode_info_with::<BigEndian>(header),
        }
    }

    #[inline]
    pub const fn expected_total_size(&self, img_type: ImageType) -> usize {
        expected_total_size(img_type)
    }

    pub fn is_signed_header(&self, buf: &[u8]) -> bool {
        match self.order {
            WireOrder::Native => is_signed_header_with::<NativeEndian>(buf),
            WireOrder::Little => is_signed_header_with::<LittleEndian>(buf),
            WireOrder::Big => is_signed_header_with::<BigEndian>(buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_native() {
        assert_eq!(HeaderCodec::default().order(), WireOrder::Native);
    }

    #[test]
    fn native_encodes_like_target_order() {
        let header = SignedHeader::new(ImageType::Plain, 64);
        let target = if cfg!(target_endian = "big") { WireOrder::Big } else { WireOrder::Little };
        assert_eq!(
            HeaderCodec::default().encode_info(&header),
            HeaderCodec::new(target).encode_info(&header)
        );
    }

    #[test]
    fn info_bytes_prefix_full_encoding() {
        let codec = HeaderCodec::new(WireOrder::Big);
        let header = SignedHeader::new(ImageType::Unsigned, 16);
        let trailer = TrailerFields::unsigned(&[0; 32], &[0; 256]);
        let wire = codec.encode(&header, &trailer).unwrap();
        assert_eq!(&wire[..HEADER_INFO_SIZE], &codec.encode_info(&header)[..]);
    }
}
