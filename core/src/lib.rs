//! shdr-core
//!
//! Codec for the signed header that prefixes a trusted-application image.
//! Pure Rust, no I/O, no crypto primitives of its own.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod utils;

pub mod headers;
pub mod image;
pub mod verify;
pub mod report;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::constants::{MAX_HEADER_SIZE, SHDR_MAGIC};
    pub use crate::headers::{
        decode, encode, encode_info, expected_total_size, HeaderCodec, HeaderError, ImageType, KeyType,
        SignedHeader, TrailerFields, TrailerView, WireOrder,
    };
    pub use crate::image::SignedImage;
    pub use crate::verify::{verify_image, ImageHasher, Sha256Hasher, SignatureVerifier, VerifyError};
}
