//! headers/types.rs
//! Signed header struct, trailer views and the codec error type.
//!
//! Notes:
//! - The fixed struct is 128 bytes with no padding; the codec reads and writes
//!   every field at an explicit offset instead of casting memory.
//! - The trailer has no length field. `img_type` alone decides whether the
//!   key fields follow, so it is validated before any size is derived from it.
//! - Reserved words are carried through untouched and never validated.

use std::fmt;
use num_enum::TryFromPrimitive;

use crate::constants::{AES_IV_SIZE, AES_KEY_SIZE, RESERVED_WORDS, SHDR_MAGIC};
use crate::utils::{enum_name_or_hex, fmt_bytes};

/// Image type; decides the trailer layout.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum ImageType {
    /// Hash and signature only.
    Plain    = 0,
    /// Hash and signature only, verified with the root key.
    Unsigned = 1,
    /// Hash, signature, embedded public key and its signature.
    Signed   = 2,
}

impl ImageType {
    pub fn verify(raw: u32) -> Result<Self, HeaderError> {
        Self::try_from_primitive(raw).map_err(|_| {
            tracing::debug!(img_type = %enum_name_or_hex::<ImageType>(raw), "unknown image type");
            HeaderError::InvalidImageType { raw }
        })
    }

    /// Whether `pub_key` and `sig_key` follow the signature.
    #[inline]
    pub const fn has_key_fields(self) -> bool {
        matches!(self, ImageType::Signed)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ImageType::Plain => "plain",
            ImageType::Unsigned => "unsigned",
            ImageType::Signed => "signed",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payload encryption scheme.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum KeyType {
    None          = 0,
    Aes256Encrypt = 2,
}

impl KeyType {
    pub fn verify(raw: u32) -> Result<Self, HeaderError> {
        Self::try_from_primitive(raw).map_err(|_| {
            tracing::debug!(key_type = %enum_name_or_hex::<KeyType>(raw), "unknown key type");
            HeaderError::InvalidKeyType { raw }
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            KeyType::None => "none",
            KeyType::Aes256Encrypt => "aes256-encrypt",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed 128-byte part of a signed header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeader {
    pub magic: u32,                          // always SHDR_MAGIC once encoded
    pub version: u32,
    pub flags: u32,
    pub algo: u32,                           // TEE_ALG_* id for the external verifier
    pub arb_cvn: u32,                        // anti-rollback counter value
    pub img_type: ImageType,
    pub img_size: u32,                       // payload bytes after the trailer
    pub key_type: KeyType,
    pub marketid: u32,
    pub reserved: [u32; RESERVED_WORDS],
    pub nonce: [u8; AES_IV_SIZE],
    pub aes_key: [u8; AES_KEY_SIZE],
    pub aes_iv: [u8; AES_IV_SIZE],
}

impl Default for SignedHeader {
    /// Unsigned, unencrypted, empty image with every opaque field zeroed.
    fn default() -> Self {
        Self {
            magic: SHDR_MAGIC,
            version: 0,
            flags: 0,
            algo: 0,
            arb_cvn: 0,
            img_type: ImageType::Unsigned,
            img_size: 0,
            key_type: KeyType::None,
            marketid: 0,
            reserved: [0u32; RESERVED_WORDS],
            nonce: [0u8; AES_IV_SIZE],
            aes_key: [0u8; AES_KEY_SIZE],
            aes_iv: [0u8; AES_IV_SIZE],
        }
    }
}

impl SignedHeader {
    pub fn new(img_type: ImageType, img_size: u32) -> Self {
        Self { img_type, img_size, ..Default::default() }
    }

    /// Switch the header to AES-256 encryption with the given parameters.
    pub fn set_encryption(
        &mut self,
        nonce: [u8; AES_IV_SIZE],
        aes_key: [u8; AES_KEY_SIZE],
        aes_iv: [u8; AES_IV_SIZE],
    ) {
        self.key_type = KeyType::Aes256Encrypt;
        self.nonce = nonce;
        self.aes_key = aes_key;
        self.aes_iv = aes_iv;
    }

    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.key_type == KeyType::Aes256Encrypt
    }

    /// Encryption parameters, only when `key_type` says they are meaningful.
    pub fn encryption(&self) -> Option<EncryptionParams<'_>> {
        self.is_encrypted().then(|| EncryptionParams {
            nonce: &self.nonce,
            aes_key: &self.aes_key,
            aes_iv: &self.aes_iv,
        })
    }

    /// One-line description for logs.
    pub fn summary(&self) -> String {
        let mut s = format!(
            "shdr version={} type={} img_size={} algo=0x{:08x} arb_cvn={} marketid={} flags=0x{:x} key={}",
            self.version,
            self.img_type,
            self.img_size,
            self.algo,
            self.arb_cvn,
            self.marketid,
            self.flags,
            self.key_type,
        );
        if self.is_encrypted() {
            s.push_str(&format!(" nonce={} iv={}", fmt_bytes(&self.nonce), fmt_bytes(&self.aes_iv)));
        }
        s
    }
}

/// Borrowed AES parameters of an encrypted image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptionParams<'a> {
    pub nonce: &'a [u8; AES_IV_SIZE],
    pub aes_key: &'a [u8; AES_KEY_SIZE],
    pub aes_iv: &'a [u8; AES_IV_SIZE],
}

/// Trailer fields supplied to the encoder.
///
/// `pub_key` and `sig_key` must be present exactly when the image is `Signed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerFields<'a> {
    pub hash: &'a [u8],
    pub sig: &'a [u8],
    pub pub_key: Option<&'a [u8]>,
    pub sig_key: Option<&'a [u8]>,
}

impl<'a> TrailerFields<'a> {
    pub fn unsigned(hash: &'a [u8], sig: &'a [u8]) -> Self {
        Self { hash, sig, pub_key: None, sig_key: None }
    }

    pub fn signed(hash: &'a [u8], sig: &'a [u8], pub_key: &'a [u8], sig_key: &'a [u8]) -> Self {
        Self { hash, sig, pub_key: Some(pub_key), sig_key: Some(sig_key) }
    }
}

/// Zero-copy view of the trailer inside a decoded buffer.
///
/// Every slice has been bounds-checked against the layout of its image type;
/// the key accessors return `None` unless the image is `Signed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerView<'a> {
    pub(crate) hash: &'a [u8],
    pub(crate) sig: &'a [u8],
    pub(crate) pub_key: Option<&'a [u8]>,
    pub(crate) sig_key: Option<&'a [u8]>,
}

impl<'a> TrailerView<'a> {
    #[inline]
    pub fn hash(&self) -> &'a [u8] {
        self.hash
    }

    #[inline]
    pub fn sig(&self) -> &'a [u8] {
        self.sig
    }

    #[inline]
    pub fn pub_key(&self) -> Option<&'a [u8]> {
        self.pub_key
    }

    #[inline]
    pub fn sig_key(&self) -> Option<&'a [u8]> {
        self.sig_key
    }

    /// Same slices, in the shape the encoder accepts.
    pub fn fields(&self) -> TrailerFields<'a> {
        TrailerFields {
            hash: self.hash,
            sig: self.sig,
            pub_key: self.pub_key,
            sig_key: self.sig_key,
        }
    }
}

/// Names of the trailer fields, used in size errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrailerField {
    Hash,
    Sig,
    PubKey,
    SigKey,
}

impl fmt::Display for TrailerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrailerField::Hash => "hash",
            TrailerField::Sig => "sig",
            TrailerField::PubKey => "pub_key",
            TrailerField::SigKey => "sig_key",
        })
    }
}

/// Decode / encode failures. Every variant means "reject this image".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    /// Buffer shorter than the fixed struct or the trailer its image type needs.
    #[error("header buffer too short: {have} < {need}")]
    TruncatedBuffer { have: usize, need: usize },

    #[error("invalid magic: expected 0x{need:08x}, got 0x{have:08x}")]
    InvalidMagic { have: u32, need: u32 },

    #[error("invalid image type: 0x{raw:x}")]
    InvalidImageType { raw: u32 },

    #[error("invalid key type: 0x{raw:x}")]
    InvalidKeyType { raw: u32 },

    #[error("{field} must be {expected} bytes, got {actual}")]
    FieldSizeMismatch { field: TrailerField, expected: usize, actual: usize },

    /// Key fields supplied for a non-Signed image, or missing for a Signed one.
    #[error("{img_type} image with pub_key present={pub_key_present}, sig_key present={sig_key_present}")]
    InconsistentKeyFields {
        img_type: ImageType,
        pub_key_present: bool,
        sig_key_present: bool,
    },

    /// Buffer ends before the `img_size` payload bytes the header declares.
    #[error("image truncated: {have} < {need}")]
    TruncatedImage { have: usize, need: usize },
}
