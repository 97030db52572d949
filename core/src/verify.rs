//! verify.rs
//!
//! Verification driver for signed images.
//!
//! Design notes:
//! - Hashing and signature checking are capabilities supplied by the caller
//!   through `ImageHasher` and `SignatureVerifier`; no primitive lives here.
//! - `Signed` images carry their own public key. The verifier's root key must
//!   vouch for that key (`sig_key` over `pub_key`) before it is trusted to
//!   check the image signature.
//! - The digest covers the fixed header struct followed by the payload, so
//!   `img_type`, `algo`, `arb_cvn` and the AES parameters are authenticated
//!   along with the image. The trailer is not hashed.
//! - Fails closed: the parsed image is returned only when every check passed.

use sha2::{Digest, Sha256};

use crate::constants::{AES_BLOCK_SIZE, SHA_DIGEST_SIZE};
use crate::headers::{HeaderCodec, HeaderError};
use crate::image::SignedImage;

/// Digest capability over the fixed header bytes followed by the payload.
pub trait ImageHasher {
    fn digest(&self, header: &[u8], image: &[u8]) -> [u8; SHA_DIGEST_SIZE];
}

/// Signature capability.
///
/// `pub_key = None` asks the verifier to use its own provisioned root key.
pub trait SignatureVerifier {
    fn verify(&self, algo: u32, message: &[u8], sig: &[u8], pub_key: Option<&[u8]>) -> bool;
}

/// SHA-256 over header and payload bytes as stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ImageHasher for Sha256Hasher {
    fn digest(&self, header: &[u8], image: &[u8]) -> [u8; SHA_DIGEST_SIZE] {
        let out = Sha256::new().chain_update(header).chain_update(image).finalize();
        let mut digest = [0u8; SHA_DIGEST_SIZE];
        digest.copy_from_slice(&out);
        digest
    }
}

impl<T: ImageHasher + ?Sized> ImageHasher for &T {
    fn digest(&self, header: &[u8], image: &[u8]) -> [u8; SHA_DIGEST_SIZE] {
        (**self).digest(header, image)
    }
}

impl<T: SignatureVerifier + ?Sized> SignatureVerifier for &T {
    fn verify(&self, algo: u32, message: &[u8], sig: &[u8], pub_key: Option<&[u8]>) -> bool {
        (**self).verify(algo, message, sig, pub_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    /// Encrypted payload is not a whole number of AES blocks.
    #[error("encrypted image size {img_size} is not a multiple of the AES block size")]
    UnalignedCiphertext { img_size: u32 },

    #[error("image hash mismatch")]
    HashMismatch,

    /// Root key rejected the embedded public key.
    #[error("public key signature rejected")]
    KeySignatureInvalid,

    #[error("image signature rejected")]
    SignatureInvalid,
}

/// Verify a signed image in native word order.
pub fn verify_image<'a, H, V>(buf: &'a [u8], hasher: &H, verifier: &V) -> Result<SignedImage<'a>, VerifyError>
where
    H: ImageHasher + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    verify_image_with(&HeaderCodec::default(), buf, hasher, verifier)
}

pub fn verify_image_with<'a, H, V>(
    codec: &HeaderCodec,
    buf: &'a [u8],
    hasher: &H,
    verifier: &V,
) -> Result<SignedImage<'a>, VerifyError>
where
    H: ImageHasher + ?Sized,
    V: SignatureVerifier + ?Sized,
{
    let image = SignedImage::parse_with(codec, buf)?;
    let header = image.header();
    let trailer = image.trailer();

    if header.is_encrypted() && header.img_size as usize % AES_BLOCK_SIZE != 0 {
        tracing::debug!(img_size = header.img_size, "encrypted payload not block aligned");
        return Err(VerifyError::UnalignedCiphertext { img_size: header.img_size });
    }

    let digest = hasher.digest(image.header_bytes(), image.payload());
    if digest[..] != *trailer.hash() {
        tracing::debug!(expected = %hex::encode(trailer.hash()), actual = %hex::encode(digest), "hash mismatch");
        return Err(VerifyError::HashMismatch);
    }

    let signing_key = match (trailer.pub_key(), trailer.sig_key()) {
        (Some(pub_key), Some(sig_key)) => {
            if !verifier.verify(header.algo, pub_key, sig_key, None) {
                tracing::debug!(algo = header.algo, "embedded public key not signed by root key");
                return Err(VerifyError::KeySignatureInvalid);
            }
            Some(pub_key)
        }
        _ => None,
    };

    if !verifier.verify(header.algo, trailer.hash(), trailer.sig(), signing_key) {
        tracing::debug!(algo = header.algo, img_type = %header.img_type, "image signature rejected");
        return Err(VerifyError::SignatureInvalid);
    }

    tracing::debug!(header = %header.summary(), "signed image verified");
    Ok(image)
}
