
/// Magic number at offset 0 of every signed header.
/// Read as a 32-bit word in the codec's word order; on little-endian hosts the
/// bytes spell "HSTO".
pub const SHDR_MAGIC: u32 = 0x4f54_5348;

/// Size of the image digest stored in the trailer (SHA-256).
pub const SHA_DIGEST_SIZE: usize = 32;
/// Size of an RSA-2048 signature or public key modulus.
pub const RSA_PUB_KEY_SIZE: usize = 256;
/// Signature size equals the key modulus size.
pub const SIG_SIZE: usize = RSA_PUB_KEY_SIZE;

/// AES-256 key length.
pub const AES_KEY_SIZE: usize = 32;
/// AES IV length. The nonce field uses the same width.
pub const AES_IV_SIZE: usize = 16;
/// AES block size; encrypted payloads are a whole number of blocks.
pub const AES_BLOCK_SIZE: usize = 16;

/// Number of reserved 32-bit words.
pub const RESERVED_WORDS: usize = 7;

/// Fixed part of the header (no padding).
pub const HEADER_INFO_SIZE: usize = 9 * 4      // magic .. marketid
    + RESERVED_WORDS * 4                       // reserved
    + AES_IV_SIZE                              // nonce
    + AES_KEY_SIZE                             // aes_key
    + AES_IV_SIZE;                             // aes_iv

/// Header + trailer for Plain / Unsigned images.
pub const BASE_HEADER_SIZE: usize = HEADER_INFO_SIZE + SHA_DIGEST_SIZE + SIG_SIZE;

/// Header + trailer for Signed images (largest possible header).
pub const MAX_HEADER_SIZE: usize = BASE_HEADER_SIZE + 2 * RSA_PUB_KEY_SIZE;

/// Byte offsets of every field, each one derived from the field before it.
pub mod offsets {
    use super::{AES_IV_SIZE, AES_KEY_SIZE, RESERVED_WORDS, RSA_PUB_KEY_SIZE, SHA_DIGEST_SIZE, SIG_SIZE};

    pub const MAGIC: usize    = 0;
    pub const VERSION: usize  = MAGIC + 4;
    pub const FLAGS: usize    = VERSION + 4;
    pub const ALGO: usize     = FLAGS + 4;
    pub const ARB_CVN: usize  = ALGO + 4;
    pub const IMG_TYPE: usize = ARB_CVN + 4;
    pub const IMG_SIZE: usize = IMG_TYPE + 4;
    pub const KEY_TYPE: usize = IMG_SIZE + 4;
    pub const MARKETID: usize = KEY_TYPE + 4;
    pub const RESERVED: usize = MARKETID + 4;
    pub const NONCE: usize    = RESERVED + RESERVED_WORDS * 4;
    pub const AES_KEY: usize  = NONCE + AES_IV_SIZE;
    pub const AES_IV: usize   = AES_KEY + AES_KEY_SIZE;

    // Trailer
    pub const HASH: usize     = AES_IV + AES_IV_SIZE;
    pub const SIG: usize      = HASH + SHA_DIGEST_SIZE;
    pub const PUB_KEY: usize  = SIG + SIG_SIZE;
    pub const SIG_KEY: usize  = PUB_KEY + RSA_PUB_KEY_SIZE;
}
