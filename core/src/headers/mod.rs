//! headers/mod.rs
//! Signed TA header (`shdr`) codec.
//!
//! Layout notes:
//! - Fixed 128-byte struct of nine 32-bit words, seven reserved words and the
//!   AES nonce / key / IV.
//! - Followed by a trailer: hash (32) and signature (256), then public key and
//!   key signature (256 each) for `Signed` images only.
//! - The payload image (`img_size` bytes) follows the trailer.

pub mod types;
pub mod layout;
pub mod encode;
pub mod decode;
pub mod codec;

pub use types::*;
pub use layout::*;
pub use encode::*;
pub use decode::*;
pub use codec::*;
