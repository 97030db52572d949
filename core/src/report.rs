//! report.rs
//!
//! Serializable description of a decoded header, for inspection tools.
//! AES key material is never included; only whether the image is encrypted
//! and its public nonce / IV.

use serde::{Deserialize, Serialize};

use crate::constants::RESERVED_WORDS;
use crate::headers::{expected_total_size, SignedHeader, TrailerView};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderReport {
    pub magic: u32,
    pub version: u32,
    pub flags: u32,
    pub algo: u32,
    pub arb_cvn: u32,
    pub img_type: String,
    pub img_size: u32,
    pub key_type: String,
    pub marketid: u32,
    pub reserved: [u32; RESERVED_WORDS],
    pub total_size: usize,
    pub hash: String,
    pub sig: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub pub_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sig_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub nonce: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub aes_iv: Option<String>,
}

impl HeaderReport {
    pub fn from_parts(header: &SignedHeader, trailer: &TrailerView<'_>) -> Self {
        let enc = header.encryption();
        Self {
            magic: header.magic,
            version: header.version,
            flags: header.flags,
            algo: header.algo,
            arb_cvn: header.arb_cvn,
            img_type: header.img_type.name().to_string(),
            img_size: header.img_size,
            key_type: header.key_type.name().to_string(),
            marketid: header.marketid,
            reserved: header.reserved,
            total_size: expected_total_size(header.img_type),
            hash: hex::encode(trailer.hash()),
            sig: hex::encode(trailer.sig()),
            pub_key: trailer.pub_key().map(hex::encode),
            sig_key: trailer.sig_key().map(hex::encode),
            nonce: enc.map(|e| hex::encode(e.nonce)),
            aes_iv: enc.map(|e| hex::encode(e.aes_iv)),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
