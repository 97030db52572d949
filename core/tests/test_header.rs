// Registry, validation and diagnostics of the header types.
//
// * no silent widening of image / key type registries
// * error message stability
// * inspection report contents

#[cfg(test)]
mod tests {
    use shdr_core::constants::SHDR_MAGIC;
    use shdr_core::headers::{decode, encode, HeaderError, ImageType, KeyType, SignedHeader, TrailerField, TrailerFields};
    use shdr_core::report::HeaderReport;
    use shdr_core::utils::{enum_name_or_hex, fmt_bytes};

// ## 1. Registries

    #[test]
    fn image_type_verify_accepts_known() {
        for v in [ImageType::Plain, ImageType::Unsigned, ImageType::Signed] {
            assert_eq!(ImageType::verify(v as u32).unwrap(), v);
        }
    }

    #[test]
    fn image_type_verify_rejects_unknown() {
        assert_eq!(ImageType::verify(3).unwrap_err(), HeaderError::InvalidImageType { raw: 3 });
        assert_eq!(
            ImageType::verify(u32::MAX).unwrap_err(),
            HeaderError::InvalidImageType { raw: u32::MAX }
        );
    }

    #[test]
    fn key_type_registry_skips_one() {
        KeyType::verify(0).unwrap();
        KeyType::verify(2).unwrap();
        assert_eq!(KeyType::verify(1).unwrap_err(), HeaderError::InvalidKeyType { raw: 1 });
    }

    #[test]
    fn only_signed_carries_keys() {
        assert!(!ImageType::Plain.has_key_fields());
        assert!(!ImageType::Unsigned.has_key_fields());
        assert!(ImageType::Signed.has_key_fields());
    }

// ## 2. Header helpers

    #[test]
    fn default_header_roundtrips_with_magic() {
        let h = SignedHeader::default();
        assert_eq!(h.magic, SHDR_MAGIC);
        assert_eq!(h.key_type, KeyType::None);

        let wire = encode(&h, &TrailerFields::unsigned(&[0; 32], &[0; 256])).unwrap();
        assert_eq!(decode(&wire).unwrap().0, h);
    }

    #[test]
    fn encryption_absent_unless_aes() {
        let mut h = SignedHeader::new(ImageType::Signed, 64);
        h.aes_key = [9; 32];
        assert!(h.encryption().is_none());

        h.set_encryption([1; 16], [9; 32], [2; 16]);
        assert!(h.is_encrypted());
        assert_eq!(h.encryption().unwrap().aes_key, &[9; 32]);
    }

    #[test]
    fn summary_mentions_type_and_size() {
        let h = SignedHeader { algo: 0x7000_4830, ..SignedHeader::new(ImageType::Signed, 4096) };
        let s = h.summary();
        assert!(s.contains("type=signed"), "{s}");
        assert!(s.contains("img_size=4096"), "{s}");
        assert!(s.contains("algo=0x70004830"), "{s}");
        assert!(!s.contains("nonce"), "{s}");
    }

// ## 3. Diagnostics

    #[test]
    fn enum_name_or_hex_known_and_unknown() {
        assert_eq!(enum_name_or_hex::<ImageType>(2), "Signed");
        assert_eq!(enum_name_or_hex::<KeyType>(1), "0x1");
    }

    #[test]
    fn fmt_bytes_ascii_and_binary() {
        assert_eq!(fmt_bytes(b"HSTO"), r#"b"HSTO""#);
        assert_eq!(fmt_bytes(&[0x00, 0xFF]), "0x00ff");
    }

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(
            HeaderError::TruncatedBuffer { have: 10, need: 128 }.to_string(),
            "header buffer too short: 10 < 128"
        );
        assert_eq!(
            HeaderError::InvalidMagic { have: 0xDEADBEEF, need: SHDR_MAGIC }.to_string(),
            "invalid magic: expected 0x4f545348, got 0xdeadbeef"
        );
        assert_eq!(HeaderError::InvalidImageType { raw: 7 }.to_string(), "invalid image type: 0x7");
        assert_eq!(
            HeaderError::FieldSizeMismatch { field: TrailerField::PubKey, expected: 256, actual: 0 }.to_string(),
            "pub_key must be 256 bytes, got 0"
        );
        assert_eq!(
            HeaderError::InconsistentKeyFields {
                img_type: ImageType::Plain,
                pub_key_present: true,
                sig_key_present: false,
            }
            .to_string(),
            "plain image with pub_key present=true, sig_key present=false"
        );
    }

// ## 4. Inspection report

    #[test]
    fn report_for_signed_image() {
        let header = SignedHeader { marketid: 77, ..SignedHeader::new(ImageType::Signed, 512) };
        let hash = [0xAB; 32];
        let sig = [0x01; 256];
        let key = [0x02; 256];
        let wire = encode(&header, &TrailerFields::signed(&hash, &sig, &key, &key)).unwrap();
        let (h, t) = decode(&wire).unwrap();

        let report = HeaderReport::from_parts(&h, &t);
        assert_eq!(report.img_type, "signed");
        assert_eq!(report.key_type, "none");
        assert_eq!(report.total_size, 928);
        assert_eq!(report.hash, "ab".repeat(32));
        assert_eq!(report.pub_key.as_deref(), Some("02".repeat(256).as_str()));
        assert!(report.nonce.is_none());

        let json = report.to_json().unwrap();
        let back: HeaderReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn report_never_contains_aes_key() {
        let mut header = SignedHeader::new(ImageType::Unsigned, 16);
        header.set_encryption([0x10; 16], [0x77; 32], [0x20; 16]);
        let wire = encode(&header, &TrailerFields::unsigned(&[0; 32], &[0; 256])).unwrap();
        let (h, t) = decode(&wire).unwrap();

        let report = HeaderReport::from_parts(&h, &t);
        assert_eq!(report.nonce.as_deref(), Some("10".repeat(16).as_str()));
        assert_eq!(report.aes_iv.as_deref(), Some("20".repeat(16).as_str()));

        let json = report.to_json().unwrap();
        assert!(!json.contains(&"77".repeat(32)));
        assert!(!json.contains("pub_key"));
    }
}
