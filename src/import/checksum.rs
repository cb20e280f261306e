//! Content digests the backend uses to verify transmitted bytes

use md5::{Digest, Md5};

use crate::backend::Checksum;

/// Algorithm identifier sent alongside every digest
pub const CHECKSUM_ALGORITHM: &str = "MD5";

pub fn checksum(data: &[u8]) -> Checksum {
    Checksum {
        algorithm: CHECKSUM_ALGORITHM.to_string(),
        value: Md5::digest(data).to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_digest() {
        // RFC 1321 test suite: MD5("abc")
        let expected = [
            0x90, 0x01, 0x50, 0x98, 0x3c, 0xd2, 0x4f, 0xb0, 0xd6, 0x96, 0x3f, 0x7d, 0x28, 0xe1,
            0x7f, 0x72,
        ];

        let digest = checksum(b"abc");
        assert_eq!(digest.algorithm, "MD5");
        assert_eq!(digest.value, expected);
    }

    #[test]
    fn is_deterministic() {
        let data = b"<record><title>Decision 2024/17</title></record>";
        assert_eq!(checksum(data), checksum(data));
    }

    #[test]
    fn single_byte_change_alters_digest() {
        let original = b"<record><title>Decision 2024/17</title></record>".to_vec();
        let mut tampered = original.clone();
        tampered[10] ^= 0x01;

        assert_ne!(checksum(&original).value, checksum(&tampered).value);
    }

    #[test]
    fn digest_is_128_bits_for_any_input() {
        assert_eq!(checksum(&[]).value.len(), 16);
        assert_eq!(checksum(&vec![0xAB; 1 << 20]).value.len(), 16);
    }
}
