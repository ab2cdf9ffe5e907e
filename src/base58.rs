//! Base58Check: `version || payload || sha256d(version || payload)[..4]`
//! rendered in the Bitcoin base58 alphabet.

use crate::error::{AddressError, Result};
use crate::hash::sha256d;

/// The number of checksum bytes appended before base58 encoding
pub const CHECKSUM_BYTES: usize = 4;

/// First four bytes of the double SHA256 of `data`
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_BYTES] {
    let hash = sha256d(data);
    let mut result = [0u8; CHECKSUM_BYTES];
    result.copy_from_slice(&hash[..CHECKSUM_BYTES]);
    result
}

/// Verify data with appended checksum, returning the data without it
pub fn verify_checksum(data_with_checksum: &[u8]) -> Result<&[u8]> {
    if data_with_checksum.len() < CHECKSUM_BYTES {
        return Err(AddressError::MalformedInput(format!(
            "{} bytes is shorter than the checksum",
            data_with_checksum.len()
        )));
    }

    let (data, expected) = data_with_checksum.split_at(data_with_checksum.len() - CHECKSUM_BYTES);
    if checksum(data) != expected {
        return Err(AddressError::ChecksumMismatch);
    }
    Ok(data)
}

/// Plain base58 decoding; each leading '1' becomes a leading zero byte
pub fn decode_raw(s: &str) -> Result<Vec<u8>> {
    Ok(bs58::decode(s).into_vec()?)
}

/// Encode `payload` prefixed with `version` and suffixed with its checksum
pub fn check_encode(payload: &[u8], version: &[u8]) -> String {
    let mut data = Vec::with_capacity(version.len() + payload.len() + CHECKSUM_BYTES);
    data.extend_from_slice(version);
    data.extend_from_slice(payload);
    let sum = checksum(&data);
    data.extend_from_slice(&sum);
    bs58::encode(data).into_string()
}

/// Decode a Base58Check string into `(version, payload)`, where the version
/// is the first `version_len` bytes
pub fn check_decode(s: &str, version_len: usize) -> Result<(Vec<u8>, Vec<u8>)> {
    let decoded = decode_raw(s)?;
    if decoded.len() < version_len + CHECKSUM_BYTES {
        return Err(AddressError::MalformedInput(format!(
            "decoded length {} is shorter than {} version bytes plus checksum",
            decoded.len(),
            version_len
        )));
    }

    let data = verify_checksum(&decoded)?;
    let (version, payload) = data.split_at(version_len);
    Ok((version.to_vec(), payload.to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_mainnet_pubkey_hash() {
        let hash = hex::decode("0c52b72d1a00be724243c624eea909d5de6d2a09").unwrap();
        assert_eq!(check_encode(&hash, &[0x4c]), "Xbp12jNUxd588MppSqcmvb5zfgJNjtLi1Q");
    }

    #[test]
    fn test_decode_roundtrip() {
        let (version, payload) = check_decode("Xbp12jNUxd588MppSqcmvb5zfgJNjtLi1Q", 1).unwrap();
        assert_eq!(version, vec![0x4c]);
        assert_eq!(hex::encode(&payload), "0c52b72d1a00be724243c624eea909d5de6d2a09");
        assert_eq!(check_encode(&payload, &version), "Xbp12jNUxd588MppSqcmvb5zfgJNjtLi1Q");
    }

    #[test]
    fn test_leading_zero_bytes() {
        let encoded = check_encode(&[0x00, 0x00, 0x01], &[0x00]);
        assert!(encoded.starts_with("111"));
        assert!(!encoded.starts_with("1111"));
        let (version, payload) = check_decode(&encoded, 1).unwrap();
        assert_eq!(version, vec![0x00]);
        assert_eq!(payload, vec![0x00, 0x00, 0x01]);
    }

    #[test]
    fn test_multi_byte_version() {
        let encoded = check_encode(&[0xab; 20], &[0x1c, 0xb8]);
        let (version, payload) = check_decode(&encoded, 2).unwrap();
        assert_eq!(version, vec![0x1c, 0xb8]);
        assert_eq!(payload, vec![0xab; 20]);
    }

    #[test]
    fn test_checksum_mismatch() {
        // last character altered
        assert!(matches!(
            check_decode("Xbp12jNUxd588MppSqcmvb5zfgJNjtLi1R", 1),
            Err(AddressError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_too_short() {
        assert!(matches!(check_decode("1111", 1), Err(AddressError::MalformedInput(_))));
        assert!(matches!(check_decode("", 1), Err(AddressError::MalformedInput(_))));
    }

    #[test]
    fn test_invalid_alphabet() {
        assert!(matches!(check_decode("0OIl", 1), Err(AddressError::Base58Error(_))));
    }

    #[test]
    fn test_single_character_substitution_detected() {
        let address = "XrfVnPa5LNzHddRc6npe1YLJE4WsV3WLjJ";
        for (i, original) in address.char_indices() {
            let replacement = if original == 'z' { 'y' } else { 'z' };
            let mut mutated = address.to_string();
            mutated.replace_range(i..i + 1, &replacement.to_string());
            assert!(check_decode(&mutated, 1).is_err(), "mutation at {} accepted", i);
        }
    }
}
