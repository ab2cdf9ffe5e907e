//! WIF (Wallet Import Format) private keys
//!
//! `private_key_id || key[32] || 0x01?` as Base58Check. The optional 0x01
//! suffix marks a key whose public key is serialized compressed.

use crate::base58;
use crate::error::{AddressError, Result};
use crate::network::NetworkParams;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use std::str::FromStr;
use zeroize::{Zeroizing, ZeroizeOnDrop};

/// Private key length
pub const PRIVATE_KEY_SIZE: usize = 32;

const COMPRESS_MAGIC: u8 = 0x01;
const UNCOMPRESSED_WIF_LEN: usize = 1 + PRIVATE_KEY_SIZE + base58::CHECKSUM_BYTES;
const COMPRESSED_WIF_LEN: usize = UNCOMPRESSED_WIF_LEN + 1;

/// A private key with its compression flag and network byte
#[derive(Clone, ZeroizeOnDrop)]
pub struct Wif {
    priv_key: [u8; PRIVATE_KEY_SIZE],
    compressed: bool,
    net_id: u8,
}

impl Wif {
    pub fn new(priv_key: &[u8], params: &NetworkParams, compressed: bool) -> Result<Self> {
        if priv_key.len() != PRIVATE_KEY_SIZE {
            return Err(AddressError::InvalidLength {
                expected: PRIVATE_KEY_SIZE,
                actual: priv_key.len(),
            });
        }
        Ok(Self::from_key_slice(priv_key, compressed, params.private_key_id))
    }

    /// `key` must be `PRIVATE_KEY_SIZE` bytes. It is copied only into the
    /// zeroize-on-drop struct.
    fn from_key_slice(key: &[u8], compressed: bool, net_id: u8) -> Self {
        let mut wif = Self {
            priv_key: [0u8; PRIVATE_KEY_SIZE],
            compressed,
            net_id,
        };
        wif.priv_key.copy_from_slice(key);
        wif
    }

    /// Parse a WIF string.
    ///
    /// Length and suffix are checked before the checksum, so a string of the
    /// wrong shape is `MalformedPrivateKey` even if its checksum is also bad.
    pub fn decode(wif: &str) -> Result<Self> {
        let decoded = Zeroizing::new(
            bs58::decode(wif)
                .into_vec()
                .map_err(|e| AddressError::MalformedPrivateKey(e.to_string()))?,
        );

        let compressed = match decoded.len() {
            UNCOMPRESSED_WIF_LEN => false,
            COMPRESSED_WIF_LEN if decoded[1 + PRIVATE_KEY_SIZE] == COMPRESS_MAGIC => true,
            COMPRESSED_WIF_LEN => {
                return Err(AddressError::MalformedPrivateKey(format!(
                    "compression suffix 0x{:02x}, expected 0x{:02x}",
                    decoded[1 + PRIVATE_KEY_SIZE],
                    COMPRESS_MAGIC
                )));
            }
            len => {
                return Err(AddressError::MalformedPrivateKey(format!(
                    "decoded length {}, expected {} or {}",
                    len, UNCOMPRESSED_WIF_LEN, COMPRESSED_WIF_LEN
                )));
            }
        };

        let payload = base58::verify_checksum(&decoded)?;

        Ok(Self::from_key_slice(
            &payload[1..1 + PRIVATE_KEY_SIZE],
            compressed,
            payload[0],
        ))
    }

    pub fn encode(&self) -> String {
        let mut payload = Zeroizing::new(Vec::with_capacity(PRIVATE_KEY_SIZE + 1));
        payload.extend_from_slice(&self.priv_key);
        if self.compressed {
            payload.push(COMPRESS_MAGIC);
        }
        base58::check_encode(&payload, &[self.net_id])
    }

    /// Whether the key's version byte is the WIF byte of `params`
    pub fn is_for_net(&self, params: &NetworkParams) -> bool {
        self.net_id == params.private_key_id
    }

    pub fn priv_key(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.priv_key
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn net_id(&self) -> u8 {
        self.net_id
    }

    /// Serialized public key, compressed or not per the WIF flag
    pub fn serialize_pub_key(&self) -> Result<Vec<u8>> {
        let secp = Secp256k1::signing_only();
        let secret = SecretKey::from_slice(&self.priv_key)?;
        let public = PublicKey::from_secret_key(&secp, &secret);

        Ok(if self.compressed {
            public.serialize().to_vec()
        } else {
            public.serialize_uncompressed().to_vec()
        })
    }
}

impl std::fmt::Display for Wif {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl std::fmt::Debug for Wif {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wif")
            .field("priv_key", &"[REDACTED]")
            .field("compressed", &self.compressed)
            .field("net_id", &format_args!("0x{:02x}", self.net_id))
            .finish()
    }
}

impl FromStr for Wif {
    type Err = AddressError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::decode(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAINNET_KEY: &str = "f1df400b3356604414b075596348ca0985627eb2f3b38332c6510820a2143dc8";
    const TESTNET_KEY: &str = "103e054501fcb286c20295baa7a54a1e03652efa472194adcec4248a3df084eb";

    #[test]
    fn test_new_and_decode_agree_on_key() {
        let key = hex::decode(TESTNET_KEY).unwrap();
        let built = Wif::new(&key, &NetworkParams::TESTNET3, true).unwrap();
        let decoded = Wif::decode(&built.encode()).unwrap();
        assert_eq!(decoded.priv_key(), built.priv_key());
        assert_eq!(decoded.priv_key().as_slice(), key.as_slice());
        assert_eq!(decoded.net_id(), NetworkParams::TESTNET3.private_key_id);

        assert!(matches!(
            Wif::new(&key[..31], &NetworkParams::TESTNET3, true),
            Err(AddressError::InvalidLength { expected: 32, actual: 31 })
        ));
    }

    #[test]
    fn test_encode_uncompressed_mainnet() {
        let key = hex::decode(MAINNET_KEY).unwrap();
        let wif = Wif::new(&key, &NetworkParams::MAINNET, false).unwrap();
        assert_eq!(wif.to_string(), "7sPPHZ7127xo1NAGtoMHGeoBHWTTBTVKmawchyLMXPEpRbrhbGN");
        assert!(wif.is_for_net(&NetworkParams::MAINNET));
        assert!(!wif.is_for_net(&NetworkParams::TESTNET3));
        assert_eq!(
            hex::encode(wif.serialize_pub_key().unwrap()),
            "04383b4004e97faa23b476607e2299960736fd96eb2a8b8a93130ad1babce8ebdf8a67918ae8b6fa3f001b70f6e645c58eeefe6090e2fea12d4e647684532422d7"
        );
    }

    #[test]
    fn test_decode_compressed_testnet() {
        let wif = Wif::decode("cN8GsdKbCifhAFzPsucjWHPvKH7isup3WReCHGgYznAmWiBKyzv3").unwrap();
        assert!(wif.compressed());
        assert_eq!(wif.net_id(), 0xef);
        assert_eq!(hex::encode(wif.priv_key()), TESTNET_KEY);
        assert!(wif.is_for_net(&NetworkParams::TESTNET3));
        assert!(wif.is_for_net(&NetworkParams::REGTEST));
        assert_eq!(
            hex::encode(wif.serialize_pub_key().unwrap()),
            "02ac92a96532e6700bb78e3cb7e68572ae73c9b2f9fb9d3347b83a66a77885881d"
        );
        assert_eq!(wif.encode(), "cN8GsdKbCifhAFzPsucjWHPvKH7isup3WReCHGgYznAmWiBKyzv3");
    }

    #[test]
    fn test_decode_invalid_length() {
        assert!(matches!(
            Wif::decode("deadbeef"),
            Err(AddressError::MalformedPrivateKey(_))
        ));
    }

    #[test]
    fn test_decode_invalid_compress_magic() {
        assert!(matches!(
            Wif::decode("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sfZr2ym"),
            Err(AddressError::MalformedPrivateKey(_))
        ));
    }

    #[test]
    fn test_decode_invalid_checksum() {
        assert!(matches!(
            Wif::decode("5HueCGU8rMjxEXxiPuD5BDku4MkFqeZyd4dZ1jvhTVqvbTLvyTj"),
            Err(AddressError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_decode_invalid_alphabet() {
        assert!(matches!(
            Wif::decode("0OIl"),
            Err(AddressError::MalformedPrivateKey(_))
        ));
    }

    #[test]
    fn test_new_rejects_wrong_key_length() {
        assert!(matches!(
            Wif::new(&[1u8; 31], &NetworkParams::MAINNET, true),
            Err(AddressError::InvalidLength { expected: 32, actual: 31 })
        ));
    }

    #[test]
    fn test_serialize_pub_key_rejects_invalid_scalar() {
        let wif = Wif::new(&[0u8; 32], &NetworkParams::MAINNET, true).unwrap();
        assert!(matches!(
            wif.serialize_pub_key(),
            Err(AddressError::Secp256k1Error(_))
        ));
    }

    #[test]
    fn test_debug_redacts_key() {
        let key = hex::decode(MAINNET_KEY).unwrap();
        let wif = Wif::new(&key, &NetworkParams::MAINNET, true).unwrap();
        let debug = format!("{:?}", wif);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("f1df400b"));
    }

    #[test]
    fn test_from_str() {
        let wif: Wif = "7sPPHZ7127xo1NAGtoMHGeoBHWTTBTVKmawchyLMXPEpRbrhbGN".parse().unwrap();
        assert!(!wif.compressed());
        assert_eq!(hex::encode(wif.priv_key()), MAINNET_KEY);
    }
}
