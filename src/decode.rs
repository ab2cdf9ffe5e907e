//! Address string parsing.
//!
//! Families are tried in order: Base58Check, then bech32 for the default or
//! a registered HRP, then a raw hex public key. Once a family claims the
//! input its error is final. A Base58 checksum failure does not claim the
//! input on its own; it is reported only when no later family accepts the
//! string.

use crate::address::Address;
use crate::base58;
use crate::bech32;
use crate::error::{AddressError, AddressFormat, AddressParsingAttempt, Result};
use crate::network::NetworkParams;
use crate::registry::{global_registry, NetworkRegistry};
use log::{debug, trace};
use std::str::FromStr;

const COMPRESSED_PUB_KEY_HEX_LEN: usize = 66;
const UNCOMPRESSED_PUB_KEY_HEX_LEN: usize = 130;

impl NetworkRegistry {
    /// Parse an address string.
    ///
    /// Base58 version bytes and bech32 HRPs are resolved against
    /// `default_net` first and then against registered networks in
    /// registration order. A raw public key takes the pay-to-pubkey-hash byte
    /// of `default_net`.
    pub fn decode_address(&self, address: &str, default_net: &NetworkParams) -> Result<Address> {
        let mut attempts = Vec::new();
        let mut checksum_mismatch = false;

        match base58::decode_raw(address)
            .and_then(|raw| base58::verify_checksum(&raw).map(<[u8]>::to_vec))
        {
            Ok(data) => {
                debug!("Decoding '{}' as base58check", address);
                return self.classify_base58(&data, default_net);
            }
            Err(AddressError::ChecksumMismatch) => {
                checksum_mismatch = true;
                skip(&mut attempts, AddressFormat::Base58Check, "checksum mismatch".to_string());
            }
            Err(err) => skip(&mut attempts, AddressFormat::Base58Check, err.to_string()),
        }

        match address.rfind(bech32::SEPARATOR) {
            Some(pos)
                if default_net.hrp().eq_ignore_ascii_case(&address[..pos])
                    || self.by_hrp(&address[..pos]).is_some() =>
            {
                debug!("Decoding '{}' as bech32 under '{}'", address, &address[..pos]);
                let (hrp, version, program) = bech32::decode_segwit(address)?;
                return Address::from_witness_program(&hrp, version, &program);
            }
            Some(pos) => skip(
                &mut attempts,
                AddressFormat::Bech32,
                format!("prefix '{}' is not a registered network", &address[..pos]),
            ),
            None => skip(&mut attempts, AddressFormat::Bech32, "no separator".to_string()),
        }

        if matches!(
            address.len(),
            COMPRESSED_PUB_KEY_HEX_LEN | UNCOMPRESSED_PUB_KEY_HEX_LEN
        ) {
            match hex::decode(address) {
                Ok(bytes) => {
                    debug!("Decoding '{}' as a raw public key", address);
                    return Address::new_pub_key(&bytes, default_net);
                }
                Err(err) => skip(&mut attempts, AddressFormat::PubKeyHex, err.to_string()),
            }
        } else {
            skip(
                &mut attempts,
                AddressFormat::PubKeyHex,
                format!(
                    "length {} is neither {} nor {}",
                    address.len(),
                    COMPRESSED_PUB_KEY_HEX_LEN,
                    UNCOMPRESSED_PUB_KEY_HEX_LEN
                ),
            );
        }

        if checksum_mismatch {
            return Err(AddressError::ChecksumMismatch);
        }
        Err(AddressError::unknown_format(address, &attempts))
    }

    /// Map a checksum-verified `version || payload` to a hash address
    fn classify_base58(&self, data: &[u8], default_net: &NetworkParams) -> Result<Address> {
        let (&version, hash) = data
            .split_first()
            .ok_or_else(|| AddressError::MalformedInput("empty base58check payload".to_string()))?;

        let params = std::iter::once(default_net)
            .chain(self.iter())
            .find(|n| n.pub_key_hash_addr_id == version || n.script_hash_addr_id == version);

        let params = match params {
            Some(params) => params,
            None if default_net.private_key_id == version || self.is_private_key_id(version) => {
                return Err(AddressError::MalformedInput(format!(
                    "version byte 0x{:02x} is a private key, not an address",
                    version
                )));
            }
            None => {
                return Err(AddressError::MalformedInput(format!(
                    "unknown version byte 0x{:02x}",
                    version
                )));
            }
        };

        if params.pub_key_hash_addr_id == params.script_hash_addr_id {
            return Err(AddressError::AddressCollision { version });
        }

        if hash.len() != 20 {
            return Err(AddressError::MalformedInput(format!(
                "{} byte payload after version 0x{:02x}, expected 20",
                hash.len(),
                version
            )));
        }

        if params.pub_key_hash_addr_id == version {
            Address::new_pub_key_hash(hash, params)
        } else {
            Address::new_script_hash_from_hash(hash, params)
        }
    }
}

fn skip(attempts: &mut Vec<AddressParsingAttempt>, format: AddressFormat, reason: String) {
    trace!("Not a {} address: {}", format, reason);
    attempts.push(AddressParsingAttempt { format, reason });
}

/// Parse an address string against the process-wide registry
pub fn decode_address(address: &str, default_net: &NetworkParams) -> Result<Address> {
    global_registry().decode_address(address, default_net)
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parses with mainnet as the default network
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        decode_address(s, &NetworkParams::MAINNET)
    }
}
