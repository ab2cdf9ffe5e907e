use crate::address::{Address, AddressKind, PubKeyFormat};
use crate::registry::NetworkRegistry;
use crate::wif::Wif;
use serde::{Deserialize, Serialize};

/// Serializable summary of a decoded address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    /// Canonical string; hex for raw public keys
    pub address: String,
    /// Encoded address; the P2PKH string for raw public keys
    pub encoded: String,
    pub kind: AddressKind,
    /// Name of the first registered network the address resolves to
    pub network: Option<String>,
    pub version_byte: Option<u8>,
    pub hrp: Option<String>,
    pub witness_version: Option<u8>,
    /// Hex of the hash or program a locking script commits to
    pub script_address: String,
    pub pub_key_format: Option<PubKeyFormat>,
}

impl AddressInfo {
    pub fn new(address: &Address, registry: &NetworkRegistry) -> Self {
        let network = match address {
            Address::PubKeyHash(a) => registry.by_pub_key_hash_addr_id(a.net_id()),
            Address::PubKey(a) => registry.by_pub_key_hash_addr_id(a.net_id()),
            Address::ScriptHash(a) => registry.by_script_hash_addr_id(a.net_id()),
            Address::WitnessPubKeyHash(a)
            | Address::WitnessScriptHash(a)
            | Address::Taproot(a) => registry.by_hrp(a.hrp()),
        };

        Self {
            address: address.to_string(),
            encoded: address.encode_address(),
            kind: address.kind(),
            network: network.map(|n| n.name().to_string()),
            version_byte: address.net_id(),
            hrp: address.hrp().map(str::to_string),
            witness_version: address.witness_version(),
            script_address: hex::encode(address.script_address()),
            pub_key_format: match address {
                Address::PubKey(a) => Some(a.format()),
                _ => None,
            },
        }
    }
}

/// Serializable summary of a WIF key. The private key itself is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifInfo {
    pub network: Option<String>,
    pub version_byte: u8,
    pub compressed: bool,
    /// Hex public key, absent if the key is not a valid secp256k1 scalar
    pub pub_key: Option<String>,
}

impl WifInfo {
    pub fn new(wif: &Wif, registry: &NetworkRegistry) -> Self {
        Self {
            network: registry
                .by_private_key_id(wif.net_id())
                .map(|n| n.name().to_string()),
            version_byte: wif.net_id(),
            compressed: wif.compressed(),
            pub_key: wif.serialize_pub_key().ok().map(hex::encode),
        }
    }
}
