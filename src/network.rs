use crate::error::{AddressError, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;

/// Longest human-readable part a bech32 string may carry
pub const MAX_HRP_LEN: usize = 83;

/// Address and key identifiers for one logical network
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkParams {
    /// Registry name, unique across registered networks
    pub name: Cow<'static, str>,
    /// Wire protocol magic, unique across registered networks
    pub net: u32,
    /// Base58Check version byte of pay-to-pubkey-hash addresses
    pub pub_key_hash_addr_id: u8,
    /// Base58Check version byte of pay-to-script-hash addresses
    pub script_hash_addr_id: u8,
    /// Base58Check version byte of WIF private keys
    pub private_key_id: u8,
    /// Lower-case bech32 prefix of segwit addresses
    pub bech32_hrp: Cow<'static, str>,
}

impl NetworkParams {
    /// Dash mainnet
    pub const MAINNET: NetworkParams = NetworkParams {
        name: Cow::Borrowed("mainnet"),
        net: 0xbd6b_0cbf,
        pub_key_hash_addr_id: 0x4c, // X
        script_hash_addr_id: 0x10,  // 7
        private_key_id: 0xcc,       // 7 or X
        bech32_hrp: Cow::Borrowed("bc"),
    };

    /// Dash testnet (version 3)
    pub const TESTNET3: NetworkParams = NetworkParams {
        name: Cow::Borrowed("testnet3"),
        net: 0xffca_e2ce,
        pub_key_hash_addr_id: 0x8c, // y
        script_hash_addr_id: 0x13,  // 8 or 9
        private_key_id: 0xef,       // 9 or c
        bech32_hrp: Cow::Borrowed("tb"),
    };

    /// Dash regression test network
    pub const REGTEST: NetworkParams = NetworkParams {
        name: Cow::Borrowed("regtest"),
        net: 0xdcb7_c1fc,
        pub_key_hash_addr_id: 0x8c,
        script_hash_addr_id: 0x13,
        private_key_id: 0xef,
        bech32_hrp: Cow::Borrowed("bcrt"),
    };

    /// Build validated parameters for a custom network
    pub fn new(
        name: impl Into<String>,
        net: u32,
        pub_key_hash_addr_id: u8,
        script_hash_addr_id: u8,
        private_key_id: u8,
        bech32_hrp: impl Into<String>,
    ) -> Result<Self> {
        let params = Self {
            name: Cow::Owned(name.into()),
            net,
            pub_key_hash_addr_id,
            script_hash_addr_id,
            private_key_id,
            bech32_hrp: Cow::Owned(bech32_hrp.into()),
        };
        params.validate()?;
        Ok(params)
    }

    /// Networks known without any registration, in registration order
    pub fn predefined() -> [NetworkParams; 3] {
        [Self::MAINNET, Self::TESTNET3, Self::REGTEST]
    }

    /// Check the invariants every registered network must satisfy
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(AddressError::Config("network name is empty".to_string()));
        }
        validate_hrp(&self.bech32_hrp)
    }

    /// Get network name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the bech32 human-readable part
    pub fn hrp(&self) -> &str {
        &self.bech32_hrp
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        NetworkParams::MAINNET
    }
}

impl FromStr for NetworkParams {
    type Err = AddressError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::MAINNET),
            "testnet3" | "testnet" | "test" => Ok(Self::TESTNET3),
            "regtest" | "regnet" => Ok(Self::REGTEST),
            invalid => Err(AddressError::UnknownNetwork(invalid.to_string())),
        }
    }
}

impl std::fmt::Display for NetworkParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (0x{:08x})", self.name, self.net)
    }
}

/// A bech32 prefix is 1 to 83 lower-case printable ASCII characters
pub fn validate_hrp(hrp: &str) -> Result<()> {
    if hrp.is_empty() || hrp.len() > MAX_HRP_LEN {
        return Err(AddressError::InvalidHrp(format!(
            "length {} outside 1..={}",
            hrp.len(),
            MAX_HRP_LEN
        )));
    }
    if let Some(c) = hrp.chars().find(|c| !matches!(*c as u32, 33..=126)) {
        return Err(AddressError::InvalidHrp(format!("character {:?} not allowed", c)));
    }
    if hrp.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AddressError::InvalidHrp(format!("'{}' is not lower case", hrp)));
    }
    Ok(())
}
