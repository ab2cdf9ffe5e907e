//! Registry of networks the codecs resolve version bytes and HRPs against.
//!
//! A [`NetworkRegistry`] is a plain value: build one, register custom
//! networks into it, then hand it to the decoder by reference. For callers
//! that want ambient state there is also a process-wide registry behind a
//! read-write lock. Registration takes the write lock only for the insertion
//! itself; every decode takes the read lock.
//!
//! Entries are kept in registration order. When several networks share a
//! version byte (Dash testnet and regtest do), lookups return the one
//! registered first.

use crate::error::{AddressError, Result};
use crate::network::NetworkParams;
use log::debug;
use once_cell::sync::Lazy;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

static GLOBAL_REGISTRY: Lazy<RwLock<NetworkRegistry>> =
    Lazy::new(|| RwLock::new(NetworkRegistry::with_predefined()));

/// Networks in registration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkRegistry {
    networks: Vec<NetworkParams>,
}

impl NetworkRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self { networks: Vec::new() }
    }

    /// A registry holding mainnet, testnet3 and regtest
    pub fn with_predefined() -> Self {
        Self {
            networks: NetworkParams::predefined().to_vec(),
        }
    }

    /// Add a network.
    ///
    /// Fails with `DuplicateNetwork` if its name, wire magic or HRP is
    /// already taken, and with `InvalidHrp` if the HRP is not a valid
    /// lower-case bech32 prefix.
    pub fn register(&mut self, params: NetworkParams) -> Result<()> {
        params.validate()?;

        if let Some(existing) = self.networks.iter().find(|n| {
            n.name.eq_ignore_ascii_case(&params.name)
                || n.net == params.net
                || n.bech32_hrp == params.bech32_hrp
        }) {
            return Err(AddressError::DuplicateNetwork(format!(
                "'{}' clashes with registered network '{}'",
                params.name, existing.name
            )));
        }

        debug!(
            "Registered network {} (pkh 0x{:02x}, sh 0x{:02x}, wif 0x{:02x}, hrp {})",
            params, params.pub_key_hash_addr_id, params.script_hash_addr_id,
            params.private_key_id, params.bech32_hrp
        );
        self.networks.push(params);
        Ok(())
    }

    pub fn networks(&self) -> &[NetworkParams] {
        &self.networks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NetworkParams> {
        self.networks.iter()
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Look up a network by its registered name, ignoring case
    pub fn by_name(&self, name: &str) -> Option<&NetworkParams> {
        self.networks.iter().find(|n| n.name.eq_ignore_ascii_case(name))
    }

    /// Registered network by name, falling back to the aliases of the
    /// predefined networks ("main", "testnet", ...)
    pub fn resolve(&self, name: &str) -> Result<NetworkParams> {
        match self.by_name(name) {
            Some(params) => Ok(params.clone()),
            None => name.parse(),
        }
    }

    /// Look up a network by bech32 HRP, ignoring case
    pub fn by_hrp(&self, hrp: &str) -> Option<&NetworkParams> {
        self.networks.iter().find(|n| n.bech32_hrp.eq_ignore_ascii_case(hrp))
    }

    /// Look up a network by wire magic
    pub fn by_net(&self, net: u32) -> Option<&NetworkParams> {
        self.networks.iter().find(|n| n.net == net)
    }

    /// First registered network using `id` as its pay-to-pubkey-hash byte
    pub fn by_pub_key_hash_addr_id(&self, id: u8) -> Option<&NetworkParams> {
        self.networks.iter().find(|n| n.pub_key_hash_addr_id == id)
    }

    /// First registered network using `id` as its pay-to-script-hash byte
    pub fn by_script_hash_addr_id(&self, id: u8) -> Option<&NetworkParams> {
        self.networks.iter().find(|n| n.script_hash_addr_id == id)
    }

    /// First registered network using `id` as its WIF byte
    pub fn by_private_key_id(&self, id: u8) -> Option<&NetworkParams> {
        self.networks.iter().find(|n| n.private_key_id == id)
    }

    pub fn is_pub_key_hash_addr_id(&self, id: u8) -> bool {
        self.by_pub_key_hash_addr_id(id).is_some()
    }

    pub fn is_script_hash_addr_id(&self, id: u8) -> bool {
        self.by_script_hash_addr_id(id).is_some()
    }

    pub fn is_private_key_id(&self, id: u8) -> bool {
        self.by_private_key_id(id).is_some()
    }

    /// Whether `prefix` is a registered HRP followed by the `1` separator,
    /// e.g. `"bc1"` or `"TB1"`
    pub fn is_bech32_segwit_prefix(&self, prefix: &str) -> bool {
        prefix
            .strip_suffix(crate::bech32::SEPARATOR)
            .map_or(false, |hrp| self.by_hrp(hrp).is_some())
    }
}

impl Default for NetworkRegistry {
    fn default() -> Self {
        Self::with_predefined()
    }
}

impl<'a> IntoIterator for &'a NetworkRegistry {
    type Item = &'a NetworkParams;
    type IntoIter = std::slice::Iter<'a, NetworkParams>;

    fn into_iter(self) -> Self::IntoIter {
        self.networks.iter()
    }
}

/// Register a network in the process-wide registry
pub fn register_network(params: NetworkParams) -> Result<()> {
    GLOBAL_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(params)
}

/// Read access to the process-wide registry.
///
/// Holding the guard blocks registration, so keep it short lived.
pub fn global_registry() -> RwLockReadGuard<'static, NetworkRegistry> {
    GLOBAL_REGISTRY.read().unwrap_or_else(PoisonError::into_inner)
}
