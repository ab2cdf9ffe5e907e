//! Custom networks loaded from JSON.
//!
//! ```json
//! { "networks": [
//!     { "name": "litecoin", "net": 3686187259, "pub_key_hash_addr_id": 48,
//!       "script_hash_addr_id": 50, "private_key_id": 176, "bech32_hrp": "ltc" }
//! ] }
//! ```

use crate::error::{AddressError, Result};
use crate::network::NetworkParams;
use crate::registry::{register_network, NetworkRegistry};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworksConfig {
    #[serde(default)]
    pub networks: Vec<NetworkParams>,
}

impl NetworksConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        for params in &config.networks {
            params
                .validate()
                .map_err(|e| AddressError::Config(format!("network '{}': {}", params.name, e)))?;
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading network configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Register every network, stopping at the first one rejected
    pub fn register_into(&self, registry: &mut NetworkRegistry) -> Result<()> {
        for params in &self.networks {
            registry.register(params.clone())?;
        }
        Ok(())
    }

    /// Register every network in the process-wide registry
    pub fn register_global(&self) -> Result<()> {
        for params in &self.networks {
            register_network(params.clone())?;
        }
        Ok(())
    }
}
