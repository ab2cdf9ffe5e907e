//! Address and private key text encodings for Dash networks.
//!
//! Covers Base58Check pay-to-pubkey-hash and pay-to-script-hash addresses,
//! bech32/bech32m segwit and taproot addresses, raw hex public keys, and WIF
//! private keys. Network identifiers come from a [`NetworkRegistry`] that
//! can be extended with custom networks.
//!
//! ```
//! use dash_address_codec::{NetworkParams, NetworkRegistry};
//!
//! let registry = NetworkRegistry::default();
//! let address = registry
//!     .decode_address("Xbp12jNUxd588MppSqcmvb5zfgJNjtLi1Q", &NetworkParams::MAINNET)
//!     .unwrap();
//! assert!(address.is_for_net(&NetworkParams::MAINNET));
//! assert_eq!(address.encode_address(), "Xbp12jNUxd588MppSqcmvb5zfgJNjtLi1Q");
//! ```

pub mod address;
pub mod base58;
pub mod bech32;
pub mod config;
pub mod decode;
pub mod error;
pub mod hash;
pub mod info;
pub mod network;
pub mod registry;
pub mod wif;

#[cfg(feature = "wasm-bindgen")]
pub mod wasm;

pub use address::{Address, AddressKind, AddressPubKey, PubKeyFormat};
pub use config::NetworksConfig;
pub use decode::decode_address;
pub use error::{AddressError, Result};
pub use info::{AddressInfo, WifInfo};
pub use network::NetworkParams;
pub use registry::{global_registry, register_network, NetworkRegistry};
pub use wif::Wif;
