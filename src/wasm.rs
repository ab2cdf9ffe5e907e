use wasm_bindgen::prelude::*;

use crate::info::{AddressInfo, WifInfo};
use crate::registry::global_registry;
use crate::wif::Wif;

/// Decode an address, taking `network` (mainnet, testnet3, regtest or a
/// registered custom name) as the default network
#[wasm_bindgen]
pub fn decode_address(address: &str, network: &str) -> Result<JsValue, JsError> {
    let registry = global_registry();
    let default_net = registry
        .resolve(network)
        .map_err(|e| JsError::new(&e.to_string()))?;

    let address = registry
        .decode_address(address.trim(), &default_net)
        .map_err(|e| JsError::new(&format!("Error decoding address: {}", e)))?;

    Ok(serde_wasm_bindgen::to_value(&AddressInfo::new(&address, &registry))?)
}

/// Decode a WIF private key without exposing the key itself
#[wasm_bindgen]
pub fn decode_wif(wif: &str) -> Result<JsValue, JsError> {
    let wif = Wif::decode(wif.trim())
        .map_err(|e| JsError::new(&format!("Error decoding private key: {}", e)))?;

    Ok(serde_wasm_bindgen::to_value(&WifInfo::new(&wif, &global_registry()))?)
}
