use crate::base58;
use crate::bech32;
use crate::error::{AddressError, Result};
use crate::hash::hash160;
use crate::network::{validate_hrp, NetworkParams};
use serde::{Deserialize, Serialize};

const HASH160_SIZE: usize = 20;
const WITNESS_V0_PUB_KEY_HASH_SIZE: usize = 20;
const WITNESS_V0_SCRIPT_HASH_SIZE: usize = 32;
const TAPROOT_PROGRAM_SIZE: usize = 32;
const COMPRESSED_PUB_KEY_SIZE: usize = 33;
const UNCOMPRESSED_PUB_KEY_SIZE: usize = 65;

/// How a public key is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PubKeyFormat {
    /// 33 bytes, prefix 0x02 or 0x03
    Compressed,
    /// 65 bytes, prefix 0x04
    Uncompressed,
    /// 65 bytes, prefix 0x06 or 0x07 carrying the Y parity
    Hybrid,
}

impl PubKeyFormat {
    /// Format implied by the leading byte of a serialized key
    pub fn from_prefix(prefix: u8) -> Result<Self> {
        match prefix {
            0x02 | 0x03 => Ok(PubKeyFormat::Compressed),
            0x04 => Ok(PubKeyFormat::Uncompressed),
            0x06 | 0x07 => Ok(PubKeyFormat::Hybrid),
            other => Err(AddressError::InvalidPublicKey(format!(
                "unknown format byte 0x{:02x}",
                other
            ))),
        }
    }

    /// Serialized length of a key in this format
    pub fn serialized_len(self) -> usize {
        match self {
            PubKeyFormat::Compressed => COMPRESSED_PUB_KEY_SIZE,
            PubKeyFormat::Uncompressed | PubKeyFormat::Hybrid => UNCOMPRESSED_PUB_KEY_SIZE,
        }
    }
}

impl std::fmt::Display for PubKeyFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PubKeyFormat::Compressed => write!(f, "compressed"),
            PubKeyFormat::Uncompressed => write!(f, "uncompressed"),
            PubKeyFormat::Hybrid => write!(f, "hybrid"),
        }
    }
}

/// Address variant without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    PubKeyHash,
    ScriptHash,
    PubKey,
    WitnessPubKeyHash,
    WitnessScriptHash,
    Taproot,
}

impl std::fmt::Display for AddressKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AddressKind::PubKeyHash => "p2pkh",
            AddressKind::ScriptHash => "p2sh",
            AddressKind::PubKey => "p2pk",
            AddressKind::WitnessPubKeyHash => "p2wpkh",
            AddressKind::WitnessScriptHash => "p2wsh",
            AddressKind::Taproot => "p2tr",
        };
        write!(f, "{}", name)
    }
}

/// A 20-byte hash tagged with the Base58Check version byte of its network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashAddress {
    hash: [u8; HASH160_SIZE],
    net_id: u8,
}

impl HashAddress {
    fn from_slice(hash: &[u8], net_id: u8) -> Result<Self> {
        let hash: [u8; HASH160_SIZE] =
            hash.try_into().map_err(|_| AddressError::InvalidLength {
                expected: HASH160_SIZE,
                actual: hash.len(),
            })?;
        Ok(Self { hash, net_id })
    }

    pub fn hash160(&self) -> &[u8; HASH160_SIZE] {
        &self.hash
    }

    pub fn net_id(&self) -> u8 {
        self.net_id
    }

    fn encode(&self) -> String {
        base58::check_encode(&self.hash, &[self.net_id])
    }
}

/// A segwit program and the HRP it is encoded under.
///
/// The canonical string is produced once at construction, so an existing
/// value always encodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WitnessAddress {
    version: u8,
    program: Vec<u8>,
    hrp: String,
    encoded: String,
}

impl WitnessAddress {
    fn new(hrp: &str, version: u8, program: &[u8]) -> Result<Self> {
        let hrp = hrp.to_ascii_lowercase();
        validate_hrp(&hrp)?;
        let encoded = bech32::encode_segwit(&hrp, version, program)?;
        Ok(Self {
            version,
            program: program.to_vec(),
            hrp,
            encoded,
        })
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    pub fn hrp(&self) -> &str {
        &self.hrp
    }
}

/// A serialized secp256k1 public key paid to directly
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddressPubKey {
    serialized: Vec<u8>,
    format: PubKeyFormat,
    net_id: u8,
}

impl AddressPubKey {
    /// Wrap a serialized key. Only the format byte and length are checked.
    pub fn new(serialized: &[u8], net_id: u8) -> Result<Self> {
        let prefix = *serialized
            .first()
            .ok_or_else(|| AddressError::InvalidPublicKey("empty key".to_string()))?;
        let format = PubKeyFormat::from_prefix(prefix)?;
        if serialized.len() != format.serialized_len() {
            return Err(AddressError::InvalidLength {
                expected: format.serialized_len(),
                actual: serialized.len(),
            });
        }

        Ok(Self {
            serialized: serialized.to_vec(),
            format,
            net_id,
        })
    }

    pub fn format(&self) -> PubKeyFormat {
        self.format
    }

    /// The key bytes in their current format
    pub fn serialize(&self) -> &[u8] {
        &self.serialized
    }

    pub fn net_id(&self) -> u8 {
        self.net_id
    }

    /// Re-serialize the key in another format
    pub fn with_format(&self, format: PubKeyFormat) -> Result<Self> {
        if format == self.format {
            return Ok(self.clone());
        }

        let mut standard = self.serialized.clone();
        if self.format == PubKeyFormat::Hybrid {
            standard[0] = 0x04;
        }
        let key = secp256k1::PublicKey::from_slice(&standard)?;

        let serialized = match format {
            PubKeyFormat::Compressed => key.serialize().to_vec(),
            PubKeyFormat::Uncompressed => key.serialize_uncompressed().to_vec(),
            PubKeyFormat::Hybrid => {
                let mut bytes = key.serialize_uncompressed();
                bytes[0] = 0x06 | (bytes[UNCOMPRESSED_PUB_KEY_SIZE - 1] & 1);
                bytes.to_vec()
            }
        };

        Ok(Self {
            serialized,
            format,
            net_id: self.net_id,
        })
    }

    /// Hash160 of the serialized key
    pub fn hash160(&self) -> [u8; HASH160_SIZE] {
        hash160(&self.serialized)
    }

    /// The pay-to-pubkey-hash address of this key
    pub fn address_pub_key_hash(&self) -> Address {
        Address::PubKeyHash(HashAddress {
            hash: self.hash160(),
            net_id: self.net_id,
        })
    }

    /// P2PKH string of the key
    pub fn encode_address(&self) -> String {
        base58::check_encode(&self.hash160(), &[self.net_id])
    }
}

impl std::fmt::Display for AddressPubKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(&self.serialized))
    }
}

/// Every address form the codecs understand
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Address {
    /// Pay-to-pubkey-hash, Base58Check
    PubKeyHash(HashAddress),
    /// Pay-to-script-hash, Base58Check
    ScriptHash(HashAddress),
    /// Raw public key, hex
    PubKey(AddressPubKey),
    /// Witness v0 with a 20-byte program, bech32
    WitnessPubKeyHash(WitnessAddress),
    /// Witness v0 with a 32-byte program, bech32
    WitnessScriptHash(WitnessAddress),
    /// Witness v1 with a 32-byte program, bech32m
    Taproot(WitnessAddress),
}

impl Address {
    pub fn new_pub_key_hash(hash: &[u8], params: &NetworkParams) -> Result<Self> {
        Ok(Address::PubKeyHash(HashAddress::from_slice(
            hash,
            params.pub_key_hash_addr_id,
        )?))
    }

    /// P2SH address of a serialized script
    pub fn new_script_hash(script: &[u8], params: &NetworkParams) -> Self {
        Address::ScriptHash(HashAddress {
            hash: hash160(script),
            net_id: params.script_hash_addr_id,
        })
    }

    pub fn new_script_hash_from_hash(hash: &[u8], params: &NetworkParams) -> Result<Self> {
        Ok(Address::ScriptHash(HashAddress::from_slice(
            hash,
            params.script_hash_addr_id,
        )?))
    }

    /// Pay-to-pubkey address. The format follows the key's leading byte.
    pub fn new_pub_key(serialized: &[u8], params: &NetworkParams) -> Result<Self> {
        Ok(Address::PubKey(AddressPubKey::new(
            serialized,
            params.pub_key_hash_addr_id,
        )?))
    }

    pub fn new_witness_pub_key_hash(program: &[u8], params: &NetworkParams) -> Result<Self> {
        Self::from_witness_program(params.hrp(), 0, program)
            .and_then(|address| expect_kind(address, AddressKind::WitnessPubKeyHash))
    }

    pub fn new_witness_script_hash(program: &[u8], params: &NetworkParams) -> Result<Self> {
        Self::from_witness_program(params.hrp(), 0, program)
            .and_then(|address| expect_kind(address, AddressKind::WitnessScriptHash))
    }

    pub fn new_taproot(program: &[u8], params: &NetworkParams) -> Result<Self> {
        Self::from_witness_program(params.hrp(), 1, program)
    }

    /// Classify a witness program by version and length.
    ///
    /// Only versions 0 and 1 are recognized; v0 takes 20 or 32 bytes and v1
    /// exactly 32.
    pub(crate) fn from_witness_program(hrp: &str, version: u8, program: &[u8]) -> Result<Self> {
        let length = program.len();
        match (version, length) {
            (0, WITNESS_V0_PUB_KEY_HASH_SIZE) => Ok(Address::WitnessPubKeyHash(
                WitnessAddress::new(hrp, version, program)?,
            )),
            (0, WITNESS_V0_SCRIPT_HASH_SIZE) => Ok(Address::WitnessScriptHash(
                WitnessAddress::new(hrp, version, program)?,
            )),
            (1, TAPROOT_PROGRAM_SIZE) => {
                Ok(Address::Taproot(WitnessAddress::new(hrp, version, program)?))
            }
            (0, _) | (1, _) => {
                Err(AddressError::UnsupportedWitnessProgramLength { version, length })
            }
            _ => Err(AddressError::UnsupportedWitnessVersion(version)),
        }
    }

    pub fn kind(&self) -> AddressKind {
        match self {
            Address::PubKeyHash(_) => AddressKind::PubKeyHash,
            Address::ScriptHash(_) => AddressKind::ScriptHash,
            Address::PubKey(_) => AddressKind::PubKey,
            Address::WitnessPubKeyHash(_) => AddressKind::WitnessPubKeyHash,
            Address::WitnessScriptHash(_) => AddressKind::WitnessScriptHash,
            Address::Taproot(_) => AddressKind::Taproot,
        }
    }

    /// Canonical string form
    pub fn encode_address(&self) -> String {
        match self {
            Address::PubKeyHash(a) | Address::ScriptHash(a) => a.encode(),
            Address::PubKey(a) => a.encode_address(),
            Address::WitnessPubKeyHash(a)
            | Address::WitnessScriptHash(a)
            | Address::Taproot(a) => a.encoded.clone(),
        }
    }

    /// The bytes a locking script commits to: the hash for P2PKH and P2SH,
    /// the Hash160 of the key for P2PK, the witness program otherwise
    pub fn script_address(&self) -> Vec<u8> {
        match self {
            Address::PubKeyHash(a) | Address::ScriptHash(a) => a.hash.to_vec(),
            Address::PubKey(a) => a.hash160().to_vec(),
            Address::WitnessPubKeyHash(a)
            | Address::WitnessScriptHash(a)
            | Address::Taproot(a) => a.program.clone(),
        }
    }

    /// Whether the address belongs to `params`
    pub fn is_for_net(&self, params: &NetworkParams) -> bool {
        match self {
            Address::PubKeyHash(a) => a.net_id == params.pub_key_hash_addr_id,
            Address::ScriptHash(a) => a.net_id == params.script_hash_addr_id,
            Address::PubKey(a) => a.net_id == params.pub_key_hash_addr_id,
            Address::WitnessPubKeyHash(a)
            | Address::WitnessScriptHash(a)
            | Address::Taproot(a) => a.hrp == params.hrp(),
        }
    }

    /// The 20-byte hash carried by hash-based addresses
    pub fn hash160(&self) -> Option<[u8; HASH160_SIZE]> {
        match self {
            Address::PubKeyHash(a) | Address::ScriptHash(a) => Some(a.hash),
            Address::PubKey(a) => Some(a.hash160()),
            Address::WitnessPubKeyHash(a) => a.program.as_slice().try_into().ok(),
            Address::WitnessScriptHash(_) | Address::Taproot(_) => None,
        }
    }

    pub fn witness_version(&self) -> Option<u8> {
        self.witness().map(WitnessAddress::version)
    }

    pub fn witness_program(&self) -> Option<&[u8]> {
        self.witness().map(WitnessAddress::program)
    }

    pub fn hrp(&self) -> Option<&str> {
        self.witness().map(WitnessAddress::hrp)
    }

    /// Base58Check version byte for non-segwit addresses
    pub fn net_id(&self) -> Option<u8> {
        match self {
            Address::PubKeyHash(a) | Address::ScriptHash(a) => Some(a.net_id),
            Address::PubKey(a) => Some(a.net_id),
            _ => None,
        }
    }

    fn witness(&self) -> Option<&WitnessAddress> {
        match self {
            Address::WitnessPubKeyHash(a)
            | Address::WitnessScriptHash(a)
            | Address::Taproot(a) => Some(a),
            _ => None,
        }
    }
}

fn expect_kind(address: Address, kind: AddressKind) -> Result<Address> {
    if address.kind() == kind {
        return Ok(address);
    }
    match address.witness_program() {
        Some(program) => Err(AddressError::InvalidLength {
            expected: match kind {
                AddressKind::WitnessPubKeyHash => WITNESS_V0_PUB_KEY_HASH_SIZE,
                _ => WITNESS_V0_SCRIPT_HASH_SIZE,
            },
            actual: program.len(),
        }),
        None => Err(AddressError::MalformedInput(format!(
            "expected {} address, got {}",
            kind,
            address.kind()
        ))),
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::PubKey(a) => write!(f, "{}", a),
            other => write!(f, "{}", other.encode_address()),
        }
    }
}
