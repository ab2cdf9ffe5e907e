use thiserror::Error;

/// Result type for address and key codec operations
pub type Result<T> = std::result::Result<T, AddressError>;

/// Text encoding family an address string was tried against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    Base58Check,
    Bech32,
    PubKeyHex,
}

impl std::fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFormat::Base58Check => write!(f, "base58check"),
            AddressFormat::Bech32 => write!(f, "bech32"),
            AddressFormat::PubKeyHex => write!(f, "public key hex"),
        }
    }
}

/// Why the decoder passed over one encoding family
#[derive(Debug, Clone)]
pub struct AddressParsingAttempt {
    pub format: AddressFormat,
    pub reason: String,
}

impl std::fmt::Display for AddressParsingAttempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {} format: {}", self.format, self.reason)
    }
}

/// Error types for address, key and network handling
#[derive(Error, Debug)]
pub enum AddressError {
    /// Base58Check double-SHA256 or bech32 polynomial checksum did not match,
    /// including a witness version encoded with the wrong bech32 constant
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// Decoded bytes have the wrong shape for any known address
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Decoded WIF payload has the wrong length or compression suffix
    #[error("malformed private key: {0}")]
    MalformedPrivateKey(String),

    /// Raw hash, key or program material has the wrong length
    #[error("invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Witness version outside the set this decoder understands
    #[error("unsupported witness version: {0}")]
    UnsupportedWitnessVersion(u8),

    /// Witness program length not allowed for its version
    #[error("unsupported witness program length {length} for version {version}")]
    UnsupportedWitnessProgramLength { version: u8, length: usize },

    /// Leftover bits after regrouping 5-bit symbols are not all zero
    #[error("non-zero padding in bech32 data")]
    NonZeroPadding,

    /// More padding bits than a single 5-bit group can produce
    #[error("invalid padding of {bits} bits in bech32 data")]
    ExcessPadding { bits: u32 },

    /// Bech32 string contains both upper and lower case characters
    #[error("bech32 string mixes upper and lower case")]
    MixedCase,

    /// Character outside the bech32 alphabet
    #[error("invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Human-readable part is empty, too long or not printable ASCII
    #[error("invalid human-readable part: {0}")]
    InvalidHrp(String),

    /// Version byte is both the pubkey-hash and script-hash ID of a network
    #[error("version byte 0x{version:02x} is both a pubkey-hash and script-hash id")]
    AddressCollision { version: u8 },

    /// No encoding family recognized the input
    #[error("unknown address format for '{input}'\n\nattempted formats:\n{attempts}")]
    UnknownAddressFormat { input: String, attempts: String },

    /// Network name not present in the registry
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    /// Registration clashes with an already registered network
    #[error("duplicate network: {0}")]
    DuplicateNetwork(String),

    /// Serialized public key has an unknown format byte or cannot be converted
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Custom network configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(String),

    /// Base58 alphabet decoding error
    #[error("base58 decode error: {0}")]
    Base58Error(#[from] bs58::decode::Error),

    /// Hex decoding error
    #[error("hex decode error: {0}")]
    HexError(#[from] hex::FromHexError),

    /// Elliptic curve collaborator rejected key material
    #[error("secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),

    /// JSON configuration parsing error
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Configuration file could not be read
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AddressError {
    /// Build an unknown-format error, truncating long input like the CLI does
    pub(crate) fn unknown_format(input: &str, attempts: &[AddressParsingAttempt]) -> Self {
        let input = if input.chars().count() > 50 {
            format!("{}...", input.chars().take(50).collect::<String>())
        } else {
            input.to_string()
        };

        let attempts = if attempts.is_empty() {
            "  none".to_string()
        } else {
            attempts
                .iter()
                .map(|attempt| attempt.to_string())
                .collect::<Vec<_>>()
                .join("\n")
        };

        AddressError::UnknownAddressFormat { input, attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_truncates_input() {
        let long = "x".repeat(80);
        match AddressError::unknown_format(&long, &[]) {
            AddressError::UnknownAddressFormat { input, attempts } => {
                assert_eq!(input.len(), 53);
                assert!(input.ends_with("..."));
                assert_eq!(attempts, "  none");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_format_lists_attempts() {
        let attempts = vec![
            AddressParsingAttempt {
                format: AddressFormat::Base58Check,
                reason: "invalid character".to_string(),
            },
            AddressParsingAttempt {
                format: AddressFormat::Bech32,
                reason: "no registered prefix".to_string(),
            },
        ];
        let err = AddressError::unknown_format("zz", &attempts);
        let message = err.to_string();
        assert!(message.contains("base58check format: invalid character"));
        assert!(message.contains("bech32 format: no registered prefix"));
    }
}
