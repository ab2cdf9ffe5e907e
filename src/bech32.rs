//! Bech32 (BIP-173) and Bech32m (BIP-350) encoding
//!
//! Strings are `hrp || '1' || data || checksum`. Checksum computation and the
//! data alphabet come from the `bech32` crate; this module adds the length,
//! case and segwit rules addresses are held to and maps failures onto
//! [`AddressError`]. Output is always lower case.

use ::bech32::primitives::decode::CheckedHrpstring;
use ::bech32::primitives::gf32::Fe32;
use ::bech32::primitives::hrp::Hrp;
use ::bech32::primitives::iter::Fe32IterExt;
use ::bech32::primitives::{Bech32, Bech32m};

use crate::error::{AddressError, Result};
use crate::network::validate_hrp;

/// Separator between the human-readable part and the data
pub const SEPARATOR: char = '1';

/// Longest allowed string, separator and checksum included
pub const MAX_LENGTH: usize = 90;

/// Number of checksum symbols
pub const CHECKSUM_LENGTH: usize = 6;

/// Highest witness version a segwit program may carry
pub const MAX_WITNESS_VERSION: u8 = 16;

const MIN_WITNESS_PROGRAM_LEN: usize = 2;
const MAX_WITNESS_PROGRAM_LEN: usize = 40;

/// Checksum flavour, selected by witness version for segwit data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// BIP-173, witness version 0
    Bech32,
    /// BIP-350, witness versions 1 through 16
    Bech32m,
}

impl Variant {
    /// Constant the checksum residue is XORed with
    pub const fn constant(self) -> u32 {
        match self {
            Variant::Bech32 => 1,
            Variant::Bech32m => 0x2bc8_30a3,
        }
    }

    /// The only variant a given witness version may be encoded with
    pub fn for_witness_version(version: u8) -> Self {
        if version == 0 {
            Variant::Bech32
        } else {
            Variant::Bech32m
        }
    }

    /// The variant whose checksum `s` verifies under, if any
    fn detect(s: &str) -> Option<Self> {
        if CheckedHrpstring::new::<Bech32>(s).is_ok() {
            Some(Variant::Bech32)
        } else if CheckedHrpstring::new::<Bech32m>(s).is_ok() {
            Some(Variant::Bech32m)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Bech32 => write!(f, "bech32"),
            Variant::Bech32m => write!(f, "bech32m"),
        }
    }
}

fn parse_hrp(hrp: &str) -> Result<Hrp> {
    validate_hrp(hrp)?;
    Hrp::parse(hrp).map_err(|e| AddressError::InvalidHrp(format!("{}: {}", hrp, e)))
}

/// Encode 5-bit `data` under `hrp` with the checksum of `variant`
pub fn encode(hrp: &str, data: &[u8], variant: Variant) -> Result<String> {
    let parsed = parse_hrp(hrp)?;

    let length = hrp.len() + 1 + data.len() + CHECKSUM_LENGTH;
    if length > MAX_LENGTH {
        return Err(AddressError::MalformedInput(format!(
            "encoded length {} exceeds {}",
            length, MAX_LENGTH
        )));
    }

    let fes = data
        .iter()
        .map(|&d| {
            Fe32::try_from(d).map_err(|_| {
                AddressError::MalformedInput(format!("data value {} does not fit in 5 bits", d))
            })
        })
        .collect::<Result<Vec<Fe32>>>()?;

    let encoded: String = match variant {
        Variant::Bech32 => fes.into_iter().with_checksum::<Bech32>(&parsed).chars().collect(),
        Variant::Bech32m => fes.into_iter().with_checksum::<Bech32m>(&parsed).chars().collect(),
    };

    Ok(encoded)
}

/// Decode a bech32 or bech32m string into `(hrp, data, variant)`.
///
/// The returned HRP is lower case and `data` excludes the checksum. The
/// variant is whichever constant the checksum verifies against.
pub fn decode(s: &str) -> Result<(String, Vec<u8>, Variant)> {
    if s.len() > MAX_LENGTH {
        return Err(AddressError::MalformedInput(format!(
            "length {} exceeds {}",
            s.len(),
            MAX_LENGTH
        )));
    }

    if let Some((position, character)) = s
        .chars()
        .enumerate()
        .find(|(_, c)| !matches!(*c as u32, 33..=126))
    {
        return Err(AddressError::InvalidCharacter { character, position });
    }

    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = s.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(AddressError::MixedCase);
    }
    let s = s.to_ascii_lowercase();

    let sep_pos = s
        .rfind(SEPARATOR)
        .ok_or_else(|| AddressError::MalformedInput("missing separator".to_string()))?;
    if sep_pos == 0 {
        return Err(AddressError::InvalidHrp("empty".to_string()));
    }
    if sep_pos + 1 + CHECKSUM_LENGTH > s.len() {
        return Err(AddressError::MalformedInput(format!(
            "data part shorter than the {} checksum characters",
            CHECKSUM_LENGTH
        )));
    }

    let mut data = Vec::with_capacity(s.len() - sep_pos - 1);
    for (offset, character) in s[sep_pos + 1..].chars().enumerate() {
        let fe = Fe32::from_char(character).map_err(|_| AddressError::InvalidCharacter {
            character,
            position: sep_pos + 1 + offset,
        })?;
        data.push(fe.to_u8());
    }

    let variant = Variant::detect(&s).ok_or(AddressError::ChecksumMismatch)?;

    data.truncate(data.len() - CHECKSUM_LENGTH);
    Ok((s[..sep_pos].to_string(), data, variant))
}

/// Regroup `data` from `from`-bit to `to`-bit values.
///
/// Both widths must be in `1..=8`. With `pad` the final group is
/// zero-filled; without it the leftover bits must be fewer than `from` and
/// all zero.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>> {
    if !(1..=8).contains(&from) || !(1..=8).contains(&to) {
        return Err(AddressError::MalformedInput(format!(
            "cannot regroup {}-bit values into {}-bit values",
            from, to
        )));
    }

    let mut result = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    let max_value = (1u32 << to) - 1;
    let max_acc = (1u32 << (from + to - 1)) - 1;
    let mut acc = 0u32;
    let mut bits = 0u32;

    for &value in data {
        let value = u32::from(value);
        if value >> from != 0 {
            return Err(AddressError::MalformedInput(format!(
                "value {} does not fit in {} bits",
                value, from
            )));
        }
        acc = ((acc << from) | value) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            result.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            result.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from {
        return Err(AddressError::ExcessPadding { bits });
    } else if (acc << (to - bits)) & max_value != 0 {
        return Err(AddressError::NonZeroPadding);
    }

    Ok(result)
}

/// Encode 8-bit data, regrouping it to 5-bit symbols first
pub fn encode_from_base256(hrp: &str, data: &[u8], variant: Variant) -> Result<String> {
    let data5 = convert_bits(data, 8, 5, true)?;
    encode(hrp, &data5, variant)
}

/// Decode a string whose data part carries 8-bit bytes
pub fn decode_to_base256(s: &str) -> Result<(String, Vec<u8>, Variant)> {
    let (hrp, data5, variant) = decode(s)?;
    let data = convert_bits(&data5, 5, 8, false)?;
    Ok((hrp, data, variant))
}

fn validate_witness_program(version: u8, program: &[u8]) -> Result<()> {
    if version > MAX_WITNESS_VERSION {
        return Err(AddressError::UnsupportedWitnessVersion(version));
    }
    let length = program.len();
    if !(MIN_WITNESS_PROGRAM_LEN..=MAX_WITNESS_PROGRAM_LEN).contains(&length)
        || (version == 0 && length != 20 && length != 32)
    {
        return Err(AddressError::UnsupportedWitnessProgramLength { version, length });
    }
    Ok(())
}

/// Encode a segwit witness program under `hrp`
pub fn encode_segwit(hrp: &str, version: u8, program: &[u8]) -> Result<String> {
    validate_witness_program(version, program)?;
    let parsed = parse_hrp(hrp)?;
    let witness_version =
        Fe32::try_from(version).map_err(|_| AddressError::UnsupportedWitnessVersion(version))?;

    let encoded = ::bech32::segwit::encode(parsed, witness_version, program)
        .map_err(|e| AddressError::MalformedInput(e.to_string()))?;

    // the output must survive our own decoder
    let (_, decoded_version, decoded_program) = decode_segwit(&encoded)?;
    if decoded_version != version || decoded_program != program {
        return Err(AddressError::MalformedInput(
            "segwit encoding did not round-trip".to_string(),
        ));
    }

    Ok(encoded)
}

/// Decode a segwit address into `(hrp, witness version, witness program)`.
///
/// Version 0 must use the bech32 constant and versions 1-16 bech32m; the
/// wrong constant is a checksum failure.
pub fn decode_segwit(s: &str) -> Result<(String, u8, Vec<u8>)> {
    let (hrp, data, variant) = decode(s)?;

    let (&version, program5) = data
        .split_first()
        .ok_or_else(|| AddressError::MalformedInput("empty data section".to_string()))?;
    if version > MAX_WITNESS_VERSION {
        return Err(AddressError::UnsupportedWitnessVersion(version));
    }
    if variant != Variant::for_witness_version(version) {
        return Err(AddressError::ChecksumMismatch);
    }

    let program = convert_bits(program5, 5, 8, false)?;
    validate_witness_program(version, &program)?;

    Ok((hrp, version, program))
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2WPKH_PROGRAM: &str = "751e76e8199196d454941c45d1b3a323f1433bd6";

    #[test]
    fn test_bech32_encode() {
        let hash160 = hex::decode(P2WPKH_PROGRAM).unwrap();
        let addr = encode_segwit("bc", 0, &hash160).unwrap();
        assert_eq!(addr, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    }

    #[test]
    fn test_bech32_encode_testnet() {
        let hash160 = hex::decode(P2WPKH_PROGRAM).unwrap();
        let addr = encode_segwit("tb", 0, &hash160).unwrap();
        assert_eq!(addr, "tb1qw508d6qejxtdg4y5r3zarvary0c5xw7kxpjzsx");
    }

    #[test]
    fn test_decode_upper_case() {
        let (hrp, version, program) =
            decode_segwit("BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4").unwrap();
        assert_eq!(hrp, "bc");
        assert_eq!(version, 0);
        assert_eq!(hex::encode(program), P2WPKH_PROGRAM);
    }

    #[test]
    fn test_taproot_roundtrip() {
        let addr = "bc1paardr2nczq0rx5rqpfwnvpzm497zvux64y0f7wjgcs7xuuuh2nnqwr2d5c";
        let (hrp, version, program) = decode_segwit(addr).unwrap();
        assert_eq!(version, 1);
        assert_eq!(
            hex::encode(&program),
            "ef46d1aa78101e3350600a5d36045ba97c2670daa91e9f3a48c43c6e739754e6"
        );
        assert_eq!(encode_segwit(&hrp, version, &program).unwrap(), addr);
    }

    #[test]
    fn test_taproot_with_bech32_constant_fails() {
        let addr = "bc1paardr2nczq0rx5rqpfwnvpzm497zvux64y0f7wjgcs7xuuuh2nnqwr2d5c";
        let (hrp, version, program) = decode_segwit(addr).unwrap();

        let mut data = vec![version];
        data.extend(convert_bits(&program, 8, 5, true).unwrap());
        let wrong = encode(&hrp, &data, Variant::Bech32).unwrap();

        assert_ne!(wrong, addr);
        assert!(matches!(decode_segwit(&wrong), Err(AddressError::ChecksumMismatch)));
    }

    #[test]
    fn test_v0_with_bech32m_constant_fails() {
        assert!(matches!(
            decode_segwit("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kemeawh"),
            Err(AddressError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_generic_decode_reports_variant() {
        let (_, _, variant) = decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kemeawh").unwrap();
        assert_eq!(variant, Variant::Bech32m);
        let (_, _, variant) = decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4").unwrap();
        assert_eq!(variant, Variant::Bech32);
    }

    #[test]
    fn test_mixed_case_rejected() {
        assert!(matches!(
            decode("tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sL5k7"),
            Err(AddressError::MixedCase)
        ));
    }

    #[test]
    fn test_invalid_checksum_character() {
        assert!(matches!(
            decode("bc1p38j9r5y49hruaue7wxjce0updqjuyyx0kh56v8s25huc6995vvpql3jow4"),
            Err(AddressError::InvalidCharacter { character: 'o', .. })
        ));
    }

    #[test]
    fn test_checksum_mismatch() {
        assert!(matches!(
            decode("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5"),
            Err(AddressError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_padding_errors() {
        assert!(matches!(
            decode_segwit("tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3pjxtptv"),
            Err(AddressError::NonZeroPadding)
        ));
        assert!(matches!(
            decode_segwit("bc1p0xlxvlhemja6c4dqv22uapctqupfhlxm9h8z3k2e72q4k9hcz7v07qwwzcrf"),
            Err(AddressError::ExcessPadding { bits: 6 })
        ));
    }

    #[test]
    fn test_program_length_rules() {
        assert!(matches!(
            decode_segwit("BC1QR508D6QEJXTDG4Y5R3ZARVARYV98GJ9P"),
            Err(AddressError::UnsupportedWitnessProgramLength { version: 0, length: 16 })
        ));
        assert!(matches!(
            decode_segwit("bc1pw5dgrnzv"),
            Err(AddressError::UnsupportedWitnessProgramLength { version: 1, length: 1 })
        ));
        assert!(encode_segwit("bc", 0, &[0u8; 21]).is_err());
        assert!(encode_segwit("bc", 1, &[0u8; 41]).is_err());
    }

    #[test]
    fn test_witness_version_above_16() {
        assert!(matches!(
            decode_segwit("BC130XLXVLHEMJA6C4DQV22UAPCTQUPFHLXM9H8Z3K2E72Q4K9HCZ7VQ7ZWS8R"),
            Err(AddressError::UnsupportedWitnessVersion(17))
        ));
    }

    #[test]
    fn test_empty_data_section() {
        assert!(matches!(decode_segwit("bc1gmk9yu"), Err(AddressError::MalformedInput(_))));
    }

    #[test]
    fn test_length_limit() {
        let too_long = format!("bc1{}", "q".repeat(88));
        assert!(matches!(decode(&too_long), Err(AddressError::MalformedInput(_))));
        assert!(encode("bc", &[0u8; 82], Variant::Bech32).is_err());
        assert!(encode("bc", &[0u8; 81], Variant::Bech32).is_ok());
    }

    #[test]
    fn test_encode_rejects_bad_hrp() {
        assert!(matches!(encode("BC", &[0], Variant::Bech32), Err(AddressError::InvalidHrp(_))));
        assert!(matches!(encode("", &[0], Variant::Bech32), Err(AddressError::InvalidHrp(_))));
    }

    #[test]
    fn test_base256_roundtrip() {
        let payload = b"arbitrary bytes";
        let encoded = encode_from_base256("dash", payload, Variant::Bech32m).unwrap();
        let (hrp, data, variant) = decode_to_base256(&encoded).unwrap();
        assert_eq!(hrp, "dash");
        assert_eq!(data, payload);
        assert_eq!(variant, Variant::Bech32m);
    }

    #[test]
    fn test_convert_bits() {
        let data8 = vec![0x75, 0x1e, 0x76, 0xe8];
        let data5 = convert_bits(&data8, 8, 5, true).unwrap();
        assert_eq!(data5.len(), 7);
        let data8_back = convert_bits(&data5, 5, 8, false).unwrap();
        assert_eq!(data8, data8_back);
    }

    #[test]
    fn test_convert_bits_rejects_bad_widths() {
        for (from, to) in [(8, 32), (8, 0), (0, 5), (9, 5)] {
            assert!(
                matches!(convert_bits(&[1, 2], from, to, true), Err(AddressError::MalformedInput(_))),
                "{} -> {} accepted",
                from,
                to
            );
        }
    }

    #[test]
    fn test_single_character_substitution_detected() {
        let addr = "bc1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3qccfmv3";
        let sep = addr.rfind('1').unwrap();
        for (i, original) in addr.char_indices().skip(sep + 1) {
            let replacement = if original == 'q' { 'p' } else { 'q' };
            let mut mutated = addr.to_string();
            mutated.replace_range(i..i + 1, &replacement.to_string());
            assert!(decode_segwit(&mutated).is_err(), "mutation at {} accepted", i);
        }
    }
}
