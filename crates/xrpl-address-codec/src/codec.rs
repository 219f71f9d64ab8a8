/// Base58Check strings with version prefixes.
///
/// Every human-readable identifier on the ledger (classic address, seed,
/// node or account public key) is `base58(version || payload || checksum)`
/// over the ledger alphabet. The version prefix both names the kind of
/// payload and fixes the string's leading character.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use xrpl_primitives::base58;

use crate::AddressCodecError;

/// Version byte of a classic account address (renders as a leading `r`).
pub const ACCOUNT_ID_VERSION: [u8; 1] = [0x00];
/// Version byte of an account public key (leading `a`).
pub const ACCOUNT_PUBLIC_KEY_VERSION: [u8; 1] = [0x23];
/// Version byte of a node (validator) public key (leading `n`).
pub const NODE_PUBLIC_VERSION: [u8; 1] = [0x1C];
/// Version byte of a secp256k1 family seed (leading `s`).
pub const FAMILY_SEED_VERSION: [u8; 1] = [0x21];
/// Version prefix of an Ed25519 seed (leading `sEd`).
pub const ED25519_SEED_VERSION: [u8; 3] = [0x01, 0xE1, 0x4B];

/// Length of an account id payload.
pub const ACCOUNT_ID_LEN: usize = 20;
/// Length of a seed's entropy payload.
pub const SEED_LEN: usize = 16;
/// Length of a compressed or prefixed public key payload.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Signing algorithm of a seed or key pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// ECDSA over secp256k1 with the ledger's root/account derivation.
    #[default]
    Secp256k1,
    /// Ed25519.
    Ed25519,
}

impl KeyType {
    /// Lowercase algorithm name as used in JSON and RPC parameters.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Secp256k1 => "secp256k1",
            KeyType::Ed25519 => "ed25519",
        }
    }

    fn seed_version(&self) -> &'static [u8] {
        match self {
            KeyType::Secp256k1 => &FAMILY_SEED_VERSION,
            KeyType::Ed25519 => &ED25519_SEED_VERSION,
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyType {
    type Err = AddressCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secp256k1" => Ok(KeyType::Secp256k1),
            "ed25519" => Ok(KeyType::Ed25519),
            other => Err(AddressCodecError::InvalidVersion(format!(
                "unknown key type '{}'",
                other
            ))),
        }
    }
}

/// Encode `version || payload` as a Base58Check string.
///
/// # Arguments
/// * `version` - The version prefix (1 or 3 bytes).
/// * `payload` - The payload bytes.
/// * `expected_len` - Required payload length.
///
/// # Returns
/// The encoded string, or `InvalidPayloadLength` if the payload has the wrong size.
pub fn encode_check(
    version: &[u8],
    payload: &[u8],
    expected_len: usize,
) -> Result<String, AddressCodecError> {
    if payload.len() != expected_len {
        return Err(AddressCodecError::InvalidPayloadLength {
            expected: expected_len,
            got: payload.len(),
        });
    }
    let mut data = Vec::with_capacity(version.len() + payload.len());
    data.extend_from_slice(version);
    data.extend_from_slice(payload);
    Ok(base58::check_encode(&data))
}

/// Decode a Base58Check string that must carry one of `versions`.
///
/// The checksum is verified before anything else, so a corrupted string
/// always reports `ChecksumMismatch`.
///
/// # Returns
/// `(version, payload)` for the first accepted version whose prefix and
/// total length match, `InvalidPayloadLength` when a version prefix matches
/// but the payload size does not, or `InvalidVersion` otherwise.
pub fn decode_check<'v>(
    s: &str,
    versions: &[&'v [u8]],
    expected_len: usize,
) -> Result<(&'v [u8], Vec<u8>), AddressCodecError> {
    let data = base58::check_decode(s)?;

    for version in versions {
        if data.starts_with(version) && data.len() == version.len() + expected_len {
            return Ok((*version, data[version.len()..].to_vec()));
        }
    }

    match versions.iter().find(|v| data.starts_with(v)) {
        Some(version) => Err(AddressCodecError::InvalidPayloadLength {
            expected: expected_len,
            got: data.len() - version.len(),
        }),
        None => Err(AddressCodecError::InvalidVersion(
            data.first()
                .map(|b| format!("0x{:02x}", b))
                .unwrap_or_else(|| "empty".to_string()),
        )),
    }
}

/// Encode 16 bytes of seed entropy for the given algorithm.
pub fn encode_seed(entropy: &[u8], key_type: KeyType) -> Result<String, AddressCodecError> {
    encode_check(key_type.seed_version(), entropy, SEED_LEN)
}

/// Decode a seed string into its entropy and algorithm.
///
/// The algorithm is read from the version prefix: `s...` strings are
/// secp256k1, `sEd...` strings are Ed25519.
pub fn decode_seed(seed: &str) -> Result<([u8; SEED_LEN], KeyType), AddressCodecError> {
    let (version, payload) = decode_check(
        seed,
        &[&ED25519_SEED_VERSION[..], &FAMILY_SEED_VERSION[..]],
        SEED_LEN,
    )?;
    let key_type = if version == &ED25519_SEED_VERSION[..] {
        KeyType::Ed25519
    } else {
        KeyType::Secp256k1
    };
    let mut entropy = [0u8; SEED_LEN];
    entropy.copy_from_slice(&payload);
    Ok((entropy, key_type))
}

/// Encode a 20-byte account id as a classic address.
pub fn encode_account_id(account_id: &[u8]) -> Result<String, AddressCodecError> {
    encode_check(&ACCOUNT_ID_VERSION, account_id, ACCOUNT_ID_LEN)
}

/// Decode a classic address into its 20-byte account id.
pub fn decode_account_id(address: &str) -> Result<[u8; ACCOUNT_ID_LEN], AddressCodecError> {
    let (_, payload) = decode_check(address, &[&ACCOUNT_ID_VERSION[..]], ACCOUNT_ID_LEN)?;
    let mut out = [0u8; ACCOUNT_ID_LEN];
    out.copy_from_slice(&payload);
    Ok(out)
}

/// Encode a 33-byte node (validator) public key.
pub fn encode_node_public(public_key: &[u8]) -> Result<String, AddressCodecError> {
    encode_check(&NODE_PUBLIC_VERSION, public_key, PUBLIC_KEY_LEN)
}

/// Decode a node (validator) public key string into its 33 bytes.
pub fn decode_node_public(s: &str) -> Result<Vec<u8>, AddressCodecError> {
    decode_check(s, &[&NODE_PUBLIC_VERSION[..]], PUBLIC_KEY_LEN).map(|(_, payload)| payload)
}

/// Encode a 33-byte account public key.
pub fn encode_account_public(public_key: &[u8]) -> Result<String, AddressCodecError> {
    encode_check(&ACCOUNT_PUBLIC_KEY_VERSION, public_key, PUBLIC_KEY_LEN)
}

/// Decode an account public key string into its 33 bytes.
pub fn decode_account_public(s: &str) -> Result<Vec<u8>, AddressCodecError> {
    decode_check(s, &[&ACCOUNT_PUBLIC_KEY_VERSION[..]], PUBLIC_KEY_LEN).map(|(_, payload)| payload)
}

/// Whether `address` is a well-formed classic address.
pub fn is_valid_classic_address(address: &str) -> bool {
    decode_account_id(address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entropy_1_to_16() -> Vec<u8> {
        (1u8..=16).collect()
    }

    #[test]
    fn test_encode_decode_classic_address() {
        let account_id = hex::decode("BA8E78626EE42C41B46D46C3048DF3A1C3C87072").unwrap();
        let address = encode_account_id(&account_id).unwrap();
        assert_eq!(address, "rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErN");
        assert_eq!(decode_account_id(&address).unwrap().to_vec(), account_id);
    }

    #[test]
    fn test_special_addresses() {
        assert_eq!(
            encode_account_id(&[0u8; 20]).unwrap(),
            "rrrrrrrrrrrrrrrrrrrrrhoLvTp"
        );
        let mut one = [0u8; 20];
        one[19] = 1;
        assert_eq!(encode_account_id(&one).unwrap(), "rrrrrrrrrrrrrrrrrrrrBZbvji");
    }

    #[test]
    fn test_seed_round_trip_both_algorithms() {
        let entropy = entropy_1_to_16();
        let secp = encode_seed(&entropy, KeyType::Secp256k1).unwrap();
        assert_eq!(secp, "sp5fghtJtpUorTwvof1NpDXAzNwf5");
        let ed = encode_seed(&entropy, KeyType::Ed25519).unwrap();
        assert_eq!(ed, "sEdSKaCy2JT7JaM7v95H9SxkhP9wS2r");

        let (secp_entropy, secp_type) = decode_seed(&secp).unwrap();
        assert_eq!(secp_entropy.to_vec(), entropy);
        assert_eq!(secp_type, KeyType::Secp256k1);
        let (ed_entropy, ed_type) = decode_seed(&ed).unwrap();
        assert_eq!(ed_entropy.to_vec(), entropy);
        assert_eq!(ed_type, KeyType::Ed25519);
    }

    #[test]
    fn test_seed_edge_entropy() {
        assert_eq!(
            encode_seed(&[0u8; 16], KeyType::Secp256k1).unwrap(),
            "sp6JS7f14BuwFY8Mw6bTtLKWauoUs"
        );
        assert_eq!(
            encode_seed(&[0u8; 16], KeyType::Ed25519).unwrap(),
            "sEdSJHS4oiAdz7w2X2ni1gFiqtbJHqE"
        );
        assert_eq!(
            encode_seed(&[0xff; 16], KeyType::Secp256k1).unwrap(),
            "saGwBRReqUNKuWNLpUAq8i8NkXEPN"
        );
        assert_eq!(
            encode_seed(&[0xff; 16], KeyType::Ed25519).unwrap(),
            "sEdV19BLfeQeKdEXyYA4NhjPJe6XBfG"
        );
    }

    #[test]
    fn test_encode_rejects_wrong_payload_length() {
        assert_eq!(
            encode_seed(&[0u8; 15], KeyType::Ed25519),
            Err(AddressCodecError::InvalidPayloadLength { expected: 16, got: 15 })
        );
        assert_eq!(
            encode_account_id(&[0u8; 21]),
            Err(AddressCodecError::InvalidPayloadLength { expected: 20, got: 21 })
        );
    }

    #[test]
    fn test_decode_wrong_length_is_distinct() {
        // Version 0x00 followed by 21 and 19 zero bytes.
        assert_eq!(
            decode_account_id("rrrrrrrrrrrrrrrrrrrrrra5oA2D"),
            Err(AddressCodecError::InvalidPayloadLength { expected: 20, got: 21 })
        );
        assert_eq!(
            decode_account_id("rrrrrrrrrrrrrrrrrrrrfKh8zc"),
            Err(AddressCodecError::InvalidPayloadLength { expected: 20, got: 19 })
        );
    }

    #[test]
    fn test_decode_wrong_version_is_distinct() {
        // Version 0x01 followed by 20 zero bytes.
        assert_eq!(
            decode_account_id("QLbzfJH5BT1FS9apRLKV3G8dWEAjwnKaa"),
            Err(AddressCodecError::InvalidVersion("0x01".to_string()))
        );
        // A seed is not an address, and an address is not a seed.
        assert!(matches!(
            decode_account_id("sp5fghtJtpUorTwvof1NpDXAzNwf5"),
            Err(AddressCodecError::InvalidVersion(_))
        ));
        assert!(matches!(
            decode_seed("rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErN"),
            Err(AddressCodecError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_decode_bad_character() {
        assert!(matches!(
            decode_account_id("rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35Er0"),
            Err(AddressCodecError::InvalidBase58(_))
        ));
    }

    /// Replacing any character with its successor in the alphabet breaks the checksum.
    #[test]
    fn test_single_character_flip_fails_checksum() {
        let alphabet: Vec<char> = base58::ALPHABET.chars().collect();
        for encoded in [
            "rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErN",
            "sp5fghtJtpUorTwvof1NpDXAzNwf5",
            "sEdSKaCy2JT7JaM7v95H9SxkhP9wS2r",
        ] {
            let chars: Vec<char> = encoded.chars().collect();
            for i in 0..chars.len() {
                let pos = alphabet.iter().position(|&c| c == chars[i]).unwrap();
                let mut flipped = chars.clone();
                flipped[i] = alphabet[(pos + 1) % alphabet.len()];
                let flipped: String = flipped.into_iter().collect();
                let result = decode_check(
                    &flipped,
                    &[&ACCOUNT_ID_VERSION[..], &FAMILY_SEED_VERSION[..], &ED25519_SEED_VERSION[..]],
                    20,
                );
                assert_eq!(
                    result.map(|_| ()),
                    Err(AddressCodecError::ChecksumMismatch),
                    "{} flipped at {}",
                    encoded,
                    i
                );
            }
        }
    }

    #[test]
    fn test_node_and_account_public() {
        let node = hex::decode("03B462771E99AAE9C7912AF47D6120C0B0DA972A4043A17F26320A52056DA46EA8").unwrap();
        let encoded = encode_node_public(&node).unwrap();
        assert_eq!(encoded, "n9MigjRnnVeGMbYJxW3k4cJa2jom6hnCesPJuToFwzYwczpUfbrK");
        assert_eq!(decode_node_public(&encoded).unwrap(), node);

        let account = hex::decode("030D58EB48B4420B1F7B9DF55087E0E29FEF0E8468F9A6825B01CA2C361042D435").unwrap();
        let encoded = encode_account_public(&account).unwrap();
        assert_eq!(encoded, "aBQr3fFdhGfVSKwi2aWv2t3weHkskVji41sR4NFPk22Ugd2TVk5A");
        assert_eq!(decode_account_public(&encoded).unwrap(), account);

        let ed = hex::decode("ED01FA53FA5A7E77798F882ECE20B1ABC00BB358A9E55A202D0D0676BD0CE37A63").unwrap();
        assert_eq!(
            encode_account_public(&ed).unwrap(),
            "aKN8JyojqMHPKA9V1hNhCG6Lcjprvhnq6R8jyC6PoMWQmYVGfi5B"
        );

        assert!(matches!(
            decode_account_public("n9MigjRnnVeGMbYJxW3k4cJa2jom6hnCesPJuToFwzYwczpUfbrK"),
            Err(AddressCodecError::InvalidVersion(_))
        ));
    }

    #[test]
    fn test_key_type_names() {
        assert_eq!(KeyType::default(), KeyType::Secp256k1);
        assert_eq!("ed25519".parse::<KeyType>().unwrap(), KeyType::Ed25519);
        assert_eq!(KeyType::Secp256k1.to_string(), "secp256k1");
        assert!("rsa".parse::<KeyType>().is_err());
        assert_eq!(serde_json::to_string(&KeyType::Ed25519).unwrap(), "\"ed25519\"");
    }

    #[test]
    fn test_is_valid_classic_address() {
        assert!(is_valid_classic_address("rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErN"));
        assert!(!is_valid_classic_address("rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErM"));
        assert!(!is_valid_classic_address(""));
    }
}
