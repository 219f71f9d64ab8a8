//! Seeds: 16 bytes of entropy tagged with the signing algorithm.

use std::fmt;
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

use xrpl_address_codec::codec::SEED_LEN;
use xrpl_address_codec::{decode_seed, encode_seed, KeyType};

use crate::KeypairError;

/// A family seed.
///
/// The entropy is wiped on drop and never shown by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Seed {
    entropy: [u8; SEED_LEN],
    key_type: KeyType,
}

impl Seed {
    /// Build a seed from caller-supplied entropy.
    ///
    /// # Returns
    /// `InvalidEntropy` unless exactly 16 bytes are given.
    pub fn from_entropy(entropy: &[u8], key_type: KeyType) -> Result<Self, KeypairError> {
        let arr: [u8; SEED_LEN] = entropy.try_into().map_err(|_| KeypairError::InvalidEntropy {
            expected: SEED_LEN,
            got: entropy.len(),
        })?;
        Ok(Seed {
            entropy: arr,
            key_type,
        })
    }

    /// Generate a seed from the OS random number generator.
    pub fn generate(key_type: KeyType) -> Self {
        let mut entropy = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut entropy);
        Seed { entropy, key_type }
    }

    /// Decode an `s...` / `sEd...` seed string.
    pub fn decode(seed: &str) -> Result<Self, KeypairError> {
        let (entropy, key_type) = decode_seed(seed)?;
        Ok(Seed { entropy, key_type })
    }

    /// Encode to the seed string.
    pub fn encode(&self) -> Result<String, KeypairError> {
        Ok(encode_seed(&self.entropy, self.key_type)?)
    }

    /// The raw entropy.
    pub fn entropy(&self) -> &[u8; SEED_LEN] {
        &self.entropy
    }

    /// The signing algorithm this seed derives keys for.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.entropy.zeroize();
    }
}

impl FromStr for Seed {
    type Err = KeypairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Seed::decode(s)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("key_type", &self.key_type)
            .finish_non_exhaustive()
    }
}

/// Generate a seed string.
///
/// Uses `entropy` when given (it must be 16 bytes), otherwise the OS RNG.
pub fn generate_seed(entropy: Option<&[u8]>, key_type: KeyType) -> Result<String, KeypairError> {
    let seed = match entropy {
        Some(bytes) => Seed::from_entropy(bytes, key_type)?,
        None => Seed::generate(key_type),
    };
    seed.encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_seed_from_entropy() {
        let entropy: Vec<u8> = (1u8..=16).collect();
        assert_eq!(
            generate_seed(Some(&entropy), KeyType::Secp256k1).unwrap(),
            "sp5fghtJtpUorTwvof1NpDXAzNwf5"
        );
        assert_eq!(
            generate_seed(Some(&entropy), KeyType::Ed25519).unwrap(),
            "sEdSKaCy2JT7JaM7v95H9SxkhP9wS2r"
        );
        assert_eq!(
            generate_seed(Some(&entropy[..15]), KeyType::Ed25519),
            Err(KeypairError::InvalidEntropy { expected: 16, got: 15 })
        );
    }

    #[test]
    fn test_generate_random_seed() {
        let a = generate_seed(None, KeyType::Ed25519).unwrap();
        let b = generate_seed(None, KeyType::Ed25519).unwrap();
        assert!(a.starts_with("sEd"));
        assert_ne!(a, b);
        assert_eq!(Seed::decode(&a).unwrap().key_type(), KeyType::Ed25519);
    }

    #[test]
    fn test_seed_parse_and_debug() {
        let seed: Seed = "sEdSMVV4dJ1JbdBxmakRR4Puu3XVZz2".parse().unwrap();
        assert_eq!(seed.key_type(), KeyType::Ed25519);
        assert_eq!(
            hex::encode_upper(seed.entropy()),
            "03F84812E0C0936D5A8633156F9A144A"
        );
        assert_eq!(seed.encode().unwrap(), "sEdSMVV4dJ1JbdBxmakRR4Puu3XVZz2");

        let rendered = format!("{:?}", seed);
        assert!(!rendered.contains("03F84812"));
        assert!(!rendered.to_lowercase().contains("03f84812"));
    }

    #[test]
    fn test_seed_rejects_addresses() {
        assert!(matches!(
            Seed::decode("rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErN"),
            Err(KeypairError::AddressCodec(_))
        ));
    }
}
