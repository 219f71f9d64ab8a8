use xrpl_address_codec::{AddressCodecError, KeyType};
use xrpl_primitives::PrimitivesError;

/// Error types for key derivation and signing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeypairError {
    /// Seed, address or public key string failed to decode.
    #[error("address codec error: {0}")]
    AddressCodec(#[from] AddressCodecError),

    /// Key or signature primitive rejected its input.
    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),

    /// No candidate scalar fell inside the curve order within the attempt limit.
    #[error("no valid scalar found after {0} attempts")]
    DerivationExhausted(u32),

    /// Validator keys exist only for secp256k1.
    #[error("validator keys cannot be derived for {0}")]
    ValidatorUnsupported(KeyType),

    /// Ed25519 seeds derive exactly one key pair.
    #[error("account index {index} is not supported for {key_type}")]
    AccountIndexUnsupported { key_type: KeyType, index: u32 },

    /// Seed entropy of the wrong size.
    #[error("invalid entropy length: expected {expected}, got {got}")]
    InvalidEntropy { expected: usize, got: usize },

    /// Private key string that is neither `00`/`ED`-prefixed nor a bare scalar.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Public key that is not a 33-byte secp256k1 or Ed25519 key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl From<hex::FromHexError> for KeypairError {
    fn from(e: hex::FromHexError) -> Self {
        KeypairError::InvalidHex(e.to_string())
    }
}
