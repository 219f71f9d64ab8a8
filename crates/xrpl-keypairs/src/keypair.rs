//! Key pairs and the algorithm-agnostic signing entry points.
//!
//! Keys travel as 33-byte values whose first byte names the algorithm:
//! `0x00` for a secp256k1 private scalar, `0x02`/`0x03` for a compressed
//! secp256k1 point, and `0xED` for either Ed25519 key.

use std::fmt;

use zeroize::Zeroize;

use xrpl_address_codec::{decode_node_public, AccountId, KeyType};
use xrpl_primitives::ec::PublicKey;
use xrpl_primitives::ed25519::ED25519_PREFIX;

use crate::ed25519::Ed25519;
use crate::secp256k1::{self, Secp256k1, PRIVATE_KEY_PREFIX};
use crate::seed::Seed;
use crate::KeypairError;

/// Length of a key in its prefixed form.
pub const KEY_LEN: usize = 33;

/// A signing algorithm that turns seed entropy into keys and signs with them.
pub trait KeyScheme {
    /// The algorithm this scheme implements.
    const KEY_TYPE: KeyType;

    /// Derive the key pair at `account_index` from 16 bytes of seed entropy.
    fn derive_keypair(entropy: &[u8], account_index: u32) -> Result<KeyPair, KeypairError>;

    /// Sign `message` with a private key in its prefixed form.
    fn sign(message: &[u8], private_key: &[u8]) -> Result<Vec<u8>, KeypairError>;

    /// Check `signature` over `message`. Malformed input verifies as false.
    fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool;
}

/// A private/public key pair. The private half is wiped on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    key_type: KeyType,
    private_key: [u8; KEY_LEN],
    public_key: [u8; KEY_LEN],
}

impl KeyPair {
    pub(crate) fn new(key_type: KeyType, private_key: [u8; KEY_LEN], public_key: [u8; KEY_LEN]) -> Self {
        KeyPair {
            key_type,
            private_key,
            public_key,
        }
    }

    /// The algorithm both keys belong to.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// The prefixed private key: `0x00` + scalar, or `0xED` + secret.
    pub fn private_key_bytes(&self) -> &[u8; KEY_LEN] {
        &self.private_key
    }

    /// The 33-byte public key: a compressed point, or `0xED` + key.
    pub fn public_key_bytes(&self) -> &[u8; KEY_LEN] {
        &self.public_key
    }

    /// Uppercase hex, `00`- or `ED`-prefixed.
    pub fn private_key_hex(&self) -> String {
        hex::encode_upper(self.private_key)
    }

    /// Uppercase hex of the 33-byte public key.
    pub fn public_key_hex(&self) -> String {
        hex::encode_upper(self.public_key)
    }

    /// Account id of the public key: RIPEMD-160 of its SHA-256.
    pub fn account_id(&self) -> AccountId {
        AccountId::from_public_key(&self.public_key)
    }

    /// Classic address of the public key.
    pub fn address(&self) -> String {
        self.account_id().to_classic_address()
    }

    /// Sign `message` with this pair's private key.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, KeypairError> {
        match self.key_type {
            KeyType::Secp256k1 => Secp256k1::sign(message, &self.private_key),
            KeyType::Ed25519 => Ed25519::sign(message, &self.private_key),
        }
    }

    /// Check a signature against this pair's public key.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        match self.key_type {
            KeyType::Secp256k1 => Secp256k1::verify(message, signature, &self.public_key),
            KeyType::Ed25519 => Ed25519::verify(message, signature, &self.public_key),
        }
    }
}

impl Drop for KeyPair {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("key_type", &self.key_type)
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// Derive the account key pair (index 0) of a seed string.
pub fn derive_keypair(seed: &str) -> Result<KeyPair, KeypairError> {
    derive_keypair_with_index(seed, 0)
}

/// Derive the key pair at `account_index`.
///
/// Ed25519 seeds only have index 0.
pub fn derive_keypair_with_index(seed: &str, account_index: u32) -> Result<KeyPair, KeypairError> {
    let seed = Seed::decode(seed)?;
    derive_from_seed(&seed, account_index)
}

/// Derive from an already decoded seed.
pub fn derive_from_seed(seed: &Seed, account_index: u32) -> Result<KeyPair, KeypairError> {
    match seed.key_type() {
        KeyType::Secp256k1 => Secp256k1::derive_keypair(seed.entropy(), account_index),
        KeyType::Ed25519 => Ed25519::derive_keypair(seed.entropy(), account_index),
    }
}

/// Derive the validator (root) key pair. secp256k1 seeds only.
pub fn derive_validator_keypair(seed: &str) -> Result<KeyPair, KeypairError> {
    let seed = Seed::decode(seed)?;
    match seed.key_type() {
        KeyType::Secp256k1 => secp256k1::derive_validator_keypair(seed.entropy()),
        other => Err(KeypairError::ValidatorUnsupported(other)),
    }
}

/// Sign `message` with a hex private key.
///
/// Accepts the 33-byte `00`/`ED`-prefixed form and a bare 32-byte
/// secp256k1 scalar.
///
/// # Returns
/// Uppercase hex: a DER signature for secp256k1, 64 raw bytes for Ed25519.
pub fn sign(message: &[u8], private_key_hex: &str) -> Result<String, KeypairError> {
    let mut key = hex::decode(private_key_hex)?;
    let signed = match (key.len(), key.first()) {
        (KEY_LEN, Some(&ED25519_PREFIX)) => Ed25519::sign(message, &key),
        (KEY_LEN, Some(&PRIVATE_KEY_PREFIX)) | (32, _) => Secp256k1::sign(message, &key),
        (len, _) => Err(KeypairError::InvalidPrivateKey(format!(
            "unrecognised private key of {} bytes",
            len
        ))),
    };
    key.zeroize();
    Ok(hex::encode_upper(signed?))
}

/// Verify a hex signature against a hex public key.
///
/// The algorithm follows the public key's first byte. Anything that fails
/// to parse verifies as false.
pub fn verify(message: &[u8], public_key_hex: &str, signature_hex: &str) -> bool {
    let (Ok(public), Ok(signature)) = (hex::decode(public_key_hex), hex::decode(signature_hex)) else {
        return false;
    };
    match public.first() {
        Some(&ED25519_PREFIX) => Ed25519::verify(message, &signature, &public),
        Some(0x02) | Some(0x03) => Secp256k1::verify(message, &signature, &public),
        _ => false,
    }
}

/// Classic address of a hex public key.
pub fn derive_address(public_key_hex: &str) -> Result<String, KeypairError> {
    let public = hex::decode(public_key_hex)?;
    match (public.len(), public.first()) {
        (KEY_LEN, Some(&ED25519_PREFIX)) | (KEY_LEN, Some(0x02)) | (KEY_LEN, Some(0x03)) => {
            Ok(AccountId::from_public_key(&public).to_classic_address())
        }
        (len, _) => Err(KeypairError::InvalidPublicKey(format!(
            "expected a 33-byte secp256k1 or ed25519 key, got {} bytes",
            len
        ))),
    }
}

/// Account address controlled by a validator's node public key (`n...`).
///
/// The node key is a secp256k1 root key; the account is its index-0 child.
pub fn derive_node_address(node_public: &str) -> Result<String, KeypairError> {
    let bytes = decode_node_public(node_public)?;
    let root = PublicKey::from_bytes(&bytes)?;
    let account = secp256k1::derive_account_public_key(&root, 0)?;
    Ok(AccountId::from_public_key(&account.to_compressed()).to_classic_address())
}
