//! Ed25519 key derivation and signing.

use tracing::debug;

use xrpl_address_codec::KeyType;
use xrpl_primitives::ed25519::{Ed25519PrivateKey, Ed25519PublicKey, ED25519_PREFIX};
use xrpl_primitives::hash::sha512_half;
use zeroize::Zeroize;

use crate::keypair::{KeyPair, KeyScheme};
use crate::KeypairError;

/// The Ed25519 signing scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519;

impl KeyScheme for Ed25519 {
    const KEY_TYPE: KeyType = KeyType::Ed25519;

    /// The secret key is `sha512_half(entropy)`; only index 0 exists.
    fn derive_keypair(entropy: &[u8], account_index: u32) -> Result<KeyPair, KeypairError> {
        if account_index != 0 {
            return Err(KeypairError::AccountIndexUnsupported {
                key_type: Self::KEY_TYPE,
                index: account_index,
            });
        }
        let mut secret = sha512_half(entropy);
        let key = Ed25519PrivateKey::from_bytes(&secret);
        secret.zeroize();
        let key = key?;
        debug!("derived ed25519 key pair");
        Ok(KeyPair::new(
            Self::KEY_TYPE,
            key.to_prefixed_bytes(),
            key.pub_key().to_prefixed_bytes(),
        ))
    }

    /// 64-byte signature over the raw message.
    fn sign(message: &[u8], private_key: &[u8]) -> Result<Vec<u8>, KeypairError> {
        let key = match private_key.first() {
            Some(&ED25519_PREFIX) => Ed25519PrivateKey::from_prefixed_bytes(private_key)?,
            _ => {
                return Err(KeypairError::InvalidPrivateKey(
                    "ed25519 keys carry the 0xED prefix".to_string(),
                ))
            }
        };
        Ok(key.sign(message).to_vec())
    }

    fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        match Ed25519PublicKey::from_prefixed_bytes(public_key) {
            Ok(key) => key.verify(message, signature),
            Err(_) => false,
        }
    }
}
