//! secp256k1 key derivation and ECDSA signing.
//!
//! A seed's entropy yields a root key; the account key is the root scalar
//! plus a tweak hashed from the root public key and an account index.
//! Both scalars come from the same search: hash the input with a counter
//! until the SHA-512Half output lies in `[1, n)`.

use tracing::{debug, warn};
use zeroize::Zeroize;

use xrpl_address_codec::KeyType;
use xrpl_primitives::ec::{PrivateKey, PublicKey, Signature};
use xrpl_primitives::hash::{sha512_half, sha512_half_parts};

use crate::keypair::{KeyPair, KeyScheme};
use crate::KeypairError;

/// Upper bound on candidates tried per scalar search.
pub const MAX_SCALAR_ATTEMPTS: u32 = u32::MAX;

/// Counter value past which a search is reported as unusually long.
const LONG_SEARCH_COUNTER: u32 = 16;

/// Textual prefix byte of a secp256k1 private key.
pub const PRIVATE_KEY_PREFIX: u8 = 0x00;

/// The secp256k1 signing scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1;

/// Find the first `sha512_half(bytes || [discriminator] || counter)` that is
/// a valid private scalar.
///
/// # Arguments
/// * `bytes` - Seed entropy or a compressed public key.
/// * `discriminator` - Account index, appended as big-endian u32 when present.
///
/// # Returns
/// The accepted scalar, or `DerivationExhausted` when no counter works.
pub fn derive_scalar(bytes: &[u8], discriminator: Option<u32>) -> Result<PrivateKey, KeypairError> {
    derive_scalar_bounded(bytes, discriminator, MAX_SCALAR_ATTEMPTS)
}

pub(crate) fn derive_scalar_bounded(
    bytes: &[u8],
    discriminator: Option<u32>,
    max_attempts: u32,
) -> Result<PrivateKey, KeypairError> {
    let disc_bytes = discriminator.map(u32::to_be_bytes);
    for counter in 0..max_attempts {
        let counter_bytes = counter.to_be_bytes();
        let mut candidate = match &disc_bytes {
            Some(disc) => sha512_half_parts(&[bytes, disc, &counter_bytes]),
            None => sha512_half_parts(&[bytes, &counter_bytes]),
        };
        let accepted = PrivateKey::from_bytes(&candidate);
        candidate.zeroize();

        if let Ok(key) = accepted {
            if counter >= LONG_SEARCH_COUNTER {
                warn!(counter, "scalar search ran unusually long");
            }
            debug!(counter, has_discriminator = discriminator.is_some(), "scalar accepted");
            return Ok(key);
        }
    }
    Err(KeypairError::DerivationExhausted(max_attempts))
}

/// Root (validator) private key of a seed.
pub fn derive_root_key(entropy: &[u8]) -> Result<PrivateKey, KeypairError> {
    derive_scalar(entropy, None)
}

/// Account public key for `account_index` from a root public key alone.
///
/// Used to find the account that belongs to a validator's node public key.
pub fn derive_account_public_key(
    root_public: &PublicKey,
    account_index: u32,
) -> Result<PublicKey, KeypairError> {
    let tweak = derive_scalar(&root_public.to_compressed(), Some(account_index))?;
    Ok(root_public.add_generator_multiple(&tweak)?)
}

/// Validator key pair: the root key itself, without the account tweak.
pub fn derive_validator_keypair(entropy: &[u8]) -> Result<KeyPair, KeypairError> {
    let root = derive_root_key(entropy)?;
    Ok(keypair_from_private(&root))
}

fn keypair_from_private(key: &PrivateKey) -> KeyPair {
    let mut private = [0u8; 33];
    private[0] = PRIVATE_KEY_PREFIX;
    let mut scalar = key.to_bytes();
    private[1..].copy_from_slice(&scalar);
    scalar.zeroize();
    KeyPair::new(Secp256k1::KEY_TYPE, private, key.pub_key().to_compressed())
}

/// Accept a bare 32-byte scalar or the 33-byte `00`-prefixed form.
fn parse_private_key(private_key: &[u8]) -> Result<PrivateKey, KeypairError> {
    match private_key {
        [PRIVATE_KEY_PREFIX, rest @ ..] if rest.len() == 32 => Ok(PrivateKey::from_bytes(rest)?),
        _ if private_key.len() == 32 => Ok(PrivateKey::from_bytes(private_key)?),
        _ => Err(KeypairError::InvalidPrivateKey(format!(
            "expected 32 bytes or 33 bytes with 0x00 prefix, got {}",
            private_key.len()
        ))),
    }
}

impl KeyScheme for Secp256k1 {
    const KEY_TYPE: KeyType = KeyType::Secp256k1;

    fn derive_keypair(entropy: &[u8], account_index: u32) -> Result<KeyPair, KeypairError> {
        let root = derive_root_key(entropy)?;
        let tweak = derive_scalar(&root.pub_key().to_compressed(), Some(account_index))?;
        let account = root.add_scalar(&tweak)?;
        debug!(account_index, "derived secp256k1 account key");
        Ok(keypair_from_private(&account))
    }

    /// DER signature over `sha512_half(message)`.
    fn sign(message: &[u8], private_key: &[u8]) -> Result<Vec<u8>, KeypairError> {
        let key = parse_private_key(private_key)?;
        let digest = sha512_half(message);
        Ok(Signature::sign(&digest, &key)?.to_der())
    }

    fn verify(message: &[u8], signature: &[u8], public_key: &[u8]) -> bool {
        let Ok(public) = PublicKey::from_bytes(public_key) else {
            return false;
        };
        let Ok(sig) = Signature::from_der(signature) else {
            return false;
        };
        public.verify(&sha512_half(message), &sig)
    }
}
