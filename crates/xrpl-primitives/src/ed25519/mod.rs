//! Ed25519 keys and signatures.
//!
//! On the ledger an Ed25519 public key travels as 33 bytes: the marker byte
//! `0xED` followed by the 32-byte curve point. Signatures are the native
//! 64-byte form over the full message (no pre-hashing, no DER).

use std::fmt;

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::PrimitivesError;

/// Marker byte that prefixes Ed25519 keys in their ledger encoding.
pub const ED25519_PREFIX: u8 = 0xED;

/// Length of a raw Ed25519 secret or public key.
pub const KEY_LEN: usize = 32;

/// Length of a prefixed Ed25519 key as carried on the ledger.
pub const PREFIXED_KEY_LEN: usize = 33;

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// An Ed25519 private key.
///
/// The secret bytes are wiped on drop by `ed25519-dalek`.
#[derive(Clone)]
pub struct Ed25519PrivateKey {
    inner: SigningKey,
}

/// An Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Ed25519PublicKey {
    inner: VerifyingKey,
}

impl Ed25519PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn generate() -> Self {
        Ed25519PrivateKey {
            inner: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a private key from 32 raw secret bytes.
    ///
    /// # Arguments
    /// * `bytes` - The 32-byte secret.
    ///
    /// # Returns
    /// `Ok(Ed25519PrivateKey)`, or an error if the input is not 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let secret: [u8; KEY_LEN] = bytes.try_into().map_err(|_| PrimitivesError::InvalidKeyLength {
            expected: KEY_LEN,
            got: bytes.len(),
        })?;
        Ok(Ed25519PrivateKey {
            inner: SigningKey::from_bytes(&secret),
        })
    }

    /// Build a private key from either the raw 32 bytes or the 33-byte
    /// `0xED`-prefixed form.
    pub fn from_prefixed_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        match bytes {
            [ED25519_PREFIX, rest @ ..] if rest.len() == KEY_LEN => Self::from_bytes(rest),
            _ if bytes.len() == KEY_LEN => Self::from_bytes(bytes),
            _ => Err(PrimitivesError::InvalidPrivateKey(format!(
                "expected 32 bytes or 33 bytes with 0xED prefix, got {}",
                bytes.len()
            ))),
        }
    }

    /// Raw 32-byte secret.
    pub fn to_bytes(&self) -> [u8; KEY_LEN] {
        self.inner.to_bytes()
    }

    /// Ledger form of the secret: `0xED` followed by the 32 secret bytes.
    pub fn to_prefixed_bytes(&self) -> [u8; PREFIXED_KEY_LEN] {
        let mut out = [0u8; PREFIXED_KEY_LEN];
        out[0] = ED25519_PREFIX;
        out[1..].copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Derive the public key.
    pub fn pub_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey {
            inner: self.inner.verifying_key(),
        }
    }

    /// Sign `message` (RFC 8032, deterministic).
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.inner.sign(message).to_bytes()
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519PrivateKey")
            .field("public_key", &self.pub_key())
            .finish_non_exhaustive()
    }
}

impl Ed25519PublicKey {
    /// Parse a public key from the 33-byte `0xED`-prefixed ledger form.
    pub fn from_prefixed_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PREFIXED_KEY_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PREFIXED_KEY_LEN,
                got: bytes.len(),
            });
        }
        if bytes[0] != ED25519_PREFIX {
            return Err(PrimitivesError::InvalidPublicKey(format!(
                "expected 0xED prefix, got 0x{:02x}",
                bytes[0]
            )));
        }
        Self::from_bytes(&bytes[1..])
    }

    /// Parse a public key from its raw 32 bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let raw: [u8; KEY_LEN] = bytes.try_into().map_err(|_| PrimitivesError::InvalidKeyLength {
            expected: KEY_LEN,
            got: bytes.len(),
        })?;
        let inner = VerifyingKey::from_bytes(&raw).map_err(|_| PrimitivesError::PointNotOnCurve)?;
        Ok(Ed25519PublicKey { inner })
    }

    /// Raw 32-byte point.
    pub fn to_bytes(&self) -> [u8; KEY_LEN] {
        self.inner.to_bytes()
    }

    /// Ledger form: `0xED` followed by the 32-byte point.
    pub fn to_prefixed_bytes(&self) -> [u8; PREFIXED_KEY_LEN] {
        let mut out = [0u8; PREFIXED_KEY_LEN];
        out[0] = ED25519_PREFIX;
        out[1..].copy_from_slice(self.inner.as_bytes());
        out
    }

    /// Verify a 64-byte signature over `message`.
    ///
    /// Any malformed signature simply fails to verify.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(sig) = DalekSignature::from_slice(signature) else {
            return false;
        };
        self.inner.verify(message, &sig).is_ok()
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", hex::encode_upper(self.to_prefixed_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::sha512_half;

    /// Key of seed sEdSKaCy2JT7JaM7v95H9SxkhP9wS2r (entropy 0x01..0x10).
    const SECRET: &str = "B4C4E046826BD26190D09715FC31F4E6A728204EADD112905B08B14B7F15C4F3";
    const PUBLIC: &str = "ED01FA53FA5A7E77798F882ECE20B1ABC00BB358A9E55A202D0D0676BD0CE37A63";

    #[test]
    fn test_known_key_and_signature() {
        let entropy: Vec<u8> = (1u8..=16).collect();
        let secret = sha512_half(&entropy);
        assert_eq!(hex::encode_upper(secret), SECRET);

        let key = Ed25519PrivateKey::from_bytes(&secret).unwrap();
        assert_eq!(hex::encode_upper(key.pub_key().to_prefixed_bytes()), PUBLIC);

        let sig = key.sign(b"hello");
        assert_eq!(
            hex::encode_upper(sig),
            "7A11CA7C4CCB089309B950B812C2BE76942F79943500AEA45BD8CC6FFA7650DD\
             F623BBCEEE35DF02C84985FC9610358D5F52CA1C6120429114F47094BDA44C04"
        );
        assert!(key.pub_key().verify(b"hello", &sig));
        assert!(!key.pub_key().verify(b"hellO", &sig));
    }

    #[test]
    fn test_prefixed_round_trip() {
        let key = Ed25519PrivateKey::generate();
        let prefixed = key.to_prefixed_bytes();
        assert_eq!(prefixed[0], ED25519_PREFIX);
        let back = Ed25519PrivateKey::from_prefixed_bytes(&prefixed).unwrap();
        assert_eq!(back.to_bytes(), key.to_bytes());

        let pub_key = key.pub_key();
        let parsed = Ed25519PublicKey::from_prefixed_bytes(&pub_key.to_prefixed_bytes()).unwrap();
        assert_eq!(parsed, pub_key);
    }

    #[test]
    fn test_rejects_bad_lengths_and_prefix() {
        assert_eq!(
            Ed25519PrivateKey::from_bytes(&[0u8; 31]).unwrap_err(),
            PrimitivesError::InvalidKeyLength { expected: 32, got: 31 }
        );
        assert!(Ed25519PrivateKey::from_prefixed_bytes(&[0u8; 34]).is_err());

        let mut public = hex::decode(PUBLIC).unwrap();
        public[0] = 0x02;
        assert!(matches!(
            Ed25519PublicKey::from_prefixed_bytes(&public),
            Err(PrimitivesError::InvalidPublicKey(_))
        ));
        assert!(Ed25519PublicKey::from_prefixed_bytes(&public[..32]).is_err());
    }

    #[test]
    fn test_verify_rejects_malformed_signature() {
        let key = Ed25519PrivateKey::generate();
        let sig = key.sign(b"msg");
        assert!(!key.pub_key().verify(b"msg", &sig[..63]));
        assert!(!key.pub_key().verify(b"msg", &[]));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = Ed25519PrivateKey::from_bytes(&hex::decode(SECRET).unwrap()).unwrap();
        let rendered = format!("{:?}", key);
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains(PUBLIC));
    }
}
