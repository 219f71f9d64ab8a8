//! secp256k1 private key.
//!
//! Wraps the k256 signing key and adds the scalar arithmetic the ledger's
//! deterministic key derivation needs, plus deterministic (RFC6979) signing.

use std::fmt;

use k256::ecdsa::SigningKey;
use k256::elliptic_curve::ScalarPrimitive;
use k256::{Scalar, Secp256k1};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::ec::public_key::PublicKey;
use crate::ec::signature::Signature;
use crate::PrimitivesError;

/// Length of a serialized private key scalar in bytes.
pub const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// A secp256k1 private key for signing and key derivation.
///
/// Always holds a scalar in `[1, n)`; every constructor rejects zero and
/// values at or above the curve order.
#[derive(Clone)]
pub struct PrivateKey {
    /// The underlying k256 signing key.
    inner: SigningKey,
}

impl PrivateKey {
    /// Generate a new random private key using the OS random number generator.
    pub fn new() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a private key from a raw 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - A 32-byte slice representing the private key scalar.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` if the bytes represent a scalar in `[1, n)`, or an
    /// error if the length is wrong, the scalar is zero, or it is out of range.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PRIVATE_KEY_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let signing_key = SigningKey::from_bytes(bytes.into())
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner: signing_key })
    }

    /// Create a private key from a hexadecimal string of the 32-byte scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        if hex_str.is_empty() {
            return Err(PrimitivesError::InvalidPrivateKey(
                "private key hex is empty".to_string(),
            ));
        }
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the private key as a 32-byte big-endian array.
    pub fn to_bytes(&self) -> [u8; PRIVATE_KEY_BYTES_LEN] {
        let mut out = [0u8; PRIVATE_KEY_BYTES_LEN];
        out.copy_from_slice(&self.inner.to_bytes());
        out
    }

    /// Serialize the private key as an uppercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.to_bytes())
    }

    /// Derive the corresponding public key for this private key.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Add another scalar to this one modulo the curve order.
    ///
    /// This is the final step of account key derivation: the account
    /// private key is `(root + tweak) mod n`.
    ///
    /// # Returns
    /// The summed key, or an error in the (negligible) case the sum is zero.
    pub fn add_scalar(&self, tweak: &PrivateKey) -> Result<PrivateKey, PrimitivesError> {
        let sum: Scalar = self.to_scalar() + tweak.to_scalar();
        let primitive: ScalarPrimitive<Secp256k1> = sum.into();
        let mut bytes = primitive.to_bytes();
        let result = PrivateKey::from_bytes(&bytes);
        bytes.zeroize();
        result
    }

    /// Sign a 32-byte digest using deterministic RFC6979 nonces.
    ///
    /// Produces a low-S normalized signature.
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self)
    }

    /// Access the underlying k256 `SigningKey`.
    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }

    /// Convert the private key to a k256 `Scalar` for arithmetic operations.
    pub(crate) fn to_scalar(&self) -> Scalar {
        *self.inner.as_nonzero_scalar().as_ref()
    }
}

impl Default for PrivateKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey(pub={})", self.pub_key().to_hex())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}
