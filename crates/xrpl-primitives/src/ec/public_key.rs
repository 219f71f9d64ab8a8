//! secp256k1 public key.
//!
//! The ledger only ever carries compressed SEC1 points, so parsing accepts
//! exactly 33 bytes with a 0x02/0x03 prefix.

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint};
use std::fmt;

use crate::ec::private_key::PrivateKey;
use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// Length of a compressed public key in bytes (prefix + 32 byte x-coordinate).
pub const COMPRESSED_LEN: usize = 33;

/// A secp256k1 public key for verification and account id derivation.
#[derive(Clone, Debug)]
pub struct PublicKey {
    /// The underlying k256 verifying key.
    inner: VerifyingKey,
}

impl PublicKey {
    /// Create a PublicKey from a compressed SEC1 encoding.
    ///
    /// # Arguments
    /// * `bytes` - 33 bytes: 0x02 or 0x03 followed by the X coordinate.
    ///
    /// # Returns
    /// `Ok(PublicKey)` on success, or an error if the length or prefix is
    /// wrong or the bytes don't represent a point on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != COMPRESSED_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: COMPRESSED_LEN,
                got: bytes.len(),
            });
        }
        if bytes[0] != 0x02 && bytes[0] != 0x03 {
            return Err(PrimitivesError::InvalidPublicKey(format!(
                "unexpected prefix byte 0x{:02x}",
                bytes[0]
            )));
        }
        let vk = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| PrimitivesError::PointNotOnCurve)?;
        Ok(PublicKey { inner: vk })
    }

    /// Create a PublicKey from a hex-encoded compressed key (66 characters).
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize the public key in compressed SEC1 format (33 bytes).
    ///
    /// The first byte is 0x02 (even Y) or 0x03 (odd Y), followed by the 32-byte X coordinate.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let point = self.inner.to_encoded_point(true);
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Serialize the compressed public key as an uppercase hexadecimal string.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.to_compressed())
    }

    /// Compute the Hash160 of the compressed public key.
    ///
    /// For an account public key this is the 20-byte account id.
    pub fn hash160(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// Verify an ECDSA signature against a 32-byte digest using this public key.
    ///
    /// # Returns
    /// `true` if the signature is valid for this digest and public key, `false` otherwise.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    /// Return `self + tweak * G`.
    ///
    /// The public counterpart of [`PrivateKey::add_scalar`]: deriving the
    /// account public key from a root (or node) public key without the
    /// private scalar.
    pub fn add_generator_multiple(&self, tweak: &PrivateKey) -> Result<PublicKey, PrimitivesError> {
        let offset = ProjectivePoint::GENERATOR * tweak.to_scalar();
        let sum = (self.to_projective_point()? + offset).to_affine();
        let encoded = sum.to_encoded_point(true);
        PublicKey::from_bytes(encoded.as_bytes())
    }

    /// Construct a PublicKey from a k256 `VerifyingKey`.
    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: *vk }
    }

    /// Convert this public key to a k256 `ProjectivePoint` for EC arithmetic.
    pub(crate) fn to_projective_point(&self) -> Result<ProjectivePoint, PrimitivesError> {
        let encoded: EncodedPoint = self.inner.to_encoded_point(false);
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(ProjectivePoint::from)
            .ok_or(PrimitivesError::PointNotOnCurve)
    }

    /// Access the underlying k256 `VerifyingKey`.
    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVEN_Y: &str = "02CE0B14FB842B1BA549FDD675C98075F12E9C510F8EF52BD021A9A1F4809D3B4D";
    const ODD_Y: &str = "032689C7C2DAB13309FB143E0E8FE396342521887E976690B6B47F5B2A4B7D448E";

    #[test]
    fn test_pub_keys() {
        struct PubKeyTest {
            name: &'static str,
            key: Vec<u8>,
            is_valid: bool,
        }

        let uncompressed = hex::decode(
            "0411db93e1dcdb8a016b49840f8c53bc1eb68a382e97b1482ecad7b148a6909a5c\
             b2e0eaddfb84ccf9744464f82e160bfa9b8b64f9d4c03f999b8643f656b412a3",
        )
        .unwrap();

        let tests = vec![
            PubKeyTest {
                name: "compressed ok (ybit = 0)",
                key: hex::decode(EVEN_Y).unwrap(),
                is_valid: true,
            },
            PubKeyTest {
                name: "compressed ok (ybit = 1)",
                key: hex::decode(ODD_Y).unwrap(),
                is_valid: true,
            },
            PubKeyTest {
                name: "uncompressed is not accepted",
                key: uncompressed,
                is_valid: false,
            },
            PubKeyTest {
                name: "ed25519 prefix",
                key: {
                    let mut k = hex::decode(EVEN_Y).unwrap();
                    k[0] = 0xed;
                    k
                },
                is_valid: false,
            },
            PubKeyTest {
                name: "wrong length",
                key: vec![0x05],
                is_valid: false,
            },
            PubKeyTest {
                name: "empty",
                key: vec![],
                is_valid: false,
            },
        ];

        for test in &tests {
            let result = PublicKey::from_bytes(&test.key);
            assert_eq!(result.is_ok(), test.is_valid, "{}: {:?}", test.name, result.err());
        }
    }

    #[test]
    fn test_public_key_is_equal() {
        let pk1 = PublicKey::from_hex(ODD_Y).unwrap();
        let pk2 = PublicKey::from_hex(EVEN_Y).unwrap();
        assert_eq!(pk1, pk1);
        assert_ne!(pk1, pk2);
    }

    #[test]
    fn test_compressed_round_trip_and_display() {
        let pk = PublicKey::from_hex(EVEN_Y).unwrap();
        assert_eq!(pk.to_compressed().to_vec(), hex::decode(EVEN_Y).unwrap());
        assert_eq!(format!("{}", pk), EVEN_Y);
    }

    /// Account id of the first account key of seed sp5fghtJtpUorTwvof1NpDXAzNwf5.
    #[test]
    fn test_hash160_account_id() {
        let pk = PublicKey::from_hex(
            "030D58EB48B4420B1F7B9DF55087E0E29FEF0E8468F9A6825B01CA2C361042D435",
        )
        .unwrap();
        let priv_key = PrivateKey::from_hex(
            "D78B9735C3F26501C7337B8A5727FD53A6EFDBC6AA55984F098488561F985E23",
        )
        .unwrap();
        assert_eq!(priv_key.pub_key(), pk);
        assert_eq!(
            hex::encode_upper(pk.hash160()),
            "8049717CC948789F32F267ADC2582484E3DFA698"
        );
    }

    #[test]
    fn test_add_generator_multiple_matches_private_addition() {
        let root = PrivateKey::new();
        let tweak = PrivateKey::new();
        let summed_priv = root.add_scalar(&tweak).unwrap();
        let summed_pub = root.pub_key().add_generator_multiple(&tweak).unwrap();
        assert_eq!(summed_priv.pub_key(), summed_pub);
    }
}
