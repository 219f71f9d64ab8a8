//! ECDSA signature with a strict DER codec and RFC6979 deterministic nonces.
//!
//! `to_der` writes `(r, s)` exactly as held, so `from_der(to_der(sig))`
//! always returns `sig`. Signing produces low-S values, which is the only
//! form the ledger accepts on verification.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa;

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// The secp256k1 curve order N.
/// N = FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
pub const CURVE_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFE, 0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36,
    0x41, 0x41,
];

/// Half of the secp256k1 curve order (N/2), used for low-S normalization.
const HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B,
    0x20, 0xA0,
];

/// ASN.1 SEQUENCE tag.
const DER_SEQUENCE: u8 = 0x30;

/// ASN.1 INTEGER tag.
const DER_INTEGER: u8 = 0x02;

/// Shortest possible encoding: `30 06 02 01 rr 02 01 ss`.
const DER_MIN_LEN: usize = 8;

/// Length of the digest that is signed.
pub const DIGEST_LEN: usize = 32;

/// An ECDSA signature with R and S components.
#[derive(Clone, Debug)]
pub struct Signature {
    /// The R component of the signature (32 bytes, big-endian).
    r: [u8; 32],
    /// The S component of the signature (32 bytes, big-endian).
    s: [u8; 32],
}

impl Signature {
    /// Create a signature from raw R and S 32-byte arrays.
    ///
    /// # Arguments
    /// * `r` - The R component (32 bytes, big-endian).
    /// * `s` - The S component (32 bytes, big-endian).
    ///
    /// # Returns
    /// A new `Signature` with the given R and S values.
    pub fn new(r: [u8; 32], s: [u8; 32]) -> Self {
        Signature { r, s }
    }

    /// Access the R component of the signature.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// Access the S component of the signature.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Parse a DER-encoded ECDSA signature.
    ///
    /// Expected format: 0x30 <len> 0x02 <r_len> <r> 0x02 <s_len> <s>
    ///
    /// The outer length must cover the input exactly, both integers must be
    /// minimally encoded and non-negative, and `r`, `s` must lie in `[1, N)`.
    ///
    /// # Arguments
    /// * `bytes` - DER-encoded signature bytes.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, `DerTrailingBytes` if bytes follow the
    /// sequence, or `MalformedDer` for any structural problem.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() < DER_MIN_LEN {
            return Err(PrimitivesError::MalformedDer("too short"));
        }
        if bytes[0] != DER_SEQUENCE {
            return Err(PrimitivesError::MalformedDer("missing sequence tag"));
        }
        if bytes[1] & 0x80 != 0 {
            return Err(PrimitivesError::MalformedDer("long-form sequence length"));
        }

        let seq_end = 2 + bytes[1] as usize;
        if seq_end > bytes.len() {
            return Err(PrimitivesError::MalformedDer("sequence length exceeds input"));
        }
        if seq_end < bytes.len() {
            return Err(PrimitivesError::DerTrailingBytes(bytes.len() - seq_end));
        }

        let body = &bytes[2..seq_end];
        let (r_bytes, rest) = parse_integer(body)?;
        let (s_bytes, rest) = parse_integer(rest)?;
        if !rest.is_empty() {
            return Err(PrimitivesError::MalformedDer(
                "sequence holds more than two integers",
            ));
        }

        let r = to_32_bytes(r_bytes)?;
        let s = to_32_bytes(s_bytes)?;

        if is_zero(&r) {
            return Err(PrimitivesError::MalformedDer("r is zero"));
        }
        if is_zero(&s) {
            return Err(PrimitivesError::MalformedDer("s is zero"));
        }
        if !is_less_than(&r, &CURVE_ORDER) {
            return Err(PrimitivesError::MalformedDer("r is not below the curve order"));
        }
        if !is_less_than(&s, &CURVE_ORDER) {
            return Err(PrimitivesError::MalformedDer("s is not below the curve order"));
        }

        Ok(Signature { r, s })
    }

    /// Parse a hex-encoded DER signature.
    pub fn from_der_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_der(&bytes)
    }

    /// Serialize the signature in DER format.
    ///
    /// Output format: 0x30 <len> 0x02 <r_len> <r_bytes> 0x02 <s_len> <s_bytes>
    /// Each integer is minimal big-endian with a 0x00 pad when its top bit is set.
    ///
    /// # Returns
    /// A byte vector containing the DER-encoded signature.
    pub fn to_der(&self) -> Vec<u8> {
        let rb = canonicalize_int(&self.r);
        let sb = canonicalize_int(&self.s);

        let total_len = 6 + rb.len() + sb.len();
        let mut out = Vec::with_capacity(total_len);
        out.push(DER_SEQUENCE);
        out.push((total_len - 2) as u8);
        out.push(DER_INTEGER);
        out.push(rb.len() as u8);
        out.extend_from_slice(&rb);
        out.push(DER_INTEGER);
        out.push(sb.len() as u8);
        out.extend_from_slice(&sb);
        out
    }

    /// Serialize the signature as uppercase DER hex.
    pub fn to_der_hex(&self) -> String {
        hex::encode_upper(self.to_der())
    }

    /// Whether S lies in the lower half of the curve order.
    pub fn is_low_s(&self) -> bool {
        !is_greater_than(&self.s, &HALF_ORDER)
    }

    /// Return the equivalent signature with S replaced by `N - S` when S is high.
    pub fn normalize_s(&self) -> Signature {
        if self.is_low_s() {
            self.clone()
        } else {
            Signature {
                r: self.r,
                s: subtract_from_order(&self.s),
            }
        }
    }

    /// Sign a 32-byte digest using RFC6979 deterministic nonces.
    ///
    /// Produces a low-S normalized signature.
    ///
    /// # Arguments
    /// * `hash` - The 32-byte digest to sign.
    /// * `priv_key` - The private key to sign with.
    ///
    /// # Returns
    /// `Ok(Signature)` on success, or an error if the digest has the wrong length.
    pub fn sign(hash: &[u8], priv_key: &PrivateKey) -> Result<Self, PrimitivesError> {
        if hash.len() != DIGEST_LEN {
            return Err(PrimitivesError::InvalidSignature(format!(
                "digest must be {} bytes, got {}",
                DIGEST_LEN,
                hash.len()
            )));
        }

        let k256_sig: ecdsa::Signature = priv_key
            .signing_key()
            .sign_prehash(hash)
            .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r_bytes, s_bytes) = k256_sig.split_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&r_bytes);
        s.copy_from_slice(&s_bytes);

        Ok(Signature { r, s }.normalize_s())
    }

    /// Verify this signature against a 32-byte digest and public key.
    ///
    /// High-S signatures do not verify.
    ///
    /// # Returns
    /// `true` if the signature is valid, `false` otherwise.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        if hash.len() != DIGEST_LEN || !self.is_low_s() {
            return false;
        }
        let k256_sig = match ecdsa::Signature::from_scalars(
            k256::FieldBytes::from(self.r),
            k256::FieldBytes::from(self.s),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };

        pub_key
            .verifying_key()
            .verify_prehash(hash, &k256_sig)
            .is_ok()
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.r == other.r && self.s == other.s
    }
}

impl Eq for Signature {}

/// Read one DER INTEGER from the front of `data`.
///
/// Returns the integer's content bytes and the remaining input.
fn parse_integer(data: &[u8]) -> Result<(&[u8], &[u8]), PrimitivesError> {
    if data.len() < 2 {
        return Err(PrimitivesError::MalformedDer("truncated integer header"));
    }
    if data[0] != DER_INTEGER {
        return Err(PrimitivesError::MalformedDer("missing integer tag"));
    }
    if data[1] & 0x80 != 0 {
        return Err(PrimitivesError::MalformedDer("long-form integer length"));
    }
    let len = data[1] as usize;
    if len == 0 {
        return Err(PrimitivesError::MalformedDer("empty integer"));
    }
    if 2 + len > data.len() {
        return Err(PrimitivesError::MalformedDer("integer length exceeds sequence"));
    }

    let value = &data[2..2 + len];
    if value[0] & 0x80 != 0 {
        return Err(PrimitivesError::MalformedDer("negative integer"));
    }
    if value.len() > 1 && value[0] == 0x00 && value[1] & 0x80 == 0 {
        return Err(PrimitivesError::MalformedDer("integer has excess zero padding"));
    }
    Ok((value, &data[2 + len..]))
}

/// Canonicalize an integer for DER encoding.
///
/// Strips leading zeros from the big-endian representation and adds
/// a 0x00 padding byte if the high bit is set.
fn canonicalize_int(val: &[u8; 32]) -> Vec<u8> {
    let mut start = 0;
    while start < 31 && val[start] == 0 {
        start += 1;
    }
    let trimmed = &val[start..];

    if trimmed[0] & 0x80 != 0 {
        let mut out = Vec::with_capacity(trimmed.len() + 1);
        out.push(0x00);
        out.extend_from_slice(trimmed);
        out
    } else {
        trimmed.to_vec()
    }
}

/// Convert a minimal big-endian integer to a fixed 32-byte array.
fn to_32_bytes(bytes: &[u8]) -> Result<[u8; 32], PrimitivesError> {
    let trimmed = match bytes {
        [0x00, rest @ ..] if !rest.is_empty() => rest,
        _ => bytes,
    };
    if trimmed.len() > 32 {
        return Err(PrimitivesError::MalformedDer("integer wider than 32 bytes"));
    }
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok(out)
}

/// Check if a 32-byte big-endian integer is zero.
fn is_zero(val: &[u8; 32]) -> bool {
    val.iter().all(|&b| b == 0)
}

/// Compare two 32-byte big-endian integers: a < b.
fn is_less_than(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a < b
}

/// Compare two 32-byte big-endian integers: a > b.
fn is_greater_than(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a > b
}

/// Compute N - val where N is the secp256k1 curve order.
fn subtract_from_order(val: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;
    for i in (0..32).rev() {
        let diff = CURVE_ORDER[i] as i32 - val[i] as i32 - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::{sha256, sha512_half};

    const VALID_DER: &str = "304402204e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41\
                             0220181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09";

    #[test]
    fn test_signatures_der_parsing() {
        let valid_sig = hex::decode(VALID_DER).unwrap();
        let sig = Signature::from_der(&valid_sig).unwrap();
        assert_eq!(
            hex::encode(sig.r()),
            "4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41"
        );
        assert_eq!(sig.to_der(), valid_sig);

        assert_eq!(
            Signature::from_der(&[]),
            Err(PrimitivesError::MalformedDer("too short"))
        );

        let mut bad_magic = valid_sig.clone();
        bad_magic[0] = 0x31;
        assert_eq!(
            Signature::from_der(&bad_magic),
            Err(PrimitivesError::MalformedDer("missing sequence tag"))
        );

        let mut bad_marker = valid_sig.clone();
        bad_marker[2] = 0x03;
        assert_eq!(
            Signature::from_der(&bad_marker),
            Err(PrimitivesError::MalformedDer("missing integer tag"))
        );
    }

    #[test]
    fn test_der_trailing_bytes_is_distinct() {
        let mut bytes = hex::decode(VALID_DER).unwrap();
        bytes.extend_from_slice(&[0x00, 0x01]);
        assert_eq!(
            Signature::from_der(&bytes),
            Err(PrimitivesError::DerTrailingBytes(2))
        );
    }

    #[test]
    fn test_der_length_mismatch() {
        let mut short_len = hex::decode(VALID_DER).unwrap();
        short_len[1] = 0x45;
        assert_eq!(
            Signature::from_der(&short_len),
            Err(PrimitivesError::MalformedDer("sequence length exceeds input"))
        );

        // Outer length claims one byte less than the two integers need.
        let mut truncated = hex::decode(VALID_DER).unwrap();
        truncated.pop();
        truncated[1] = 0x43;
        assert_eq!(
            Signature::from_der(&truncated),
            Err(PrimitivesError::MalformedDer("integer length exceeds sequence"))
        );
    }

    #[test]
    fn test_der_rejects_bad_integers() {
        // r = 0x80 without padding is negative.
        let negative = [0x30, 0x06, 0x02, 0x01, 0x80, 0x02, 0x01, 0x01];
        assert_eq!(
            Signature::from_der(&negative),
            Err(PrimitivesError::MalformedDer("negative integer"))
        );

        // r = 0x00 0x01 carries a redundant zero.
        let padded = [0x30, 0x07, 0x02, 0x02, 0x00, 0x01, 0x02, 0x01, 0x01];
        assert_eq!(
            Signature::from_der(&padded),
            Err(PrimitivesError::MalformedDer("integer has excess zero padding"))
        );

        let zero_r = [0x30, 0x06, 0x02, 0x01, 0x00, 0x02, 0x01, 0x01];
        assert_eq!(
            Signature::from_der(&zero_r),
            Err(PrimitivesError::MalformedDer("r is zero"))
        );

        let empty_int = [0x30, 0x06, 0x02, 0x00, 0x02, 0x02, 0x01, 0x01];
        assert_eq!(
            Signature::from_der(&empty_int),
            Err(PrimitivesError::MalformedDer("empty integer"))
        );

        let mut at_order = vec![0x30, 0x26, 0x02, 0x21, 0x00];
        at_order.extend_from_slice(&CURVE_ORDER);
        at_order.extend_from_slice(&[0x02, 0x01, 0x01]);
        assert_eq!(
            Signature::from_der(&at_order),
            Err(PrimitivesError::MalformedDer("r is not below the curve order"))
        );

        let three_ints = [
            0x30, 0x09, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01, 0x02, 0x01, 0x01,
        ];
        assert_eq!(
            Signature::from_der(&three_ints),
            Err(PrimitivesError::MalformedDer("sequence holds more than two integers"))
        );
    }

    #[test]
    fn test_signature_serialize() {
        let sig = Signature::new(
            hex_to_32("4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41"),
            hex_to_32("181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09"),
        );
        assert_eq!(sig.to_der(), hex::decode(VALID_DER).unwrap(), "valid 1");

        // High-S is written as held, and only normalize_s flips it.
        let sig = Signature::new(
            hex_to_32("a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404"),
            hex_to_32("971729c7fa944b465b35250c6570a2f31acbb14b13d1565fab7330dcb2b3dfb1"),
        );
        assert!(!sig.is_low_s());
        let der = sig.to_der();
        assert_eq!(Signature::from_der(&der).unwrap(), sig);

        let expected = hex::decode(
            "3045022100a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404\
             022068e8d638056bb4b9a4cadaf39a8f5d0b9fe32b9b9b7749dc145f2db01d826190",
        )
        .unwrap();
        assert_eq!(sig.normalize_s().to_der(), expected, "low-S normalization");
    }

    /// RFC6979 vectors (Trezor/CoreBitcoin) over SHA-256 digests.
    #[test]
    fn test_rfc6979() {
        let tests = vec![
            (
                "cca9fbcc1b41e5a95d369eaa6ddcff73b61a4efaa279cfc6567e8daa39cbaf50",
                "sample",
                "3045022100af340daf02cc15c8d5d08d7735dfe6b98a474ed373bdb5fbecf7571be52b384202205009fb27f37034a9b24b707b7c6b79ca23ddef9e25f7282e8a797efe53a8f124",
            ),
            (
                "0000000000000000000000000000000000000000000000000000000000000001",
                "Satoshi Nakamoto",
                "3045022100934b1ea10a4b3c1757e2b0c017d0b6143ce3c9a7e6a4a49860d7a6ab210ee3d802202442ce9d2b916064108014783e923ec36b49743e2ffa1c4496f01a512aafd9e5",
            ),
            (
                "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140",
                "Satoshi Nakamoto",
                "3045022100fd567d121db66e382991534ada77a6bd3106f0a1098c231e47993447cd6af2d002206b39cd0eb1bc8603e159ef5c20a5c8ad685a45b06ce9bebed3f153d10d93bed5",
            ),
            (
                "f8b8af8ce3c7cca5e300d33939540c10d45ce001b8f252bfbc57ba0342904181",
                "Alan Turing",
                "304402207063ae83e7f62bbb171798131b4a0564b956930092b33b07b395615d9ec7e15c022058dfcc1e00a35e1572f366ffe34ba0fc47db1e7189759b9fb233c5b05ab388ea",
            ),
        ];

        for (key_hex, msg, expected_sig_hex) in &tests {
            let priv_key = PrivateKey::from_hex(key_hex).unwrap();
            let hash = sha256(msg.as_bytes());

            let sig = priv_key.sign(&hash).unwrap();
            assert_eq!(hex::encode(sig.to_der()), *expected_sig_hex, "message '{}'", msg);
            assert!(priv_key.pub_key().verify(&hash, &sig));
        }
    }

    /// Account key of the secp256k1 seed built from entropy 0x01..0x10.
    #[test]
    fn test_sign_sha512_half_digest() {
        let priv_key = PrivateKey::from_hex(
            "D78B9735C3F26501C7337B8A5727FD53A6EFDBC6AA55984F098488561F985E23",
        )
        .unwrap();
        let digest = sha512_half(b"hello world");
        let sig = priv_key.sign(&digest).unwrap();
        assert_eq!(
            sig.to_der_hex(),
            "30450221008F2077D0A2092C3E46FDD0783EDDBEE983323259F21DE781AE0E68220672175702204B50CC81EB1691D7CE0CE7D7E9F7518C10BA970223345480BC8BADA7A5B866BB"
        );
        assert!(sig.is_low_s());
        assert!(priv_key.pub_key().verify(&digest, &sig));

        let other = sha512_half(b"hello world!");
        assert!(!priv_key.pub_key().verify(&other, &sig));
    }

    #[test]
    fn test_sign_rejects_wrong_digest_length() {
        let priv_key = PrivateKey::new();
        assert!(matches!(
            priv_key.sign(b"short"),
            Err(PrimitivesError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_verify_rejects_high_s() {
        let priv_key = PrivateKey::new();
        let digest = sha512_half(b"malleable");
        let sig = priv_key.sign(&digest).unwrap();
        let flipped = Signature::new(*sig.r(), subtract_from_order(sig.s()));
        assert!(!flipped.is_low_s());
        assert!(!priv_key.pub_key().verify(&digest, &flipped));
    }

    #[test]
    fn test_signature_is_equal() {
        let sig1 = Signature::new(
            hex_to_32("4e45e16932b8af514961a1d3a1a25fdf3f4f7732e9d624c6c61548ab5fb8cd41"),
            hex_to_32("181522ec8eca07de4860a4acdd12909d831cc56cbbac4622082221a8768d1d09"),
        );
        let sig2 = Signature::new(
            hex_to_32("a196ed0e7ebcbe7b63fe1d8eecbdbde03a67ceba4fc8f6482bdcb9606a911404"),
            hex_to_32("971729c7fa944b465b35250c6570a2f31acbb14b13d1565fab7330dcb2b3dfb1"),
        );

        assert_eq!(sig1, sig1);
        assert_ne!(sig1, sig2);
    }

    fn hex_to_32(s: &str) -> [u8; 32] {
        let bytes = hex::decode(s).unwrap();
        let mut out = [0u8; 32];
        out[32 - bytes.len()..].copy_from_slice(&bytes);
        out
    }
}
