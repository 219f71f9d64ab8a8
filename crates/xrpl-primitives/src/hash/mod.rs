//! Hash function primitives for the XRPL SDK.
//!
//! Provides SHA-256, double SHA-256, SHA-512, SHA-512Half, RIPEMD-160 and
//! Hash160. SHA-512Half is the ledger's workhorse: transaction ids, signing
//! digests and secp256k1 scalar derivation all use it. Double SHA-256 is
//! only used for Base58Check checksums.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256, Sha512};

/// Length of a SHA-512Half digest in bytes.
pub const SHA512_HALF_LEN: usize = 32;

/// Compute SHA-256 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte SHA-256 digest.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute double SHA-256 (SHA-256d) hash of the input data.
///
/// Used for the 4-byte checksum of Base58Check strings.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte double-SHA-256 digest.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute RIPEMD-160 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte RIPEMD-160 digest.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    let mut hasher = Ripemd160::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute Hash160: RIPEMD-160(SHA-256(data)).
///
/// Applied to a 33-byte public key this yields the 20-byte account id.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 20-byte Hash160 digest.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

/// Compute SHA-512 hash of the input data.
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 64-byte SHA-512 digest.
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 64];
    output.copy_from_slice(&result);
    output
}

/// Compute SHA-512Half: the first 32 bytes of SHA-512(data).
///
/// # Arguments
/// * `data` - Byte slice to hash.
///
/// # Returns
/// A 32-byte digest.
pub fn sha512_half(data: &[u8]) -> [u8; SHA512_HALF_LEN] {
    let full = sha512(data);
    let mut out = [0u8; SHA512_HALF_LEN];
    out.copy_from_slice(&full[..SHA512_HALF_LEN]);
    out
}

/// Compute SHA-512Half over several byte slices fed in order.
///
/// Equivalent to `sha512_half(&[a, b, ...].concat())` without the copy.
pub fn sha512_half_parts(parts: &[&[u8]]) -> [u8; SHA512_HALF_LEN] {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part);
    }
    let full = hasher.finalize();
    let mut out = [0u8; SHA512_HALF_LEN];
    out.copy_from_slice(&full[..SHA512_HALF_LEN]);
    out
}
