/// XRPL SDK - Cryptographic primitives, hashing, and utilities.
///
/// This crate provides the foundational building blocks for the XRPL SDK:
/// - Hash functions (SHA-256, SHA-256d, SHA-512, SHA-512Half, RIPEMD-160, Hash160)
/// - Base58 encoding/decoding with the XRP Ledger alphabet
/// - Big-endian binary reader/writer and the variable-length prefix codec
/// - secp256k1 keys, deterministic ECDSA, and the DER signature codec
/// - Ed25519 keys and signatures

pub mod hash;
pub mod util;
pub mod base58;
pub mod ec;
pub mod ed25519;

mod error;
pub use error::PrimitivesError;
