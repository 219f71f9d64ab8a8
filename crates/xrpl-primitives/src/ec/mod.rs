//! Elliptic curve cryptography on secp256k1.
//!
//! Private keys with scalar addition, compressed public keys, deterministic
//! ECDSA and the strict DER signature codec.

pub mod private_key;
pub mod public_key;
pub mod signature;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
pub use signature::Signature;
