/// XRPL SDK - Key derivation and signing.
///
/// Turns family seeds into key pairs and signs with them:
/// - secp256k1 root, account and validator keys with deterministic ECDSA
/// - Ed25519 keys signing the raw message
/// - addresses of public keys and of validator node keys

mod error;
pub use error::KeypairError;

pub mod seed;
pub mod keypair;
pub mod secp256k1;
pub mod ed25519;

pub use keypair::{
    derive_address, derive_from_seed, derive_keypair, derive_keypair_with_index,
    derive_node_address, derive_validator_keypair, sign, verify, KeyPair, KeyScheme,
};
pub use seed::{generate_seed, Seed};
pub use xrpl_address_codec::KeyType;
