/// XRPL SDK - Canonical binary serialization.
///
/// Provides the field definition registry, the wire types, the STObject
/// codec and the transaction-level entry points: full encoding, signing
/// data for single and multi-signers, payment channel claims, transaction
/// identifiers, and conversion to and from the JSON transaction format.

pub mod definitions;
pub mod types;
pub mod st_object;
pub mod transaction;
pub mod json;

mod error;
pub use error::BinaryCodecError;
pub use definitions::{Definitions, FieldHeader, FieldInstance, FieldType};
pub use json::{decode_json, encode_json};
pub use st_object::StObject;
pub use transaction::{
    decode, decode_object, encode, encode_for_multisigning, encode_for_signing,
    encode_for_signing_claim, transaction_id,
};
pub use types::{Amount, Currency, Issue, PathSet, PathStep, Value, XChainBridge};

#[cfg(test)]
mod tests;
