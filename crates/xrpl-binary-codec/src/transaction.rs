//! Transaction-level entry points: full encoding, the bytes that get signed,
//! and transaction identifiers.
//!
//! Signing data always starts with a 4-byte hash prefix so a signature over
//! one kind of message can never be replayed as a signature over another.

use tracing::debug;

use xrpl_address_codec::AccountId;
use xrpl_primitives::hash::sha512_half_parts;
use xrpl_primitives::util::{BinaryReader, BinaryWriter};

use crate::definitions::Definitions;
use crate::st_object::StObject;
use crate::types::amount::MAX_DROPS;
use crate::types::Value;
use crate::BinaryCodecError;

/// `TXN\0`: transaction identifier.
pub const HASH_PREFIX_TRANSACTION_ID: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

/// `STX\0`: single-signer signing data.
pub const HASH_PREFIX_TRANSACTION_SIGN: [u8; 4] = [0x53, 0x54, 0x58, 0x00];

/// `SMT\0`: multi-signer signing data.
pub const HASH_PREFIX_TRANSACTION_MULTISIGN: [u8; 4] = [0x53, 0x4D, 0x54, 0x00];

/// `CLM\0`: payment channel claim.
pub const HASH_PREFIX_PAYMENT_CHANNEL_CLAIM: [u8; 4] = [0x43, 0x4C, 0x4D, 0x00];

/// Encode every serialized field of `object`.
pub fn encode(object: &StObject) -> Result<Vec<u8>, BinaryCodecError> {
    encode_with_definitions(object, Definitions::global())
}

pub fn encode_with_definitions(object: &StObject, defs: &Definitions) -> Result<Vec<u8>, BinaryCodecError> {
    let mut writer = BinaryWriter::new();
    object.write_to(&mut writer, defs, false)?;
    debug!(fields = object.len(), bytes = writer.len(), "encoded object");
    Ok(writer.into_bytes())
}

/// Single-signer signing data: `STX\0` followed by the signing fields.
pub fn encode_for_signing(object: &StObject) -> Result<Vec<u8>, BinaryCodecError> {
    encode_for_signing_with_definitions(object, Definitions::global())
}

pub fn encode_for_signing_with_definitions(
    object: &StObject,
    defs: &Definitions,
) -> Result<Vec<u8>, BinaryCodecError> {
    let mut writer = BinaryWriter::new();
    writer.write_bytes(&HASH_PREFIX_TRANSACTION_SIGN);
    object.write_to(&mut writer, defs, true)?;
    debug!(bytes = writer.len(), "encoded signing data");
    Ok(writer.into_bytes())
}

/// Multi-signer signing data: `SMT\0`, the signing fields, then the
/// signer's raw 20-byte account id.
///
/// # Returns
/// An error unless `SigningPubKey` is present and empty; multi-signed
/// transactions carry their keys in `Signers` instead.
pub fn encode_for_multisigning(object: &StObject, signer: &AccountId) -> Result<Vec<u8>, BinaryCodecError> {
    encode_for_multisigning_with_definitions(object, signer, Definitions::global())
}

pub fn encode_for_multisigning_with_definitions(
    object: &StObject,
    signer: &AccountId,
    defs: &Definitions,
) -> Result<Vec<u8>, BinaryCodecError> {
    match object.get("SigningPubKey") {
        Some(Value::Blob(key)) if key.is_empty() => {}
        _ => {
            return Err(BinaryCodecError::OutOfRange {
                field: "SigningPubKey".to_string(),
                reason: "must be present and empty when multi-signing".to_string(),
            })
        }
    }
    let mut writer = BinaryWriter::new();
    writer.write_bytes(&HASH_PREFIX_TRANSACTION_MULTISIGN);
    object.write_to(&mut writer, defs, true)?;
    writer.write_bytes(signer.as_bytes());
    debug!(signer = %signer, bytes = writer.len(), "encoded multi-signing data");
    Ok(writer.into_bytes())
}

/// Payment channel claim data: `CLM\0`, the channel id, and the drop
/// amount as a big-endian u64.
pub fn encode_for_signing_claim(channel: &[u8; 32], drops: u64) -> Result<Vec<u8>, BinaryCodecError> {
    if drops > MAX_DROPS {
        return Err(BinaryCodecError::OutOfRange {
            field: "Amount".to_string(),
            reason: format!("{} drops exceeds the maximum of {}", drops, MAX_DROPS),
        });
    }
    let mut writer = BinaryWriter::with_capacity(4 + 32 + 8);
    writer.write_bytes(&HASH_PREFIX_PAYMENT_CHANNEL_CLAIM);
    writer.write_bytes(channel);
    writer.write_u64_be(drops);
    Ok(writer.into_bytes())
}

/// Decode a complete object; every byte must belong to it.
pub fn decode(bytes: &[u8]) -> Result<StObject, BinaryCodecError> {
    decode_with_definitions(bytes, Definitions::global())
}

pub fn decode_with_definitions(bytes: &[u8], defs: &Definitions) -> Result<StObject, BinaryCodecError> {
    let mut reader = BinaryReader::new(bytes);
    let object = StObject::read_from(&mut reader, defs)?;
    debug!(fields = object.len(), bytes = bytes.len(), "decoded object");
    Ok(object)
}

/// Decode one `ObjectEndMarker`-terminated object from the front of `bytes`.
///
/// # Returns
/// The object and the number of bytes consumed, end marker included.
pub fn decode_object(bytes: &[u8]) -> Result<(StObject, usize), BinaryCodecError> {
    let mut reader = BinaryReader::new(bytes);
    let object = StObject::read_nested(&mut reader, Definitions::global())?;
    Ok((object, reader.position()))
}

/// Transaction identifier: `sha512_half(TXN\0 || bytes)`.
pub fn transaction_id(encoded: &[u8]) -> [u8; 32] {
    sha512_half_parts(&[&HASH_PREFIX_TRANSACTION_ID, encoded])
}
