//! Tests for the xrpl-binary-codec crate.
//!
//! Covers whole-transaction encoding against known byte layouts, the
//! signing and multi-signing data, payment channel claims, transaction
//! identifiers and decoding of malformed input.

use serde_json::json;

use xrpl_address_codec::AccountId;

use crate::transaction::{
    decode, decode_object, encode, encode_for_multisigning, encode_for_signing,
    encode_for_signing_claim, transaction_id, HASH_PREFIX_TRANSACTION_SIGN,
};
use crate::types::{Amount, Currency, Value};
use crate::{decode_json, encode_json, BinaryCodecError, StObject};

// -----------------------------------------------------------------------
// Fixtures
// -----------------------------------------------------------------------

const ACCOUNT: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";
const DESTINATION: &str = "rKiCet8SdvWxPXnAgYarFUXMh1zCPz432Y";
const SIGNING_PUB_KEY: &str = "ED5F5AC8B98974A3CA843326D9B88CEBD0560177B973EE0B149F782CFAA06DC66A";

/// The signed payment built by `payment()`.
const PAYMENT_HEX: &str = "120000228000000024000000016140000000000003E868400000000000000A\
7321ED5F5AC8B98974A3CA843326D9B88CEBD0560177B973EE0B149F782CFAA06DC66A\
7440AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA\
8114B5F762798A53D543A014CAF8B297CFF8F2F937E8\
8314CED6E99370D5C00EF4EBF72567DA99F5661BFB3A";

/// `STX\0` followed by the payment without `TxnSignature`.
const PAYMENT_SIGNING_HEX: &str = "53545800120000228000000024000000016140000000000003E868400000000000000A\
7321ED5F5AC8B98974A3CA843326D9B88CEBD0560177B973EE0B149F782CFAA06DC66A\
8114B5F762798A53D543A014CAF8B297CFF8F2F937E8\
8314CED6E99370D5C00EF4EBF72567DA99F5661BFB3A";

const PAYMENT_MULTISIGNING_HEX: &str = "534D5400120000228000000024000000016140000000000003E868400000000000000A\
7300\
8114B5F762798A53D543A014CAF8B297CFF8F2F937E8\
8314CED6E99370D5C00EF4EBF72567DA99F5661BFB3A\
B5F762798A53D543A014CAF8B297CFF8F2F937E8";

const PAYMENT_ID: &str = "1E3AE8FC8065FE4DF8F7DEF115DC2106D2F744E6D81AC7F8F5C909B347EB1E63";

fn account(s: &str) -> AccountId {
    s.parse().unwrap()
}

fn payment() -> StObject {
    StObject::new()
        .with("TransactionType", Value::UInt16(0))
        .with("Flags", Value::UInt32(0x8000_0000))
        .with("Sequence", Value::UInt32(1))
        .with("Amount", Amount::Drops(1000))
        .with("Fee", Amount::Drops(10))
        .with("SigningPubKey", Value::Blob(hex::decode(SIGNING_PUB_KEY).unwrap()))
        .with("TxnSignature", Value::Blob(vec![0xAA; 64]))
        .with("Account", account(ACCOUNT))
        .with("Destination", account(DESTINATION))
}

// -----------------------------------------------------------------------
// Encoding
// -----------------------------------------------------------------------

#[test]
fn test_encode_payment() {
    let encoded = encode(&payment()).unwrap();
    assert_eq!(hex::encode_upper(&encoded), PAYMENT_HEX);
}

#[test]
fn test_encode_payment_from_json() {
    let tx = json!({
        "TransactionType": "Payment",
        "Flags": 2147483648u32,
        "Sequence": 1,
        "Amount": "1000",
        "Fee": "10",
        "SigningPubKey": SIGNING_PUB_KEY,
        "TxnSignature": "AA".repeat(64),
        "Account": ACCOUNT,
        "Destination": DESTINATION,
    });
    assert_eq!(encode_json(&tx).unwrap(), PAYMENT_HEX);
    assert_eq!(decode_json(PAYMENT_HEX).unwrap(), tx);
}

#[test]
fn test_encode_for_signing_drops_signature() {
    let signing = encode_for_signing(&payment()).unwrap();
    assert_eq!(&signing[..4], &HASH_PREFIX_TRANSACTION_SIGN);
    assert_eq!(hex::encode_upper(&signing), PAYMENT_SIGNING_HEX);

    // The signature never influences the signing data.
    let mut unsigned = payment();
    unsigned.remove("TxnSignature");
    assert_eq!(encode_for_signing(&unsigned).unwrap(), signing);
}

#[test]
fn test_encode_for_signing_keeps_nested_signatures() {
    let signer = StObject::new()
        .with("Account", account(DESTINATION))
        .with("SigningPubKey", Value::Blob(vec![0x02; 33]))
        .with("TxnSignature", Value::Blob(vec![0x30; 70]));
    let memo = StObject::new().with(
        "Memo",
        StObject::new().with("MemoData", Value::Blob(vec![0xAB])),
    );
    let mut tx = payment();
    tx.insert("Signers", Value::Array(vec![StObject::new().with("Signer", signer)]));
    tx.insert("Memos", Value::Array(vec![memo]));

    let full = encode(&tx).unwrap();
    let signing = encode_for_signing(&tx).unwrap();
    // Signers is dropped at the top level, Memos stays.
    let memos = hex::decode("F9EA7D01ABE1F1").unwrap();
    assert!(signing.windows(memos.len()).any(|w| w == memos.as_slice()));
    assert_eq!(signing.len(), PAYMENT_SIGNING_HEX.len() / 2 + memos.len());
    assert!(full.windows(memos.len()).any(|w| w == memos.as_slice()));
    assert_eq!(decode(&full).unwrap(), tx);
}

#[test]
fn test_encode_for_multisigning() {
    let mut tx = payment();
    tx.insert("SigningPubKey", Value::Blob(Vec::new()));
    tx.remove("TxnSignature");
    let signer = account(ACCOUNT);

    let data = encode_for_multisigning(&tx, &signer).unwrap();
    assert_eq!(hex::encode_upper(&data), PAYMENT_MULTISIGNING_HEX);
    assert_eq!(&data[data.len() - 20..], signer.as_bytes());

    // Different signers sign different data.
    let other = encode_for_multisigning(&tx, &account(DESTINATION)).unwrap();
    assert_ne!(data, other);
}

#[test]
fn test_encode_for_multisigning_rejects_signing_key() {
    let result = encode_for_multisigning(&payment(), &account(ACCOUNT));
    assert!(matches!(result, Err(BinaryCodecError::OutOfRange { ref field, .. }) if field == "SigningPubKey"));
}

#[test]
fn test_encode_for_multisigning_requires_empty_signing_key() {
    let mut tx = payment();
    tx.remove("SigningPubKey");
    tx.remove("TxnSignature");
    let result = encode_for_multisigning(&tx, &account(ACCOUNT));
    assert!(matches!(result, Err(BinaryCodecError::OutOfRange { ref field, .. }) if field == "SigningPubKey"));

    tx.insert("SigningPubKey", Value::Blob(Vec::new()));
    let data = encode_for_multisigning(&tx, &account(ACCOUNT)).unwrap();
    assert!(hex::encode_upper(&data).contains("7300"));
}

#[test]
fn test_encode_for_signing_claim() {
    let channel: [u8; 32] = hex::decode("43904CBFCDCEC530B4037871F86EE90BF799DF8D2E0EA564BC8A3F332E4F5FB1")
        .unwrap()
        .try_into()
        .unwrap();
    let data = encode_for_signing_claim(&channel, 1000).unwrap();
    assert_eq!(
        hex::encode_upper(data),
        "434C4D0043904CBFCDCEC530B4037871F86EE90BF799DF8D2E0EA564BC8A3F332E4F5FB100000000000003E8"
    );
    assert!(encode_for_signing_claim(&channel, 100_000_000_000_000_001).is_err());
}

#[test]
fn test_transaction_id() {
    let encoded = encode(&payment()).unwrap();
    assert_eq!(hex::encode_upper(transaction_id(&encoded)), PAYMENT_ID);
}

#[test]
fn test_encoding_ignores_insertion_order() {
    let forward = payment();
    let mut entries: Vec<(String, Value)> =
        forward.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    entries.reverse();
    let backward: StObject = entries.into_iter().collect();
    assert_eq!(encode(&forward).unwrap(), encode(&backward).unwrap());
}

#[test]
fn test_unknown_field_name_rejected() {
    let tx = payment().with("Colour", Value::UInt32(1));
    assert_eq!(encode(&tx), Err(BinaryCodecError::UnknownField("Colour".to_string())));
}

// -----------------------------------------------------------------------
// Decoding
// -----------------------------------------------------------------------

#[test]
fn test_decode_payment() {
    let bytes = hex::decode(PAYMENT_HEX).unwrap();
    let tx = decode(&bytes).unwrap();
    assert_eq!(tx, payment());
    assert_eq!(tx.get("Amount"), Some(&Value::Amount(Amount::Drops(1000))));
}

#[test]
fn test_decode_truncated_payment() {
    let bytes = hex::decode(PAYMENT_HEX).unwrap();
    for len in [1, 5, 12, 20, bytes.len() - 1] {
        assert!(decode(&bytes[..len]).is_err(), "prefix of {} bytes decoded", len);
    }
}

#[test]
fn test_decode_unknown_field_header() {
    // UInt32 field 200 is not defined.
    let bytes = hex::decode("20C800000001").unwrap();
    assert_eq!(
        decode(&bytes),
        Err(BinaryCodecError::UnknownFieldHeader {
            type_code: 2,
            field_code: 200
        })
    );
}

#[test]
fn test_decode_duplicate_field() {
    let bytes = hex::decode("24000000012400000002").unwrap();
    assert_eq!(
        decode(&bytes),
        Err(BinaryCodecError::DuplicateField("Sequence".to_string()))
    );
}

#[test]
fn test_decode_object_reports_consumed_bytes() {
    let mut bytes = hex::decode("2400000001E1").unwrap();
    bytes.extend_from_slice(&[0xDE, 0xAD]);
    let (object, consumed) = decode_object(&bytes).unwrap();
    assert_eq!(consumed, 6);
    assert_eq!(object.get("Sequence"), Some(&Value::UInt32(1)));
}

#[test]
fn test_issued_amount_in_transaction() {
    let usd = Currency::from_code("USD").unwrap();
    let tx = StObject::new()
        .with("TransactionType", Value::UInt16(20))
        .with("LimitAmount", Amount::issued("-1", usd, account(DESTINATION)).unwrap());
    let encoded = encode(&tx).unwrap();
    let hex_str = hex::encode_upper(&encoded);
    assert!(hex_str.starts_with("12001463"), "{}", hex_str);
    assert!(hex_str.contains("94838D7EA4C68000"));
    assert_eq!(decode(&encoded).unwrap(), tx);
}
