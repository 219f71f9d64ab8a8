//! Build, sign, encode and decode a payment through the umbrella crate.

use serde_json::json;

use xrpl_sdk::address_codec::{classic_address_to_x_address, AccountId};
use xrpl_sdk::binary_codec::{
    decode, decode_json, encode, encode_for_signing, encode_json, transaction_id, Amount, StObject, Value,
};
use xrpl_sdk::keypairs::{derive_keypair, verify, KeyType};

const SEED: &str = "sEdSMVV4dJ1JbdBxmakRR4Puu3XVZz2";
const ADDRESS: &str = "rMKx3jok74TheeXQLVyhTVqJgNEMiSYb7s";
const PUBLIC_KEY: &str = "ED7E5EA223511E0E7ED5C1828C15ACA28A600CB5F8CBBB111B24746FF2E4615AC1";
const DESTINATION: &str = "rDTXLQ7ZKZVKz33zJbHjgVShjsBnqMBhmN";

#[test]
fn test_sign_and_submit_shape() {
    let keypair = derive_keypair(SEED).unwrap();
    assert_eq!(keypair.key_type(), KeyType::Ed25519);
    assert_eq!(keypair.public_key_hex(), PUBLIC_KEY);
    assert_eq!(keypair.address(), ADDRESS);

    let payment = StObject::new()
        .with("TransactionType", Value::UInt16(0))
        .with("Account", keypair.account_id())
        .with("Destination", DESTINATION.parse::<AccountId>().unwrap())
        .with("Amount", Amount::drops(100_000_000).unwrap())
        .with("Fee", Amount::drops(12).unwrap())
        .with("Sequence", Value::UInt32(7))
        .with("SigningPubKey", Value::Blob(keypair.public_key_bytes().to_vec()));

    let signing_data = encode_for_signing(&payment).unwrap();
    let signature = keypair.sign(&signing_data).unwrap();
    let signed = payment.clone().with("TxnSignature", Value::Blob(signature.clone()));

    let blob = encode(&signed).unwrap();
    let decoded = decode(&blob).unwrap();
    assert_eq!(decoded, signed);

    // A verifier only needs the blob.
    assert_eq!(encode_for_signing(&decoded).unwrap(), signing_data);
    assert!(verify(&signing_data, PUBLIC_KEY, &hex::encode_upper(&signature)));
    assert_ne!(transaction_id(&blob), transaction_id(&encode(&payment).unwrap()));
}

#[test]
fn test_json_payment_with_x_address_destination() {
    let x_destination = classic_address_to_x_address(DESTINATION, Some(42), false).unwrap();

    let tx = json!({
        "TransactionType": "Payment",
        "Account": ADDRESS,
        "Destination": x_destination,
        "Amount": "100000000",
        "Fee": "12",
        "Sequence": 7,
    });
    let blob = encode_json(&tx).unwrap();
    let decoded = decode_json(&blob).unwrap();
    assert_eq!(decoded["Destination"], DESTINATION);
    assert_eq!(decoded["DestinationTag"], 42);
    assert_eq!(decoded["Amount"], "100000000");
}
