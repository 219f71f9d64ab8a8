//! Conversion between the network's JSON transaction format and `StObject`.
//!
//! | type              | JSON                                              |
//! |-------------------|---------------------------------------------------|
//! | UInt8/16/32       | number; type and result codes by name             |
//! | UInt64            | hex string                                        |
//! | Hash*, Blob       | hex string                                        |
//! | AccountID         | classic address (X-address for Account/Destination)|
//! | Amount            | drops as a decimal string, or `{currency, issuer, value}` |
//! | STObject / STArray| object / array of single-key objects              |
//!
//! An X-address under `Account` or `Destination` is split into the classic
//! address and its tag, which lands in `SourceTag` or `DestinationTag`.

use serde_json::{json, Map, Value as JsonValue};

use xrpl_address_codec::{AccountId, XAddress};

use crate::definitions::{CodeMap, Definitions, FieldInstance, FieldType};
use crate::st_object::{StObject, MAX_DEPTH};
use crate::transaction::{decode_with_definitions, encode_with_definitions};
use crate::types::{
    Amount, Currency, Issue, IssuedAmount, PathSet, PathStep, Value, XChainBridge,
};
use crate::BinaryCodecError;

impl StObject {
    /// Build an object from its JSON form using the embedded definitions.
    pub fn from_json(json: &JsonValue) -> Result<Self, BinaryCodecError> {
        Self::from_json_with_definitions(json, Definitions::global())
    }

    pub fn from_json_with_definitions(json: &JsonValue, defs: &Definitions) -> Result<Self, BinaryCodecError> {
        object_from_json(json, defs, 0)
    }

    /// Render the object in JSON form using the embedded definitions.
    pub fn to_json(&self) -> Result<JsonValue, BinaryCodecError> {
        self.to_json_with_definitions(Definitions::global())
    }

    pub fn to_json_with_definitions(&self, defs: &Definitions) -> Result<JsonValue, BinaryCodecError> {
        object_to_json(self, defs)
    }
}

/// Encode a JSON transaction to uppercase hex.
pub fn encode_json(json: &JsonValue) -> Result<String, BinaryCodecError> {
    let defs = Definitions::global();
    let object = StObject::from_json_with_definitions(json, defs)?;
    Ok(hex::encode_upper(encode_with_definitions(&object, defs)?))
}

/// Decode a hex blob to its JSON form.
pub fn decode_json(hex_str: &str) -> Result<JsonValue, BinaryCodecError> {
    let defs = Definitions::global();
    let bytes = hex::decode(hex_str)?;
    decode_with_definitions(&bytes, defs)?.to_json_with_definitions(defs)
}

// ---------------------------------------------------------------------------
// JSON -> StObject
// ---------------------------------------------------------------------------

fn invalid(field: &str, reason: impl std::fmt::Display) -> BinaryCodecError {
    BinaryCodecError::InvalidJson(format!("{}: {}", field, reason))
}

fn object_from_json(json: &JsonValue, defs: &Definitions, depth: usize) -> Result<StObject, BinaryCodecError> {
    if depth > MAX_DEPTH {
        return Err(BinaryCodecError::DepthExceeded(MAX_DEPTH));
    }
    let map = json
        .as_object()
        .ok_or_else(|| BinaryCodecError::InvalidJson("expected an object".to_string()))?;

    let mut object = StObject::new();
    let mut tags: Vec<(&'static str, u32)> = Vec::new();

    for (name, value) in map {
        let field = defs.field(name)?;
        if field.field_type == FieldType::AccountId {
            let (account, tag) = account_from_json(name, value)?;
            if let Some(tag) = tag {
                let tag_field = match name.as_str() {
                    "Account" => "SourceTag",
                    "Destination" => "DestinationTag",
                    _ => return Err(invalid(name, "this field cannot carry a tag")),
                };
                tags.push((tag_field, tag));
            }
            object.insert(name.clone(), Value::AccountId(account));
            continue;
        }
        object.insert(name.clone(), value_from_json(field, value, defs, depth)?);
    }

    for (tag_field, tag) in tags {
        if map.contains_key(tag_field) {
            return Err(invalid(tag_field, "given both explicitly and through an X-address"));
        }
        object.insert(tag_field, Value::UInt32(tag));
    }
    Ok(object)
}

/// A classic address, 40 hex characters, or an X-address with its tag.
fn account_from_json(field: &str, json: &JsonValue) -> Result<(AccountId, Option<u32>), BinaryCodecError> {
    let s = json.as_str().ok_or_else(|| invalid(field, "expected an address string"))?;
    if s.len() == 40 && s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Ok((AccountId::from_hex(s)?, None));
    }
    if s.starts_with('X') || s.starts_with('T') {
        let x = XAddress::decode(s)?;
        return Ok((x.account_id, x.tag));
    }
    Ok((AccountId::from_classic_address(s)?, None))
}

fn plain_account(field: &str, json: &JsonValue) -> Result<AccountId, BinaryCodecError> {
    match account_from_json(field, json)? {
        (account, None) => Ok(account),
        (_, Some(_)) => Err(invalid(field, "this field cannot carry a tag")),
    }
}

fn code_table<'a>(defs: &'a Definitions, field: &str) -> Option<&'a CodeMap> {
    match field {
        "TransactionType" => Some(defs.transaction_types()),
        "LedgerEntryType" => Some(defs.ledger_entry_types()),
        "TransactionResult" => Some(defs.transaction_results()),
        _ => None,
    }
}

fn uint_from_json(field: &FieldInstance, json: &JsonValue, defs: &Definitions, max: u64) -> Result<u64, BinaryCodecError> {
    let n = match json {
        JsonValue::Number(n) => n.as_u64().ok_or_else(|| invalid(&field.name, "expected an unsigned integer"))?,
        JsonValue::String(s) => match code_table(defs, &field.name).and_then(|t| t.code(s)) {
            Some(code) => u64::try_from(code).map_err(|_| invalid(&field.name, format!("{} has code {}", s, code)))?,
            None if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                s.parse().map_err(|_| invalid(&field.name, "integer overflow"))?
            }
            None => {
                return Err(BinaryCodecError::UnknownName {
                    kind: "code name",
                    value: s.clone(),
                })
            }
        },
        _ => return Err(invalid(&field.name, "expected a number")),
    };
    if n > max {
        return Err(BinaryCodecError::OutOfRange {
            field: field.name.clone(),
            reason: format!("{} does not fit in {}", n, field.field_type),
        });
    }
    Ok(n)
}

fn hex_from_json<const N: usize>(field: &str, json: &JsonValue) -> Result<[u8; N], BinaryCodecError> {
    let s = json.as_str().ok_or_else(|| invalid(field, "expected a hex string"))?;
    let mut out = [0u8; N];
    hex::decode_to_slice(s, &mut out).map_err(|e| invalid(field, e))?;
    Ok(out)
}

fn str_from_json<'a>(field: &str, json: &'a JsonValue, key: &str) -> Result<&'a str, BinaryCodecError> {
    json.get(key)
        .and_then(JsonValue::as_str)
        .ok_or_else(|| invalid(field, format!("missing string {:?}", key)))
}

fn amount_from_json(field: &str, json: &JsonValue) -> Result<Amount, BinaryCodecError> {
    match json {
        JsonValue::String(s) => {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(field, "native amounts are whole drops"));
            }
            let drops = s.parse().map_err(|_| invalid(field, "drops overflow"))?;
            Amount::drops(drops)
        }
        JsonValue::Object(_) => {
            let currency = Currency::from_code(str_from_json(field, json, "currency")?)?;
            let issuer = plain_account(field, &json["issuer"])?;
            Amount::issued(str_from_json(field, json, "value")?, currency, issuer)
        }
        _ => Err(invalid(field, "expected a string or an object")),
    }
}

fn issue_from_json(field: &str, json: &JsonValue) -> Result<Issue, BinaryCodecError> {
    let currency = Currency::from_code(str_from_json(field, json, "currency")?)?;
    match json.get("issuer") {
        None if currency.is_native() => Ok(Issue::Xrp),
        None => Err(invalid(field, "issued currency needs an issuer")),
        Some(issuer) => Issue::issued(currency, plain_account(field, issuer)?),
    }
}

fn path_set_from_json(field: &str, json: &JsonValue) -> Result<PathSet, BinaryCodecError> {
    let paths = json.as_array().ok_or_else(|| invalid(field, "expected an array of paths"))?;
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let steps = path.as_array().ok_or_else(|| invalid(field, "expected an array of steps"))?;
        let mut parsed = Vec::with_capacity(steps.len());
        for step in steps {
            let account = step.get("account").map(|a| plain_account(field, a)).transpose()?;
            let currency = step
                .get("currency")
                .map(|c| {
                    c.as_str()
                        .ok_or_else(|| invalid(field, "currency must be a string"))
                        .and_then(Currency::from_code)
                })
                .transpose()?;
            let issuer = step.get("issuer").map(|i| plain_account(field, i)).transpose()?;
            parsed.push(PathStep {
                account,
                currency,
                issuer,
            });
        }
        out.push(parsed);
    }
    Ok(PathSet(out))
}

fn value_from_json(
    field: &FieldInstance,
    json: &JsonValue,
    defs: &Definitions,
    depth: usize,
) -> Result<Value, BinaryCodecError> {
    let name = field.name.as_str();
    let value = match field.field_type {
        FieldType::UInt8 => Value::UInt8(uint_from_json(field, json, defs, u8::MAX.into())? as u8),
        FieldType::UInt16 => Value::UInt16(uint_from_json(field, json, defs, u16::MAX.into())? as u16),
        FieldType::UInt32 => Value::UInt32(uint_from_json(field, json, defs, u32::MAX.into())? as u32),
        FieldType::UInt64 => match json {
            JsonValue::String(s) if !s.is_empty() && s.len() <= 16 && s.bytes().all(|b| b.is_ascii_hexdigit()) => {
                Value::UInt64(u64::from_str_radix(s, 16).map_err(|e| invalid(name, e))?)
            }
            _ => return Err(invalid(name, "expected up to 16 hex characters")),
        },
        FieldType::Hash128 => Value::Hash128(hex_from_json(name, json)?),
        FieldType::Hash160 => Value::Hash160(hex_from_json(name, json)?),
        FieldType::Hash192 => Value::Hash192(hex_from_json(name, json)?),
        FieldType::Hash256 => Value::Hash256(hex_from_json(name, json)?),
        FieldType::Amount => Value::Amount(amount_from_json(name, json)?),
        FieldType::Blob => {
            let s = json.as_str().ok_or_else(|| invalid(name, "expected a hex string"))?;
            Value::Blob(hex::decode(s)?)
        }
        FieldType::AccountId => Value::AccountId(plain_account(name, json)?),
        FieldType::StObject => Value::Object(object_from_json(json, defs, depth + 1)?),
        FieldType::StArray => {
            let items = json.as_array().ok_or_else(|| invalid(name, "expected an array"))?;
            let mut elements = Vec::with_capacity(items.len());
            for item in items {
                let element = object_from_json(item, defs, depth + 1)?;
                if element.len() != 1 {
                    return Err(invalid(name, "array elements hold exactly one field"));
                }
                elements.push(element);
            }
            Value::Array(elements)
        }
        FieldType::PathSet => Value::PathSet(path_set_from_json(name, json)?),
        FieldType::Vector256 => {
            let items = json.as_array().ok_or_else(|| invalid(name, "expected an array of hashes"))?;
            let hashes = items
                .iter()
                .map(|h| hex_from_json::<32>(name, h))
                .collect::<Result<Vec<_>, _>>()?;
            Value::Vector256(hashes)
        }
        FieldType::Issue => Value::Issue(issue_from_json(name, json)?),
        FieldType::XChainBridge => Value::XChainBridge(XChainBridge {
            locking_chain_door: plain_account(name, &json["LockingChainDoor"])?,
            locking_chain_issue: issue_from_json(name, &json["LockingChainIssue"])?,
            issuing_chain_door: plain_account(name, &json["IssuingChainDoor"])?,
            issuing_chain_issue: issue_from_json(name, &json["IssuingChainIssue"])?,
        }),
        FieldType::Currency => {
            let s = json.as_str().ok_or_else(|| invalid(name, "expected a currency code"))?;
            Value::Currency(Currency::from_code(s)?)
        }
    };
    Ok(value)
}

// ---------------------------------------------------------------------------
// StObject -> JSON
// ---------------------------------------------------------------------------

fn object_to_json(object: &StObject, defs: &Definitions) -> Result<JsonValue, BinaryCodecError> {
    let mut map = Map::with_capacity(object.len());
    for (name, value) in object {
        map.insert(name.clone(), value_to_json(name, value, defs)?);
    }
    Ok(JsonValue::Object(map))
}

fn coded_to_json(defs: &Definitions, field: &str, n: u64) -> JsonValue {
    code_table(defs, field)
        .and_then(|t| t.name(n as i32))
        .map(|name| JsonValue::String(name.to_string()))
        .unwrap_or_else(|| json!(n))
}

fn issue_to_json(issue: &Issue) -> JsonValue {
    match issue {
        Issue::Xrp => json!({ "currency": "XRP" }),
        Issue::Issued { currency, issuer } => json!({
            "currency": currency.to_code(),
            "issuer": issuer.to_classic_address(),
        }),
    }
}

fn value_to_json(name: &str, value: &Value, defs: &Definitions) -> Result<JsonValue, BinaryCodecError> {
    let json = match value {
        Value::UInt8(v) => coded_to_json(defs, name, u64::from(*v)),
        Value::UInt16(v) => coded_to_json(defs, name, u64::from(*v)),
        Value::UInt32(v) => json!(v),
        Value::UInt64(v) => JsonValue::String(format!("{:016X}", v)),
        Value::Hash128(h) => JsonValue::String(hex::encode_upper(h)),
        Value::Hash160(h) => JsonValue::String(hex::encode_upper(h)),
        Value::Hash192(h) => JsonValue::String(hex::encode_upper(h)),
        Value::Hash256(h) => JsonValue::String(hex::encode_upper(h)),
        Value::Amount(Amount::Drops(d)) => JsonValue::String(d.to_string()),
        Value::Amount(Amount::Issued(IssuedAmount {
            value,
            currency,
            issuer,
        })) => json!({
            "currency": currency.to_code(),
            "issuer": issuer.to_classic_address(),
            "value": value.to_string(),
        }),
        Value::Blob(b) => JsonValue::String(hex::encode_upper(b)),
        Value::AccountId(a) => JsonValue::String(a.to_classic_address()),
        Value::Object(o) => object_to_json(o, defs)?,
        Value::Array(elements) => JsonValue::Array(
            elements
                .iter()
                .map(|e| object_to_json(e, defs))
                .collect::<Result<_, _>>()?,
        ),
        Value::PathSet(paths) => JsonValue::Array(
            paths
                .paths()
                .iter()
                .map(|path| {
                    JsonValue::Array(
                        path.iter()
                            .map(|step| {
                                let mut m = Map::new();
                                if let Some(a) = &step.account {
                                    m.insert("account".into(), a.to_classic_address().into());
                                }
                                if let Some(c) = &step.currency {
                                    m.insert("currency".into(), c.to_code().into());
                                }
                                if let Some(i) = &step.issuer {
                                    m.insert("issuer".into(), i.to_classic_address().into());
                                }
                                JsonValue::Object(m)
                            })
                            .collect(),
                    )
                })
                .collect(),
        ),
        Value::Vector256(hashes) => JsonValue::Array(
            hashes
                .iter()
                .map(|h| JsonValue::String(hex::encode_upper(h)))
                .collect(),
        ),
        Value::Issue(issue) => issue_to_json(issue),
        Value::XChainBridge(b) => json!({
            "LockingChainDoor": b.locking_chain_door.to_classic_address(),
            "LockingChainIssue": issue_to_json(&b.locking_chain_issue),
            "IssuingChainDoor": b.issuing_chain_door.to_classic_address(),
            "IssuingChainIssue": issue_to_json(&b.issuing_chain_issue),
        }),
        Value::Currency(c) => JsonValue::String(c.to_code()),
    };
    Ok(json)
}
