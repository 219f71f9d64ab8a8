//! Field definitions: the registry that maps every protocol field to its
//! wire type, field code and serialization flags.
//!
//! The registry is loaded once from the embedded `definitions.json` and is
//! immutable afterwards. Callers targeting a network with a different field
//! set build their own `Definitions` with [`Definitions::from_json`].

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use serde::Deserialize;
use tracing::{debug, trace};

use xrpl_primitives::util::{BinaryReader, BinaryWriter};

use crate::BinaryCodecError;

/// The definitions dataset shipped with the crate.
pub const DEFINITIONS_JSON: &str = include_str!("definitions.json");

static DEFAULT_DEFINITIONS: LazyLock<Definitions> = LazyLock::new(|| {
    Definitions::from_json(DEFINITIONS_JSON).expect("embedded definitions.json is valid")
});

/// Wire types known to the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Hash128,
    Hash160,
    Hash192,
    Hash256,
    Amount,
    Blob,
    AccountId,
    StObject,
    StArray,
    PathSet,
    Vector256,
    Issue,
    XChainBridge,
    Currency,
}

impl FieldType {
    /// Map a `TYPES` name from the definitions to a wire type.
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "UInt8" => FieldType::UInt8,
            "UInt16" => FieldType::UInt16,
            "UInt32" => FieldType::UInt32,
            "UInt64" => FieldType::UInt64,
            "Hash128" => FieldType::Hash128,
            "Hash160" => FieldType::Hash160,
            "Hash192" => FieldType::Hash192,
            "Hash256" => FieldType::Hash256,
            "Amount" => FieldType::Amount,
            "Blob" => FieldType::Blob,
            "AccountID" => FieldType::AccountId,
            "STObject" => FieldType::StObject,
            "STArray" => FieldType::StArray,
            "PathSet" => FieldType::PathSet,
            "Vector256" => FieldType::Vector256,
            "Issue" => FieldType::Issue,
            "XChainBridge" => FieldType::XChainBridge,
            "Currency" => FieldType::Currency,
            _ => return None,
        };
        Some(ty)
    }

    /// The type's name as it appears in the definitions.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::UInt8 => "UInt8",
            FieldType::UInt16 => "UInt16",
            FieldType::UInt32 => "UInt32",
            FieldType::UInt64 => "UInt64",
            FieldType::Hash128 => "Hash128",
            FieldType::Hash160 => "Hash160",
            FieldType::Hash192 => "Hash192",
            FieldType::Hash256 => "Hash256",
            FieldType::Amount => "Amount",
            FieldType::Blob => "Blob",
            FieldType::AccountId => "AccountID",
            FieldType::StObject => "STObject",
            FieldType::StArray => "STArray",
            FieldType::PathSet => "PathSet",
            FieldType::Vector256 => "Vector256",
            FieldType::Issue => "Issue",
            FieldType::XChainBridge => "XChainBridge",
            FieldType::Currency => "Currency",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// FieldHeader
// ---------------------------------------------------------------------------

/// A field's wire identity: its type code and its field code within that type.
///
/// Fields serialize in ascending `(type_code, field_code)` order, which is
/// the derived ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldHeader {
    pub type_code: u16,
    pub field_code: u16,
}

impl FieldHeader {
    /// A header from its type code and field code.
    pub fn new(type_code: u16, field_code: u16) -> Self {
        FieldHeader {
            type_code,
            field_code,
        }
    }

    /// Encode the header in 1 to 3 bytes.
    ///
    /// | type | field | bytes                          |
    /// |------|-------|--------------------------------|
    /// | < 16 | < 16  | `type << 4 \| field`           |
    /// | < 16 | >= 16 | `type << 4`, `field`           |
    /// | >= 16| < 16  | `field`, `type`                |
    /// | >= 16| >= 16 | `0`, `type`, `field`           |
    ///
    /// # Returns
    /// An error when either code is zero or does not fit in one byte.
    pub fn to_bytes(&self) -> Result<Vec<u8>, BinaryCodecError> {
        let (t, f) = (self.type_code, self.field_code);
        if t == 0 || f == 0 || t > 0xFF || f > 0xFF {
            return Err(BinaryCodecError::MalformedFieldHeader(format!(
                "type {} field {} has no wire encoding",
                t, f
            )));
        }
        let (t, f) = (t as u8, f as u8);
        Ok(match (t < 16, f < 16) {
            (true, true) => vec![(t << 4) | f],
            (true, false) => vec![t << 4, f],
            (false, true) => vec![f, t],
            (false, false) => vec![0, t, f],
        })
    }

    /// Append the header bytes to `writer`.
    pub fn write_to(&self, writer: &mut BinaryWriter) -> Result<(), BinaryCodecError> {
        writer.write_bytes(&self.to_bytes()?);
        Ok(())
    }

    /// Read a header, rejecting any encoding that is not the shortest form.
    pub fn read_from(reader: &mut BinaryReader) -> Result<Self, BinaryCodecError> {
        let first = reader.read_u8()?;
        let mut type_code = u16::from(first >> 4);
        let mut field_code = u16::from(first & 0x0F);

        if type_code == 0 {
            type_code = u16::from(reader.read_u8()?);
            if type_code < 16 {
                return Err(BinaryCodecError::MalformedFieldHeader(format!(
                    "type code {} should use the short form",
                    type_code
                )));
            }
        }
        if field_code == 0 {
            field_code = u16::from(reader.read_u8()?);
            if field_code < 16 {
                return Err(BinaryCodecError::MalformedFieldHeader(format!(
                    "field code {} should use the short form",
                    field_code
                )));
            }
        }
        Ok(FieldHeader {
            type_code,
            field_code,
        })
    }
}

impl fmt::Display for FieldHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.type_code, self.field_code)
    }
}

// ---------------------------------------------------------------------------
// FieldInstance
// ---------------------------------------------------------------------------

/// Everything the codec needs to know about one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInstance {
    pub name: String,
    pub header: FieldHeader,
    pub field_type: FieldType,
    /// Appears on the wire at all.
    pub is_serialized: bool,
    /// Included in the bytes that get signed.
    pub is_signing_field: bool,
    /// Value carries a length prefix.
    pub is_vl_encoded: bool,
}

impl FieldInstance {
    /// Canonical field order.
    pub fn ordinal_cmp(&self, other: &FieldInstance) -> Ordering {
        self.header.cmp(&other.header)
    }
}

// ---------------------------------------------------------------------------
// Definitions
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawDefinitions {
    types: HashMap<String, i32>,
    ledger_entry_types: HashMap<String, i32>,
    fields: Vec<(String, RawField)>,
    transaction_results: HashMap<String, i32>,
    transaction_types: HashMap<String, i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawField {
    nth: i32,
    #[serde(rename = "isVLEncoded")]
    is_vl_encoded: bool,
    is_serialized: bool,
    is_signing_field: bool,
    #[serde(rename = "type")]
    type_name: String,
}

/// A two-way map between names and numeric codes.
#[derive(Debug, Clone, Default)]
pub struct CodeMap {
    by_name: HashMap<String, i32>,
    by_code: HashMap<i32, String>,
}

impl CodeMap {
    fn from_map(map: HashMap<String, i32>) -> Self {
        let by_code = map.iter().map(|(k, v)| (*v, k.clone())).collect();
        CodeMap {
            by_name: map,
            by_code,
        }
    }

    /// Numeric code of `name`.
    pub fn code(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).copied()
    }

    /// Name registered for `code`.
    pub fn name(&self, code: i32) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// The field registry plus the transaction type, ledger entry type and
/// transaction result code tables.
#[derive(Debug, Clone)]
pub struct Definitions {
    fields_by_name: HashMap<String, FieldInstance>,
    names_by_header: HashMap<FieldHeader, String>,
    type_codes: CodeMap,
    transaction_types: CodeMap,
    ledger_entry_types: CodeMap,
    transaction_results: CodeMap,
}

impl Definitions {
    /// The embedded definitions, parsed on first use.
    pub fn global() -> &'static Definitions {
        &DEFAULT_DEFINITIONS
    }

    /// Parse a definitions document in the network's `definitions.json` layout.
    ///
    /// Fields that never reach the wire (not serialized, or of a type the
    /// codec does not implement) are registered by name only when they can
    /// be encoded; the rest are skipped.
    pub fn from_json(json: &str) -> Result<Self, BinaryCodecError> {
        let raw: RawDefinitions = serde_json::from_str(json)
            .map_err(|e| BinaryCodecError::InvalidDefinitions(e.to_string()))?;

        let mut fields_by_name = HashMap::with_capacity(raw.fields.len());
        let mut names_by_header = HashMap::with_capacity(raw.fields.len());

        for (name, field) in raw.fields {
            let Some(field_type) = FieldType::from_name(&field.type_name) else {
                trace!(field = %name, ty = %field.type_name, "skipping field of unsupported type");
                continue;
            };
            if !field.is_serialized || !(1..=0xFF).contains(&field.nth) {
                trace!(field = %name, "skipping field without a wire encoding");
                continue;
            }
            let type_code = raw
                .types
                .get(&field.type_name)
                .copied()
                .filter(|code| (1..=0xFF).contains(code))
                .ok_or_else(|| {
                    BinaryCodecError::InvalidDefinitions(format!(
                        "field {} has type {} without a type code",
                        name, field.type_name
                    ))
                })?;

            let header = FieldHeader::new(type_code as u16, field.nth as u16);
            if let Some(existing) = names_by_header.insert(header, name.clone()) {
                return Err(BinaryCodecError::InvalidDefinitions(format!(
                    "fields {} and {} share header {}",
                    existing, name, header
                )));
            }
            fields_by_name.insert(
                name.clone(),
                FieldInstance {
                    name,
                    header,
                    field_type,
                    is_serialized: field.is_serialized,
                    is_signing_field: field.is_signing_field,
                    is_vl_encoded: field.is_vl_encoded,
                },
            );
        }

        debug!(
            fields = fields_by_name.len(),
            transaction_types = raw.transaction_types.len(),
            "loaded field definitions"
        );

        Ok(Definitions {
            fields_by_name,
            names_by_header,
            type_codes: CodeMap::from_map(raw.types),
            transaction_types: CodeMap::from_map(raw.transaction_types),
            ledger_entry_types: CodeMap::from_map(raw.ledger_entry_types),
            transaction_results: CodeMap::from_map(raw.transaction_results),
        })
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Result<&FieldInstance, BinaryCodecError> {
        self.fields_by_name
            .get(name)
            .ok_or_else(|| BinaryCodecError::UnknownField(name.to_string()))
    }

    /// Look up a field by its wire header.
    pub fn field_by_header(&self, header: FieldHeader) -> Result<&FieldInstance, BinaryCodecError> {
        self.names_by_header
            .get(&header)
            .and_then(|name| self.fields_by_name.get(name))
            .ok_or(BinaryCodecError::UnknownFieldHeader {
                type_code: header.type_code,
                field_code: header.field_code,
            })
    }

    /// Header of the field named `name`.
    pub fn field_header(&self, name: &str) -> Result<FieldHeader, BinaryCodecError> {
        Ok(self.field(name)?.header)
    }

    /// Number of fields with a wire encoding.
    pub fn field_count(&self) -> usize {
        self.fields_by_name.len()
    }

    /// Wire type names and their type codes.
    pub fn type_codes(&self) -> &CodeMap {
        &self.type_codes
    }

    /// Transaction type names and their codes.
    pub fn transaction_types(&self) -> &CodeMap {
        &self.transaction_types
    }

    /// Ledger entry type names and their codes.
    pub fn ledger_entry_types(&self) -> &CodeMap {
        &self.ledger_entry_types
    }

    /// Transaction result names and their codes.
    pub fn transaction_results(&self) -> &CodeMap {
        &self.transaction_results
    }

    /// Numeric code of a transaction type name.
    pub fn transaction_type_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        lookup_code(&self.transaction_types, "transaction type", name)
    }

    /// Name of a transaction type code.
    pub fn transaction_type_name(&self, code: i32) -> Result<&str, BinaryCodecError> {
        lookup_name(&self.transaction_types, "transaction type", code)
    }

    /// Numeric code of a ledger entry type name.
    pub fn ledger_entry_type_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        lookup_code(&self.ledger_entry_types, "ledger entry type", name)
    }

    /// Name of a ledger entry type code.
    pub fn ledger_entry_type_name(&self, code: i32) -> Result<&str, BinaryCodecError> {
        lookup_name(&self.ledger_entry_types, "ledger entry type", code)
    }

    /// Numeric code of a transaction result name.
    pub fn transaction_result_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        lookup_code(&self.transaction_results, "transaction result", name)
    }

    /// Name of a transaction result code.
    pub fn transaction_result_name(&self, code: i32) -> Result<&str, BinaryCodecError> {
        lookup_name(&self.transaction_results, "transaction result", code)
    }
}

fn lookup_code(map: &CodeMap, kind: &'static str, name: &str) -> Result<i32, BinaryCodecError> {
    map.code(name).ok_or_else(|| BinaryCodecError::UnknownName {
        kind,
        value: name.to_string(),
    })
}

fn lookup_name<'a>(map: &'a CodeMap, kind: &'static str, code: i32) -> Result<&'a str, BinaryCodecError> {
    map.name(code).ok_or_else(|| BinaryCodecError::UnknownName {
        kind,
        value: code.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(name: &str) -> Vec<u8> {
        Definitions::global().field_header(name).unwrap().to_bytes().unwrap()
    }

    #[test]
    fn test_known_field_headers() {
        let cases: [(&str, &[u8]); 14] = [
            ("TransactionType", &[0x12]),
            ("Flags", &[0x22]),
            ("Sequence", &[0x24]),
            ("LastLedgerSequence", &[0x20, 0x1B]),
            ("Amount", &[0x61]),
            ("Fee", &[0x68]),
            ("SigningPubKey", &[0x73]),
            ("TxnSignature", &[0x74]),
            ("Account", &[0x81]),
            ("Destination", &[0x83]),
            ("Memo", &[0xEA]),
            ("Signer", &[0xE0, 0x10]),
            ("TickSize", &[0x00, 0x10, 0x10]),
            ("TransactionResult", &[0x03, 0x10]),
        ];
        for (name, expected) in cases {
            assert_eq!(header_bytes(name), expected, "{}", name);
        }
        assert_eq!(header_bytes("ObjectEndMarker"), [0xE1]);
        assert_eq!(header_bytes("ArrayEndMarker"), [0xF1]);
    }

    #[test]
    fn test_header_read_back() {
        for name in ["Sequence", "LastLedgerSequence", "TickSize", "TransactionResult", "Paths"] {
            let header = Definitions::global().field_header(name).unwrap();
            let bytes = header.to_bytes().unwrap();
            let mut reader = BinaryReader::new(&bytes);
            assert_eq!(FieldHeader::read_from(&mut reader).unwrap(), header);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_non_canonical_header_rejected() {
        // Type 2 written with the escape byte.
        let mut reader = BinaryReader::new(&[0x04, 0x02]);
        assert!(matches!(
            FieldHeader::read_from(&mut reader),
            Err(BinaryCodecError::MalformedFieldHeader(_))
        ));
        let mut reader = BinaryReader::new(&[0x20, 0x04]);
        assert!(matches!(
            FieldHeader::read_from(&mut reader),
            Err(BinaryCodecError::MalformedFieldHeader(_))
        ));
        let mut reader = BinaryReader::new(&[0x00]);
        assert!(FieldHeader::read_from(&mut reader).is_err());
    }

    #[test]
    fn test_lookup_by_name_and_header() {
        let defs = Definitions::global();
        let account = defs.field("Account").unwrap();
        assert_eq!(account.field_type, FieldType::AccountId);
        assert!(account.is_vl_encoded);
        assert!(account.is_signing_field);
        assert_eq!(defs.field_by_header(account.header).unwrap().name, "Account");

        assert!(!defs.field("TxnSignature").unwrap().is_signing_field);
        assert!(!defs.field("Signers").unwrap().is_signing_field);

        assert_eq!(
            defs.field("NotAField"),
            Err(BinaryCodecError::UnknownField("NotAField".to_string()))
        );
        assert_eq!(
            defs.field_by_header(FieldHeader::new(2, 200)),
            Err(BinaryCodecError::UnknownFieldHeader {
                type_code: 2,
                field_code: 200
            })
        );
        // Not serialized, so never on the wire.
        assert!(defs.field("hash").is_err());
    }

    #[test]
    fn test_canonical_ordering() {
        let defs = Definitions::global();
        let mut names = vec!["Fee", "Account", "TransactionType", "Flags", "Amount", "TickSize"];
        names.sort_by(|a, b| {
            defs.field(a)
                .unwrap()
                .ordinal_cmp(defs.field(b).unwrap())
        });
        assert_eq!(
            names,
            ["TransactionType", "Flags", "Amount", "Fee", "Account", "TickSize"]
        );
    }

    #[test]
    fn test_code_tables() {
        let defs = Definitions::global();
        assert_eq!(defs.transaction_type_code("Payment").unwrap(), 0);
        assert_eq!(defs.transaction_type_name(20).unwrap(), "TrustSet");
        assert_eq!(defs.ledger_entry_type_code("AccountRoot").unwrap(), 97);
        assert_eq!(defs.transaction_result_name(0).unwrap(), "tesSUCCESS");
        assert_eq!(defs.type_codes().code("STObject"), Some(14));
        assert!(matches!(
            defs.transaction_type_code("Teleport"),
            Err(BinaryCodecError::UnknownName { .. })
        ));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            Definitions::from_json("{}"),
            Err(BinaryCodecError::InvalidDefinitions(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_duplicate_headers() {
        let json = r#"{
            "TYPES": {"UInt32": 2},
            "LEDGER_ENTRY_TYPES": {},
            "TRANSACTION_RESULTS": {},
            "TRANSACTION_TYPES": {},
            "FIELDS": [
                ["A", {"nth": 1, "isVLEncoded": false, "isSerialized": true, "isSigningField": true, "type": "UInt32"}],
                ["B", {"nth": 1, "isVLEncoded": false, "isSerialized": true, "isSigningField": true, "type": "UInt32"}]
            ]
        }"#;
        assert!(matches!(
            Definitions::from_json(json),
            Err(BinaryCodecError::InvalidDefinitions(_))
        ));
    }
}
