//! Serialized objects and arrays.
//!
//! An object is a set of named field values. On the wire each field is its
//! header followed by its value, in ascending `(type_code, field_code)`
//! order regardless of how the object was built. A nested object ends with
//! the `ObjectEndMarker` byte `0xE1`; an array is a run of single-field
//! wrapper objects ending with the `ArrayEndMarker` byte `0xF1`.

use std::collections::btree_map;
use std::collections::BTreeMap;

use tracing::{trace, warn};

use xrpl_address_codec::AccountId;
use xrpl_primitives::util::{BinaryReader, BinaryWriter};

use crate::definitions::{Definitions, FieldHeader, FieldInstance, FieldType};
use crate::types::{Amount, Currency, Issue, PathSet, Value, XChainBridge};
use crate::BinaryCodecError;

/// Deepest nesting of objects and arrays the codec accepts.
pub const MAX_DEPTH: usize = 32;

pub const OBJECT_END_MARKER: u8 = 0xE1;
pub const ARRAY_END_MARKER: u8 = 0xF1;

const OBJECT_END: FieldHeader = FieldHeader {
    type_code: 14,
    field_code: 1,
};
const ARRAY_END: FieldHeader = FieldHeader {
    type_code: 15,
    field_code: 1,
};

/// A field name to value map that serializes canonically.
///
/// Two objects holding the same fields compare equal and encode to the
/// same bytes whatever order the fields were inserted in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StObject {
    fields: BTreeMap<String, Value>,
}

impl StObject {
    pub fn new() -> Self {
        StObject::default()
    }

    /// Builder form of [`StObject::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field, returning the previous value if there was one.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in name order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.fields.iter()
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Write every field in canonical order, with no trailing end marker.
    ///
    /// # Arguments
    /// * `signing_only` - Skip top-level fields that are not signing fields.
    pub fn write_to(
        &self,
        writer: &mut BinaryWriter,
        defs: &Definitions,
        signing_only: bool,
    ) -> Result<(), BinaryCodecError> {
        self.write_fields(writer, defs, signing_only, 0)
    }

    fn write_fields(
        &self,
        writer: &mut BinaryWriter,
        defs: &Definitions,
        signing_only: bool,
        depth: usize,
    ) -> Result<(), BinaryCodecError> {
        let mut fields: Vec<(&FieldInstance, &Value)> = Vec::with_capacity(self.fields.len());
        for (name, value) in &self.fields {
            let field = defs.field(name)?;
            if signing_only && !field.is_signing_field {
                trace!(field = %name, "skipping non-signing field");
                continue;
            }
            if value.field_type() != field.field_type {
                return Err(BinaryCodecError::TypeMismatch {
                    field: name.clone(),
                    expected: field.field_type.name(),
                });
            }
            fields.push((field, value));
        }
        fields.sort_by(|a, b| a.0.ordinal_cmp(b.0));

        for (field, value) in fields {
            trace!(field = %field.name, header = %field.header, "encoding field");
            field.header.write_to(writer)?;
            write_value(field, value, writer, defs, depth)?;
        }
        Ok(())
    }

    /// Read fields until the input is exhausted.
    pub fn read_from(reader: &mut BinaryReader, defs: &Definitions) -> Result<Self, BinaryCodecError> {
        read_fields(reader, defs, 0, false)
    }

    /// Read fields up to and including an `ObjectEndMarker`.
    pub fn read_nested(reader: &mut BinaryReader, defs: &Definitions) -> Result<Self, BinaryCodecError> {
        read_fields(reader, defs, 1, true)
    }
}

impl<'a> IntoIterator for &'a StObject {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for StObject {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        StObject {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn check_depth(depth: usize) -> Result<(), BinaryCodecError> {
    if depth > MAX_DEPTH {
        return Err(BinaryCodecError::DepthExceeded(MAX_DEPTH));
    }
    Ok(())
}

/// Array elements must be exactly one object-typed field.
fn check_array_element(field: &str, element: &StObject) -> Result<(), BinaryCodecError> {
    let mut values = element.fields.values();
    match (values.next(), values.next()) {
        (Some(Value::Object(_)), None) => Ok(()),
        _ => Err(BinaryCodecError::TypeMismatch {
            field: field.to_string(),
            expected: "array elements holding one object field",
        }),
    }
}

fn write_value(
    field: &FieldInstance,
    value: &Value,
    writer: &mut BinaryWriter,
    defs: &Definitions,
    depth: usize,
) -> Result<(), BinaryCodecError> {
    match value {
        Value::UInt8(v) => writer.write_u8(*v),
        Value::UInt16(v) => writer.write_u16_be(*v),
        Value::UInt32(v) => writer.write_u32_be(*v),
        Value::UInt64(v) => writer.write_u64_be(*v),
        Value::Hash128(h) => writer.write_bytes(h),
        Value::Hash160(h) => writer.write_bytes(h),
        Value::Hash192(h) => writer.write_bytes(h),
        Value::Hash256(h) => writer.write_bytes(h),
        Value::Amount(amount) => amount.write_to(writer)?,
        Value::Blob(bytes) => writer.write_variable_length(bytes)?,
        Value::AccountId(account) => writer.write_variable_length(account.as_bytes())?,
        Value::Object(object) => {
            check_depth(depth + 1)?;
            object.write_fields(writer, defs, false, depth + 1)?;
            writer.write_u8(OBJECT_END_MARKER);
        }
        Value::Array(elements) => {
            check_depth(depth + 1)?;
            for element in elements {
                check_array_element(&field.name, element)?;
                element.write_fields(writer, defs, false, depth + 1)?;
            }
            writer.write_u8(ARRAY_END_MARKER);
        }
        Value::PathSet(paths) => paths.write_to(writer)?,
        Value::Vector256(hashes) => writer.write_variable_length(&hashes.concat())?,
        Value::Issue(issue) => issue.write_to(writer)?,
        Value::XChainBridge(bridge) => bridge.write_to(writer)?,
        Value::Currency(currency) => currency.write_to(writer),
    }
    Ok(())
}

fn read_fields(
    reader: &mut BinaryReader,
    defs: &Definitions,
    depth: usize,
    nested: bool,
) -> Result<StObject, BinaryCodecError> {
    let mut object = StObject::new();
    loop {
        if reader.is_empty() {
            if nested {
                return Err(BinaryCodecError::MissingEndMarker("object"));
            }
            break;
        }
        let header = FieldHeader::read_from(reader)?;
        if header == OBJECT_END {
            if nested {
                break;
            }
            return Err(BinaryCodecError::MalformedFieldHeader(
                "object end marker at top level".to_string(),
            ));
        }
        if header == ARRAY_END {
            return Err(BinaryCodecError::MalformedFieldHeader(
                "array end marker inside an object".to_string(),
            ));
        }
        let field = defs.field_by_header(header).map_err(|e| {
            warn!(%header, position = reader.position(), "unknown field header");
            e
        })?;
        let value = read_value(field, reader, defs, depth)?;
        trace!(field = %field.name, "decoded field");
        if object.fields.insert(field.name.clone(), value).is_some() {
            return Err(BinaryCodecError::DuplicateField(field.name.clone()));
        }
    }
    Ok(object)
}

fn read_array(
    reader: &mut BinaryReader,
    defs: &Definitions,
    depth: usize,
) -> Result<Vec<StObject>, BinaryCodecError> {
    let mut elements = Vec::new();
    loop {
        if reader.is_empty() {
            return Err(BinaryCodecError::MissingEndMarker("array"));
        }
        let header = FieldHeader::read_from(reader)?;
        if header == ARRAY_END {
            break;
        }
        let field = defs.field_by_header(header)?;
        if field.field_type != FieldType::StObject || header == OBJECT_END {
            return Err(BinaryCodecError::TypeMismatch {
                field: field.name.clone(),
                expected: "STObject array element",
            });
        }
        check_depth(depth + 1)?;
        let inner = read_fields(reader, defs, depth + 1, true)?;
        elements.push(StObject::new().with(field.name.clone(), Value::Object(inner)));
    }
    Ok(elements)
}

fn read_value(
    field: &FieldInstance,
    reader: &mut BinaryReader,
    defs: &Definitions,
    depth: usize,
) -> Result<Value, BinaryCodecError> {
    let value = match field.field_type {
        FieldType::UInt8 => Value::UInt8(reader.read_u8()?),
        FieldType::UInt16 => Value::UInt16(reader.read_u16_be()?),
        FieldType::UInt32 => Value::UInt32(reader.read_u32_be()?),
        FieldType::UInt64 => Value::UInt64(reader.read_u64_be()?),
        FieldType::Hash128 => Value::Hash128(reader.read_array()?),
        FieldType::Hash160 => Value::Hash160(reader.read_array()?),
        FieldType::Hash192 => Value::Hash192(reader.read_array()?),
        FieldType::Hash256 => Value::Hash256(reader.read_array()?),
        FieldType::Amount => Value::Amount(Amount::read_from(reader)?),
        FieldType::Blob => Value::Blob(reader.read_variable_length()?.to_vec()),
        FieldType::AccountId => Value::AccountId(AccountId::from_slice(reader.read_variable_length()?)?),
        FieldType::StObject => {
            check_depth(depth + 1)?;
            Value::Object(read_fields(reader, defs, depth + 1, true)?)
        }
        FieldType::StArray => {
            check_depth(depth + 1)?;
            Value::Array(read_array(reader, defs, depth + 1)?)
        }
        FieldType::PathSet => Value::PathSet(PathSet::read_from(reader)?),
        FieldType::Vector256 => {
            let bytes = reader.read_variable_length()?;
            if bytes.len() % 32 != 0 {
                return Err(BinaryCodecError::InvalidLength(format!(
                    "{} is {} bytes, not a multiple of 32",
                    field.name,
                    bytes.len()
                )));
            }
            let mut hashes = Vec::with_capacity(bytes.len() / 32);
            for chunk in bytes.chunks_exact(32) {
                let mut hash = [0u8; 32];
                hash.copy_from_slice(chunk);
                hashes.push(hash);
            }
            Value::Vector256(hashes)
        }
        FieldType::Issue => Value::Issue(Issue::read_from(reader)?),
        FieldType::XChainBridge => Value::XChainBridge(XChainBridge::read_from(reader)?),
        FieldType::Currency => Value::Currency(Currency::read_from(reader)?),
    };
    Ok(value)
}
