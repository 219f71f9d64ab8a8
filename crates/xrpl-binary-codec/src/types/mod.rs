//! Field values and the wire types they serialize as.

pub mod amount;
pub mod currency;
pub mod issue;
pub mod path_set;

pub use amount::{Amount, IssuedAmount, IssuedValue};
pub use currency::Currency;
pub use issue::{Issue, XChainBridge};
pub use path_set::{Path, PathSet, PathStep};

use xrpl_address_codec::AccountId;

use crate::definitions::FieldType;
use crate::st_object::StObject;

/// A 256-bit hash, the element type of `Vector256`.
pub type Hash256 = [u8; 32];

/// The value of one field.
///
/// Each variant corresponds to exactly one wire type, so a value can only
/// be stored under fields of that type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Hash128([u8; 16]),
    Hash160([u8; 20]),
    Hash192([u8; 24]),
    Hash256(Hash256),
    Amount(Amount),
    Blob(Vec<u8>),
    AccountId(AccountId),
    /// A nested object.
    Object(StObject),
    /// Array elements each hold exactly one object-typed field, e.g.
    /// `{"Memo": {...}}`.
    Array(Vec<StObject>),
    PathSet(PathSet),
    Vector256(Vec<Hash256>),
    Issue(Issue),
    XChainBridge(XChainBridge),
    Currency(Currency),
}

impl Value {
    /// The wire type this value serializes as.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::UInt8(_) => FieldType::UInt8,
            Value::UInt16(_) => FieldType::UInt16,
            Value::UInt32(_) => FieldType::UInt32,
            Value::UInt64(_) => FieldType::UInt64,
            Value::Hash128(_) => FieldType::Hash128,
            Value::Hash160(_) => FieldType::Hash160,
            Value::Hash192(_) => FieldType::Hash192,
            Value::Hash256(_) => FieldType::Hash256,
            Value::Amount(_) => FieldType::Amount,
            Value::Blob(_) => FieldType::Blob,
            Value::AccountId(_) => FieldType::AccountId,
            Value::Object(_) => FieldType::StObject,
            Value::Array(_) => FieldType::StArray,
            Value::PathSet(_) => FieldType::PathSet,
            Value::Vector256(_) => FieldType::Vector256,
            Value::Issue(_) => FieldType::Issue,
            Value::XChainBridge(_) => FieldType::XChainBridge,
            Value::Currency(_) => FieldType::Currency,
        }
    }
}

impl From<Amount> for Value {
    fn from(a: Amount) -> Self {
        Value::Amount(a)
    }
}

impl From<AccountId> for Value {
    fn from(a: AccountId) -> Self {
        Value::AccountId(a)
    }
}

impl From<StObject> for Value {
    fn from(o: StObject) -> Self {
        Value::Object(o)
    }
}
