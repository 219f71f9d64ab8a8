use xrpl_address_codec::AddressCodecError;
use xrpl_primitives::PrimitivesError;

/// Error types for field definitions and the binary codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BinaryCodecError {
    /// No field with this name exists in the definitions.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// No field with this type and field code exists in the definitions.
    #[error("unknown field header: type {type_code}, field {field_code}")]
    UnknownFieldHeader { type_code: u16, field_code: u16 },

    /// A field header that is zero or not in its shortest form.
    #[error("malformed field header: {0}")]
    MalformedFieldHeader(String),

    /// A transaction type, ledger entry type or result name or code not in the definitions.
    #[error("unknown {kind}: {value}")]
    UnknownName { kind: &'static str, value: String },

    /// The definitions dataset could not be parsed.
    #[error("invalid definitions: {0}")]
    InvalidDefinitions(String),

    /// The input ended before a value was complete.
    #[error("unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// A length prefix outside the encodable range.
    #[error("invalid length prefix: {0}")]
    InvalidLength(String),

    /// A value outside its type's domain.
    #[error("value out of range for {field}: {reason}")]
    OutOfRange { field: String, reason: String },

    /// A decimal value that needs more than 16 significant digits.
    #[error("amount precision out of range: {0}")]
    PrecisionLoss(String),

    /// The native currency code used where an issued currency is required.
    #[error("XRP is not a valid issued currency")]
    NativeCurrencyAsIssued,

    /// An object or array ended without its end marker.
    #[error("missing end marker for {0}")]
    MissingEndMarker(&'static str),

    /// Objects nested deeper than the decoder allows.
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),

    /// The same field appears twice in one object.
    #[error("duplicate field: {0}")]
    DuplicateField(String),

    /// A value of the wrong kind for the field it is stored under.
    #[error("type mismatch for {field}: expected {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    /// A path set, path or path step with nothing in it.
    #[error("invalid path set: {0}")]
    InvalidPathSet(String),

    /// A JSON document that does not describe a valid object.
    #[error("invalid json: {0}")]
    InvalidJson(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// An address or X-address failed to decode.
    #[error("address codec error: {0}")]
    AddressCodec(#[from] AddressCodecError),
}

impl From<hex::FromHexError> for BinaryCodecError {
    fn from(e: hex::FromHexError) -> Self {
        BinaryCodecError::InvalidHex(e.to_string())
    }
}

impl From<PrimitivesError> for BinaryCodecError {
    fn from(e: PrimitivesError) -> Self {
        match e {
            PrimitivesError::UnexpectedEof { .. } => BinaryCodecError::UnexpectedEof(e.to_string()),
            PrimitivesError::InvalidHex(msg) => BinaryCodecError::InvalidHex(msg),
            other => BinaryCodecError::InvalidLength(other.to_string()),
        }
    }
}
