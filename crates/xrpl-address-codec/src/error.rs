use xrpl_primitives::PrimitivesError;

/// Error types for address, seed and public key string codecs.
///
/// Every decode path distinguishes a bad character, a checksum failure, an
/// unknown version prefix and a wrong payload length.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressCodecError {
    /// A character outside the ledger's Base58 alphabet.
    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    /// The trailing 4-byte checksum does not match the decoded data.
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// The version prefix decoded fine but the payload has the wrong size.
    #[error("invalid payload length: expected {expected}, got {got}")]
    InvalidPayloadLength { expected: usize, got: usize },

    /// The decoded data does not start with any accepted version prefix.
    #[error("unrecognized version prefix: {0}")]
    InvalidVersion(String),

    /// Structurally invalid X-address.
    #[error("invalid X-address: {0}")]
    InvalidXAddress(String),

    /// Well-formed X-address using a feature this codec does not support.
    #[error("unsupported X-address: {0}")]
    UnsupportedXAddress(String),

    /// Invalid hex string.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Any other primitives failure.
    #[error("primitives error: {0}")]
    Primitives(PrimitivesError),
}

impl From<PrimitivesError> for AddressCodecError {
    fn from(e: PrimitivesError) -> Self {
        match e {
            PrimitivesError::InvalidBase58(msg) => AddressCodecError::InvalidBase58(msg),
            PrimitivesError::ChecksumMismatch => AddressCodecError::ChecksumMismatch,
            PrimitivesError::InvalidHex(msg) => AddressCodecError::InvalidHex(msg),
            other => AddressCodecError::Primitives(other),
        }
    }
}

impl From<hex::FromHexError> for AddressCodecError {
    fn from(e: hex::FromHexError) -> Self {
        AddressCodecError::InvalidHex(e.to_string())
    }
}
