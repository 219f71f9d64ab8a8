/// Unified error type for all primitives operations.
///
/// Covers errors from EC operations, DER parsing, Base58 decoding, and
/// binary reading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrimitivesError {
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("malformed DER signature: {0}")]
    MalformedDer(&'static str),

    #[error("{0} trailing bytes after DER signature")]
    DerTrailingBytes(usize),

    #[error("checksum mismatch")]
    ChecksumMismatch,

    #[error("point not on curve")]
    PointNotOnCurve,

    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("invalid base58: {0}")]
    InvalidBase58(String),

    #[error("length {0} exceeds the maximum variable-length prefix")]
    LengthTooLarge(usize),

    #[error("invalid variable-length prefix byte 0x{0:02x}")]
    InvalidLengthPrefix(u8),

    #[error("unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },
}

impl From<hex::FromHexError> for PrimitivesError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitivesError::InvalidHex(e.to_string())
    }
}
