//! 160-bit currency codes.

use std::fmt;
use std::str::FromStr;

use xrpl_primitives::util::{BinaryReader, BinaryWriter};

use crate::BinaryCodecError;

/// Length of a currency code on the wire.
pub const CURRENCY_LEN: usize = 20;

/// Offset of the three ASCII characters inside a standard currency code.
const ISO_OFFSET: usize = 12;

/// Characters allowed in a three-letter currency code.
const ISO_SYMBOLS: &str = "?!@#$%^&*<>(){}[]|";

/// A currency code.
///
/// Standard codes such as `USD` sit as ASCII at bytes 12..15 with every
/// other byte zero; the all-zero code is the native currency. Anything else
/// is a non-standard code shown as 40 hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Currency([u8; CURRENCY_LEN]);

impl Currency {
    /// The native currency.
    pub const XRP: Currency = Currency([0u8; CURRENCY_LEN]);

    pub fn new(bytes: [u8; CURRENCY_LEN]) -> Self {
        Currency(bytes)
    }

    /// Parse `XRP`, a three-character code, or 40 hex characters.
    pub fn from_code(code: &str) -> Result<Self, BinaryCodecError> {
        if code == "XRP" {
            return Ok(Currency::XRP);
        }
        if code.len() == 3 {
            if !code.chars().all(is_iso_char) {
                return Err(out_of_range(format!("invalid currency code {:?}", code)));
            }
            let mut bytes = [0u8; CURRENCY_LEN];
            bytes[ISO_OFFSET..ISO_OFFSET + 3].copy_from_slice(code.as_bytes());
            return Ok(Currency(bytes));
        }
        if code.len() == 2 * CURRENCY_LEN {
            let mut bytes = [0u8; CURRENCY_LEN];
            hex::decode_to_slice(code, &mut bytes)?;
            let currency = Currency(bytes);
            if currency.is_reserved_xrp() {
                return Err(out_of_range(format!("{} spells the reserved code XRP", code)));
            }
            return Ok(currency);
        }
        Err(out_of_range(format!("invalid currency code {:?}", code)))
    }

    pub fn as_bytes(&self) -> &[u8; CURRENCY_LEN] {
        &self.0
    }

    pub fn is_native(&self) -> bool {
        self.0 == [0u8; CURRENCY_LEN]
    }

    /// Whether this is the standard-code spelling of `XRP`, which no
    /// issuer may use.
    pub fn is_reserved_xrp(&self) -> bool {
        let padding_zero = self.0[..ISO_OFFSET].iter().chain(&self.0[ISO_OFFSET + 3..]).all(|&b| b == 0);
        padding_zero && &self.0[ISO_OFFSET..ISO_OFFSET + 3] == b"XRP"
    }

    /// Whether an issued amount or asset may carry this code.
    pub fn is_issuable(&self) -> bool {
        !self.is_native() && !self.is_reserved_xrp()
    }

    /// The three-character code when this is a standard currency.
    pub fn iso_code(&self) -> Option<&str> {
        let iso = &self.0[ISO_OFFSET..ISO_OFFSET + 3];
        let padding_zero = self.0[..ISO_OFFSET].iter().chain(&self.0[ISO_OFFSET + 3..]).all(|&b| b == 0);
        if !padding_zero || self.is_native() {
            return None;
        }
        let code = std::str::from_utf8(iso).ok()?;
        (code.chars().all(is_iso_char) && code != "XRP").then_some(code)
    }

    /// `XRP`, the three-character code, or uppercase hex.
    pub fn to_code(&self) -> String {
        if self.is_native() {
            return "XRP".to_string();
        }
        match self.iso_code() {
            Some(code) => code.to_string(),
            None => hex::encode_upper(self.0),
        }
    }

    pub fn read_from(reader: &mut BinaryReader) -> Result<Self, BinaryCodecError> {
        Ok(Currency(reader.read_array()?))
    }

    pub fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_bytes(&self.0);
    }
}

fn is_iso_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || ISO_SYMBOLS.contains(c)
}

fn out_of_range(reason: String) -> BinaryCodecError {
    BinaryCodecError::OutOfRange {
        field: "Currency".to_string(),
        reason,
    }
}

impl FromStr for Currency {
    type Err = BinaryCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::from_code(s)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_code())
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({})", self.to_code())
    }
}
