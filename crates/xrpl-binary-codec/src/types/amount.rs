//! Native and issued currency amounts.
//!
//! # Wire format
//!
//! A native amount is 8 bytes: bit 63 clear, bit 62 set (positive), and the
//! drop count in the low 62 bits.
//!
//! An issued amount is 48 bytes: an 8-byte value followed by the 20-byte
//! currency and the 20-byte issuer. The value has bit 63 set, bit 62 set for
//! positive values, the exponent biased by 97 in bits 54..62, and a mantissa
//! normalized to 16 digits in the low 54 bits. Zero is exactly
//! `0x8000000000000000`.

use std::fmt;
use std::str::FromStr;

use xrpl_address_codec::AccountId;
use xrpl_primitives::util::{BinaryReader, BinaryWriter};

use crate::types::currency::Currency;
use crate::BinaryCodecError;

/// Total supply of the native currency in drops (100 billion XRP).
pub const MAX_DROPS: u64 = 100_000_000_000_000_000;

/// Smallest normalized issued mantissa.
pub const MIN_MANTISSA: u64 = 1_000_000_000_000_000;

/// Largest normalized issued mantissa.
pub const MAX_MANTISSA: u64 = 9_999_999_999_999_999;

pub const MIN_EXPONENT: i32 = -96;
pub const MAX_EXPONENT: i32 = 80;

/// Significant decimal digits an issued value can carry.
pub const MAX_PRECISION: usize = 16;

const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
const NATIVE_VALUE_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;
const MANTISSA_MASK: u64 = (1 << 54) - 1;
const EXPONENT_BIAS: i32 = 97;

/// Canonical encoding of an issued zero.
pub const ZERO_ISSUED_VALUE: u64 = NOT_NATIVE_BIT;

/// Length of an encoded native amount.
pub const NATIVE_AMOUNT_LEN: usize = 8;

/// Length of an encoded issued amount.
pub const ISSUED_AMOUNT_LEN: usize = 48;

/// Decimal value of an issued amount: `mantissa * 10^exponent`.
///
/// Nonzero values always hold a mantissa in `[MIN_MANTISSA, MAX_MANTISSA]`
/// and an exponent in `[MIN_EXPONENT, MAX_EXPONENT]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssuedValue {
    mantissa: u64,
    exponent: i32,
    negative: bool,
}

impl IssuedValue {
    pub const ZERO: IssuedValue = IssuedValue {
        mantissa: 0,
        exponent: 0,
        negative: false,
    };

    /// Normalize `mantissa * 10^exponent`.
    ///
    /// # Returns
    /// `PrecisionLoss` when more than 16 significant digits would be
    /// needed, `OutOfRange` when the exponent does not fit.
    pub fn new(mut mantissa: u64, mut exponent: i32, negative: bool) -> Result<Self, BinaryCodecError> {
        if mantissa == 0 {
            return Ok(IssuedValue::ZERO);
        }
        while mantissa > MAX_MANTISSA {
            if mantissa % 10 != 0 {
                return Err(BinaryCodecError::PrecisionLoss(format!(
                    "{}e{} has more than {} significant digits",
                    mantissa, exponent, MAX_PRECISION
                )));
            }
            mantissa /= 10;
            exponent = exponent.saturating_add(1);
        }
        while mantissa < MIN_MANTISSA {
            mantissa *= 10;
            exponent = exponent.saturating_sub(1);
        }
        if !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent) {
            return Err(value_out_of_range(format!(
                "exponent {} outside [{}, {}]",
                exponent, MIN_EXPONENT, MAX_EXPONENT
            )));
        }
        Ok(IssuedValue {
            mantissa,
            exponent,
            negative,
        })
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// The 64-bit wire value.
    pub fn to_bits(&self) -> u64 {
        if self.is_zero() {
            return ZERO_ISSUED_VALUE;
        }
        let mut bits = NOT_NATIVE_BIT | self.mantissa;
        if !self.negative {
            bits |= POSITIVE_BIT;
        }
        bits | (((self.exponent + EXPONENT_BIAS) as u64) << 54)
    }

    /// Parse a 64-bit wire value, rejecting non-canonical encodings.
    pub fn from_bits(bits: u64) -> Result<Self, BinaryCodecError> {
        if bits & NOT_NATIVE_BIT == 0 {
            return Err(value_out_of_range("native amount bit pattern".to_string()));
        }
        if bits == ZERO_ISSUED_VALUE {
            return Ok(IssuedValue::ZERO);
        }
        let mantissa = bits & MANTISSA_MASK;
        let exponent = ((bits >> 54) & 0xFF) as i32 - EXPONENT_BIAS;
        let negative = bits & POSITIVE_BIT == 0;
        if !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa)
            || !(MIN_EXPONENT..=MAX_EXPONENT).contains(&exponent)
        {
            return Err(value_out_of_range(format!(
                "non-canonical value 0x{:016X}",
                bits
            )));
        }
        Ok(IssuedValue {
            mantissa,
            exponent,
            negative,
        })
    }
}

impl FromStr for IssuedValue {
    type Err = BinaryCodecError;

    /// Parse a decimal such as `-1.25`, `0.001` or `1.5e-7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || value_out_of_range(format!("invalid decimal {:?}", s));

        let (negative, unsigned) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let (number, exp_part) = match unsigned.find(&['e', 'E'][..]) {
            Some(i) => (&unsigned[..i], Some(&unsigned[i + 1..])),
            None => (unsigned, None),
        };
        let (int_part, frac_part) = match number.find('.') {
            Some(i) => (&number[..i], &number[i + 1..]),
            None => (number, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let sci_exponent: i32 = match exp_part {
            Some(e) => e.parse().map_err(|_| invalid())?,
            None => 0,
        };
        let frac_len = i32::try_from(frac_part.len()).map_err(|_| invalid())?;
        let mut exponent = sci_exponent.checked_sub(frac_len).ok_or_else(invalid)?;

        let digits: String = int_part.chars().chain(frac_part.chars()).collect();
        let digits = digits.trim_start_matches('0');
        if digits.is_empty() {
            return Ok(IssuedValue::ZERO);
        }
        let significant = digits.trim_end_matches('0');
        let trailing = digits.len() - significant.len();
        exponent = exponent
            .checked_add(i32::try_from(trailing).map_err(|_| invalid())?)
            .ok_or_else(invalid)?;

        if significant.len() > MAX_PRECISION {
            return Err(BinaryCodecError::PrecisionLoss(s.to_string()));
        }
        let mantissa: u64 = significant.parse().map_err(|_| invalid())?;
        IssuedValue::new(mantissa, exponent, negative)
    }
}

impl fmt::Display for IssuedValue {
    /// Plain decimal, switching to `1.5e+21` / `1.5e-7` notation outside
    /// `1e-6 <= |v| < 1e21`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut mantissa = self.mantissa;
        let mut exponent = self.exponent;
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exponent += 1;
        }
        let digits = mantissa.to_string();
        let len = digits.len() as i32;
        let sci = exponent + len - 1;
        let sign = if self.negative { "-" } else { "" };

        if !(-6..21).contains(&sci) {
            let (head, tail) = digits.split_at(1);
            let exp_sign = if sci >= 0 { "+" } else { "" };
            return if tail.is_empty() {
                write!(f, "{}{}e{}{}", sign, head, exp_sign, sci)
            } else {
                write!(f, "{}{}.{}e{}{}", sign, head, tail, exp_sign, sci)
            };
        }
        if exponent >= 0 {
            return write!(f, "{}{}{}", sign, digits, "0".repeat(exponent as usize));
        }
        let point = len + exponent;
        if point > 0 {
            let (int_digits, frac_digits) = digits.split_at(point as usize);
            write!(f, "{}{}.{}", sign, int_digits, frac_digits)
        } else {
            write!(f, "{}0.{}{}", sign, "0".repeat((-point) as usize), digits)
        }
    }
}

/// An issued currency amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IssuedAmount {
    pub value: IssuedValue,
    pub currency: Currency,
    pub issuer: AccountId,
}

/// A ledger amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Amount {
    /// Native currency in drops.
    Drops(u64),
    /// Issued currency.
    Issued(IssuedAmount),
}

impl Amount {
    /// A native amount, checked against the total supply.
    pub fn drops(drops: u64) -> Result<Self, BinaryCodecError> {
        check_drops(drops)?;
        Ok(Amount::Drops(drops))
    }

    /// An issued amount from a decimal string.
    pub fn issued(value: &str, currency: Currency, issuer: AccountId) -> Result<Self, BinaryCodecError> {
        if !currency.is_issuable() {
            return Err(BinaryCodecError::NativeCurrencyAsIssued);
        }
        Ok(Amount::Issued(IssuedAmount {
            value: value.parse()?,
            currency,
            issuer,
        }))
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Amount::Drops(_))
    }

    /// Serialize to 8 or 48 bytes.
    pub fn write_to(&self, writer: &mut BinaryWriter) -> Result<(), BinaryCodecError> {
        match self {
            Amount::Drops(drops) => {
                check_drops(*drops)?;
                writer.write_u64_be(POSITIVE_BIT | drops);
            }
            Amount::Issued(issued) => {
                if !issued.currency.is_issuable() {
                    return Err(BinaryCodecError::NativeCurrencyAsIssued);
                }
                writer.write_u64_be(issued.value.to_bits());
                issued.currency.write_to(writer);
                writer.write_bytes(issued.issuer.as_bytes());
            }
        }
        Ok(())
    }

    /// Deserialize, taking 8 or 48 bytes depending on the first bit.
    pub fn read_from(reader: &mut BinaryReader) -> Result<Self, BinaryCodecError> {
        let bits = reader.read_u64_be()?;
        if bits & NOT_NATIVE_BIT == 0 {
            if bits & POSITIVE_BIT == 0 {
                return Err(BinaryCodecError::OutOfRange {
                    field: "Amount".to_string(),
                    reason: "negative native amount".to_string(),
                });
            }
            let drops = bits & NATIVE_VALUE_MASK;
            check_drops(drops)?;
            return Ok(Amount::Drops(drops));
        }

        let value = IssuedValue::from_bits(bits)?;
        let currency = Currency::read_from(reader)?;
        if !currency.is_issuable() {
            return Err(BinaryCodecError::NativeCurrencyAsIssued);
        }
        let issuer = AccountId::new(reader.read_array()?);
        Ok(Amount::Issued(IssuedAmount {
            value,
            currency,
            issuer,
        }))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, BinaryCodecError> {
        let mut writer = BinaryWriter::with_capacity(ISSUED_AMOUNT_LEN);
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }
}

fn check_drops(drops: u64) -> Result<(), BinaryCodecError> {
    if drops > MAX_DROPS {
        return Err(BinaryCodecError::OutOfRange {
            field: "Amount".to_string(),
            reason: format!("{} drops exceeds the maximum of {}", drops, MAX_DROPS),
        });
    }
    Ok(())
}

fn value_out_of_range(reason: String) -> BinaryCodecError {
    BinaryCodecError::OutOfRange {
        field: "Amount".to_string(),
        reason,
    }
}
