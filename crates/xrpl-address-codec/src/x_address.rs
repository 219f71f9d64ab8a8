//! X-addresses: an account plus an optional destination tag in one string.
//!
//! Layout before Base58Check: 2-byte network prefix, 20-byte account id,
//! a flag byte (1 when a tag is present), the tag as a little-endian u32,
//! and four reserved zero bytes. A tagged address never reads back as
//! tag-less.

use xrpl_primitives::base58;

use crate::account_id::AccountId;
use crate::codec::ACCOUNT_ID_LEN;
use crate::AddressCodecError;

/// Prefix of a mainnet X-address (renders as a leading `X`).
pub const MAIN_PREFIX: [u8; 2] = [0x05, 0x44];
/// Prefix of a test network X-address (renders as a leading `T`).
pub const TEST_PREFIX: [u8; 2] = [0x04, 0x93];

/// Decoded payload length: prefix + account id + flag + 8 tag bytes.
const X_ADDRESS_LEN: usize = 2 + ACCOUNT_ID_LEN + 1 + 8;

/// The parts of a decoded X-address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XAddress {
    /// The account the address refers to.
    pub account_id: AccountId,
    /// Destination tag, if one was encoded.
    pub tag: Option<u32>,
    /// Whether the address carries the test network prefix.
    pub is_test: bool,
}

impl XAddress {
    /// Encode to the `X...` / `T...` string form.
    pub fn encode(&self) -> String {
        let mut data = Vec::with_capacity(X_ADDRESS_LEN);
        data.extend_from_slice(if self.is_test { &TEST_PREFIX } else { &MAIN_PREFIX });
        data.extend_from_slice(self.account_id.as_bytes());
        data.push(u8::from(self.tag.is_some()));
        data.extend_from_slice(&self.tag.unwrap_or(0).to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        base58::check_encode(&data)
    }

    /// Decode an `X...` / `T...` string.
    ///
    /// # Returns
    /// The decoded parts, `InvalidXAddress` for a wrong prefix or length,
    /// or `UnsupportedXAddress` for an unknown flag, a tag on a tag-less
    /// address, or a 64-bit tag.
    pub fn decode(s: &str) -> Result<Self, AddressCodecError> {
        let data = base58::check_decode(s)?;
        if data.len() != X_ADDRESS_LEN {
            return Err(AddressCodecError::InvalidXAddress(format!(
                "expected {} bytes, got {}",
                X_ADDRESS_LEN,
                data.len()
            )));
        }

        let is_test = match [data[0], data[1]] {
            MAIN_PREFIX => false,
            TEST_PREFIX => true,
            other => {
                return Err(AddressCodecError::InvalidXAddress(format!(
                    "unknown prefix {}",
                    hex::encode(other)
                )))
            }
        };

        let account_id = AccountId::from_slice(&data[2..2 + ACCOUNT_ID_LEN])?;
        let flag = data[22];
        let mut tag_bytes = [0u8; 4];
        tag_bytes.copy_from_slice(&data[23..27]);
        let tag_value = u32::from_le_bytes(tag_bytes);

        if data[27..].iter().any(|&b| b != 0) {
            return Err(AddressCodecError::UnsupportedXAddress(
                "64-bit tags are not supported".to_string(),
            ));
        }

        let tag = match flag {
            0 if tag_value == 0 => None,
            0 => {
                return Err(AddressCodecError::UnsupportedXAddress(
                    "tag bytes set without the tag flag".to_string(),
                ))
            }
            1 => Some(tag_value),
            other => {
                return Err(AddressCodecError::UnsupportedXAddress(format!(
                    "unknown flag {}",
                    other
                )))
            }
        };

        Ok(XAddress {
            account_id,
            tag,
            is_test,
        })
    }
}

/// Convert a classic address and optional tag into an X-address.
pub fn classic_address_to_x_address(
    classic_address: &str,
    tag: Option<u32>,
    is_test: bool,
) -> Result<String, AddressCodecError> {
    let account_id = AccountId::from_classic_address(classic_address)?;
    Ok(XAddress {
        account_id,
        tag,
        is_test,
    }
    .encode())
}

/// Split an X-address into its classic address, tag and network flag.
pub fn x_address_to_classic_address(
    x_address: &str,
) -> Result<(String, Option<u32>, bool), AddressCodecError> {
    let decoded = XAddress::decode(x_address)?;
    Ok((
        decoded.account_id.to_classic_address(),
        decoded.tag,
        decoded.is_test,
    ))
}

/// Whether `s` is a well-formed, supported X-address.
pub fn is_valid_x_address(s: &str) -> bool {
    XAddress::decode(s).is_ok()
}
