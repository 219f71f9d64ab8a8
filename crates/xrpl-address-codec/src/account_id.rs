//! 20-byte account identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use xrpl_primitives::base58;
use xrpl_primitives::hash::hash160;

use crate::codec::{decode_account_id, ACCOUNT_ID_LEN, ACCOUNT_ID_VERSION};
use crate::AddressCodecError;

/// An account identifier: RIPEMD-160(SHA-256(public key)).
///
/// Displays and serializes as its classic `r...` address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// The all-zero account (`rrrrrrrrrrrrrrrrrrrrrhoLvTp`).
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_ID_LEN]);

    /// Wrap 20 raw bytes.
    pub fn new(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        AccountId(bytes)
    }

    /// Build from a byte slice that must be exactly 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressCodecError> {
        let arr: [u8; ACCOUNT_ID_LEN] =
            bytes.try_into().map_err(|_| AddressCodecError::InvalidPayloadLength {
                expected: ACCOUNT_ID_LEN,
                got: bytes.len(),
            })?;
        Ok(AccountId(arr))
    }

    /// Account id of a 33-byte public key (secp256k1 compressed or 0xED-prefixed Ed25519).
    pub fn from_public_key(public_key: &[u8]) -> Self {
        AccountId(hash160(public_key))
    }

    /// Parse a classic address.
    pub fn from_classic_address(address: &str) -> Result<Self, AddressCodecError> {
        decode_account_id(address).map(AccountId)
    }

    /// Parse 40 hex characters.
    pub fn from_hex(hex_str: &str) -> Result<Self, AddressCodecError> {
        let bytes = hex::decode(hex_str)?;
        Self::from_slice(&bytes)
    }

    /// Render as a classic address.
    pub fn to_classic_address(&self) -> String {
        let mut data = [0u8; 1 + ACCOUNT_ID_LEN];
        data[..1].copy_from_slice(&ACCOUNT_ID_VERSION);
        data[1..].copy_from_slice(&self.0);
        base58::check_encode(&data)
    }

    /// Uppercase hex of the raw bytes.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }
}

impl From<[u8; ACCOUNT_ID_LEN]> for AccountId {
    fn from(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        AccountId(bytes)
    }
}

impl AsRef<[u8]> for AccountId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_classic_address())
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.to_classic_address())
    }
}

impl FromStr for AccountId {
    type Err = AddressCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_classic_address(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_classic_address())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_id_from_public_key() {
        let secp = hex::decode("030D58EB48B4420B1F7B9DF55087E0E29FEF0E8468F9A6825B01CA2C361042D435").unwrap();
        assert_eq!(
            AccountId::from_public_key(&secp).to_string(),
            "rU6K7V3Po4snVhBBaU29sesqs2qTQJWDw1"
        );
        let ed = hex::decode("ED01FA53FA5A7E77798F882ECE20B1ABC00BB358A9E55A202D0D0676BD0CE37A63").unwrap();
        assert_eq!(
            AccountId::from_public_key(&ed).to_string(),
            "rLUEXYuLiQptky37CqLcm9USQpPiz5rkpD"
        );
    }

    #[test]
    fn test_account_id_parse_and_hex() {
        let id: AccountId = "rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErN".parse().unwrap();
        assert_eq!(id.to_hex(), "BA8E78626EE42C41B46D46C3048DF3A1C3C87072");
        assert_eq!(AccountId::from_hex(&id.to_hex()).unwrap(), id);
        assert_eq!(AccountId::ZERO.to_string(), "rrrrrrrrrrrrrrrrrrrrrhoLvTp");
        assert!(AccountId::from_slice(&[0u8; 19]).is_err());
    }

    #[test]
    fn test_account_id_serde() {
        let id: AccountId = "rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErN".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"rJrRMgiRgrU6hDF4pgu5DXQdWyPbY35ErN\"");
        let back: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<AccountId>("\"not an address\"").is_err());
    }
}
