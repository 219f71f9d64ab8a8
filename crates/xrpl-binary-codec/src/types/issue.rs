//! Assets without an amount (`Issue`) and cross-chain bridge descriptors.

use xrpl_address_codec::AccountId;
use xrpl_primitives::util::{BinaryReader, BinaryWriter, LengthPrefix};

use crate::types::currency::Currency;
use crate::BinaryCodecError;

/// Length prefix written before each door account of a bridge.
const DOOR_ACCOUNT_PREFIX: u8 = 0x14;

/// An asset: the native currency, or a currency and its issuer.
///
/// Serializes as the 20-byte currency, followed by the 20-byte issuer
/// unless the currency is native.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Issue {
    Xrp,
    Issued { currency: Currency, issuer: AccountId },
}

impl Issue {
    /// An issued asset. The native currency code is rejected.
    pub fn issued(currency: Currency, issuer: AccountId) -> Result<Self, BinaryCodecError> {
        if !currency.is_issuable() {
            return Err(BinaryCodecError::NativeCurrencyAsIssued);
        }
        Ok(Issue::Issued { currency, issuer })
    }

    pub fn write_to(&self, writer: &mut BinaryWriter) -> Result<(), BinaryCodecError> {
        match self {
            Issue::Xrp => Currency::XRP.write_to(writer),
            Issue::Issued { currency, issuer } => {
                if !currency.is_issuable() {
                    return Err(BinaryCodecError::NativeCurrencyAsIssued);
                }
                currency.write_to(writer);
                writer.write_bytes(issuer.as_bytes());
            }
        }
        Ok(())
    }

    pub fn read_from(reader: &mut BinaryReader) -> Result<Self, BinaryCodecError> {
        let currency = Currency::read_from(reader)?;
        if currency.is_native() {
            return Ok(Issue::Xrp);
        }
        if currency.is_reserved_xrp() {
            return Err(BinaryCodecError::NativeCurrencyAsIssued);
        }
        let issuer = AccountId::new(reader.read_array()?);
        Ok(Issue::Issued { currency, issuer })
    }
}

/// The two door accounts and assets that define a cross-chain bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XChainBridge {
    pub locking_chain_door: AccountId,
    pub locking_chain_issue: Issue,
    pub issuing_chain_door: AccountId,
    pub issuing_chain_issue: Issue,
}

impl XChainBridge {
    pub fn write_to(&self, writer: &mut BinaryWriter) -> Result<(), BinaryCodecError> {
        writer.write_u8(DOOR_ACCOUNT_PREFIX);
        writer.write_bytes(self.locking_chain_door.as_bytes());
        self.locking_chain_issue.write_to(writer)?;
        writer.write_u8(DOOR_ACCOUNT_PREFIX);
        writer.write_bytes(self.issuing_chain_door.as_bytes());
        self.issuing_chain_issue.write_to(writer)
    }

    pub fn read_from(reader: &mut BinaryReader) -> Result<Self, BinaryCodecError> {
        let locking_chain_door = read_door(reader)?;
        let locking_chain_issue = Issue::read_from(reader)?;
        let issuing_chain_door = read_door(reader)?;
        let issuing_chain_issue = Issue::read_from(reader)?;
        Ok(XChainBridge {
            locking_chain_door,
            locking_chain_issue,
            issuing_chain_door,
            issuing_chain_issue,
        })
    }
}

fn read_door(reader: &mut BinaryReader) -> Result<AccountId, BinaryCodecError> {
    let LengthPrefix(len) = reader.read_length_prefix()?;
    if len != usize::from(DOOR_ACCOUNT_PREFIX) {
        return Err(BinaryCodecError::InvalidLength(format!(
            "bridge door account of {} bytes",
            len
        )));
    }
    Ok(AccountId::new(reader.read_array()?))
}
