//! Payment path sets.
//!
//! A path set is a list of paths, each a list of steps. Every step starts
//! with a type byte whose bits say which of account, currency and issuer
//! follow. Paths are separated by `0xFF` and the set ends with `0x00`.

use xrpl_address_codec::AccountId;
use xrpl_primitives::util::{BinaryReader, BinaryWriter};

use crate::types::currency::Currency;
use crate::BinaryCodecError;

pub const TYPE_ACCOUNT: u8 = 0x01;
pub const TYPE_CURRENCY: u8 = 0x10;
pub const TYPE_ISSUER: u8 = 0x20;

pub const PATH_SEPARATOR: u8 = 0xFF;
pub const PATH_SET_END: u8 = 0x00;

const STEP_TYPE_MASK: u8 = TYPE_ACCOUNT | TYPE_CURRENCY | TYPE_ISSUER;

/// One hop of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PathStep {
    pub account: Option<AccountId>,
    pub currency: Option<Currency>,
    pub issuer: Option<AccountId>,
}

impl PathStep {
    fn type_byte(&self) -> u8 {
        let mut t = 0;
        if self.account.is_some() {
            t |= TYPE_ACCOUNT;
        }
        if self.currency.is_some() {
            t |= TYPE_CURRENCY;
        }
        if self.issuer.is_some() {
            t |= TYPE_ISSUER;
        }
        t
    }

    fn write_to(&self, writer: &mut BinaryWriter) -> Result<(), BinaryCodecError> {
        let t = self.type_byte();
        if t == 0 {
            return Err(BinaryCodecError::InvalidPathSet("path step is empty".to_string()));
        }
        writer.write_u8(t);
        if let Some(account) = &self.account {
            writer.write_bytes(account.as_bytes());
        }
        if let Some(currency) = &self.currency {
            currency.write_to(writer);
        }
        if let Some(issuer) = &self.issuer {
            writer.write_bytes(issuer.as_bytes());
        }
        Ok(())
    }

    fn read_from(type_byte: u8, reader: &mut BinaryReader) -> Result<Self, BinaryCodecError> {
        if type_byte & !STEP_TYPE_MASK != 0 {
            return Err(BinaryCodecError::InvalidPathSet(format!(
                "unknown path step type 0x{:02X}",
                type_byte
            )));
        }
        let mut step = PathStep::default();
        if type_byte & TYPE_ACCOUNT != 0 {
            step.account = Some(AccountId::new(reader.read_array()?));
        }
        if type_byte & TYPE_CURRENCY != 0 {
            step.currency = Some(Currency::read_from(reader)?);
        }
        if type_byte & TYPE_ISSUER != 0 {
            step.issuer = Some(AccountId::new(reader.read_array()?));
        }
        Ok(step)
    }
}

pub type Path = Vec<PathStep>;

/// A non-empty set of non-empty paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathSet(pub Vec<Path>);

impl PathSet {
    pub fn new(paths: Vec<Path>) -> Self {
        PathSet(paths)
    }

    pub fn paths(&self) -> &[Path] {
        &self.0
    }

    pub fn write_to(&self, writer: &mut BinaryWriter) -> Result<(), BinaryCodecError> {
        if self.0.is_empty() {
            return Err(BinaryCodecError::InvalidPathSet("path set is empty".to_string()));
        }
        for (i, path) in self.0.iter().enumerate() {
            if path.is_empty() {
                return Err(BinaryCodecError::InvalidPathSet(format!("path {} is empty", i)));
            }
            if i > 0 {
                writer.write_u8(PATH_SEPARATOR);
            }
            for step in path {
                step.write_to(writer)?;
            }
        }
        writer.write_u8(PATH_SET_END);
        Ok(())
    }

    pub fn read_from(reader: &mut BinaryReader) -> Result<Self, BinaryCodecError> {
        let mut paths = Vec::new();
        let mut current: Path = Vec::new();
        loop {
            match reader.read_u8()? {
                PATH_SET_END => break,
                PATH_SEPARATOR => {
                    if current.is_empty() {
                        return Err(BinaryCodecError::InvalidPathSet(
                            "empty path before separator".to_string(),
                        ));
                    }
                    paths.push(std::mem::take(&mut current));
                }
                t => current.push(PathStep::read_from(t, reader)?),
            }
        }
        if current.is_empty() {
            return Err(BinaryCodecError::InvalidPathSet(if paths.is_empty() {
                "path set is empty".to_string()
            } else {
                "empty path before end marker".to_string()
            }));
        }
        paths.push(current);
        Ok(PathSet(paths))
    }
}
