#![deny(missing_docs)]

//! XRPL SDK - Complete SDK.
//!
//! Re-exports all XRPL SDK components for convenient single-crate usage.

pub use xrpl_primitives as primitives;
pub use xrpl_address_codec as address_codec;
pub use xrpl_keypairs as keypairs;
pub use xrpl_binary_codec as binary_codec;
