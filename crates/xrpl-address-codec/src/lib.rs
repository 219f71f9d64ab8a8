/// XRPL SDK - Address and seed codec.
///
/// Base58Check encoding with version prefixes for the ledger's
/// human-readable identifiers:
/// - classic addresses (`r...`) and the `AccountId` they encode
/// - family seeds for both signing algorithms (`s...`, `sEd...`)
/// - node (`n...`) and account (`a...`) public keys
/// - X-addresses that fold a destination tag into the address

pub mod account_id;
pub mod codec;
pub mod x_address;

mod error;
pub use error::AddressCodecError;
pub use account_id::AccountId;
pub use codec::{
    decode_account_id, decode_account_public, decode_check, decode_node_public, decode_seed,
    encode_account_id, encode_account_public, encode_check, encode_node_public, encode_seed,
    is_valid_classic_address, KeyType,
};
pub use x_address::{
    classic_address_to_x_address, is_valid_x_address, x_address_to_classic_address, XAddress,
};
