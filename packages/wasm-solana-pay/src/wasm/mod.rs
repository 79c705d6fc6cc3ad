mod builder;
mod constants;
mod payment_url;
mod pubkey;
mod transaction;
pub mod try_into_js_value;

pub use builder::{BuildParams, BuilderNamespace, MintParams};
pub use payment_url::{
    ReferenceField, TransactionRequestFields, TransferRequestFields, UrlNamespace,
};
pub use pubkey::WasmPubkey;
pub use transaction::WasmTransaction;

// Re-export constants functions
pub use constants::*;
