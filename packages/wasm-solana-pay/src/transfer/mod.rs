//! Transfer building and checking.
//!
//! [`build_transfer`] turns a parsed [`TransferRequest`](crate::uri::TransferRequest)
//! into an unsigned instruction list without touching the network;
//! [`verify_transfer`] checks a transaction against a request.

mod build;
mod types;
mod verify;

pub use build::build_transfer;
pub use types::{Mint, UnsignedTransfer};
pub use verify::verify_transfer;
