//! `solana:` payment URL codec.
//!
//! Two URL shapes share the scheme:
//!
//! ```text
//! solana:<recipient>?amount=<decimal>&spl-token=<mint>&reference=<key>&label=<text>&message=<text>&memo=<text>
//! solana:<percent-encoded https link>?label=<text>&message=<text>
//! ```
//!
//! The first is a *transfer request* the wallet turns into a transfer itself;
//! the second is a *transaction request* whose link the wallet fetches.

mod encode;
mod parse;
mod types;

pub use encode::{encode_transaction_request, encode_transfer_request, encode_url};
pub use parse::{parse_transfer_request, parse_url};
pub use types::{PaymentRequest, TransactionRequest, TransferRequest, TransferRequestBuilder};

/// URL scheme prefix, including the colon.
pub const SOLANA_PROTOCOL: &str = "solana:";

/// URL scheme as reported by `url::Url::scheme`.
pub const SOLANA_SCHEME: &str = "solana";

/// Only `https` links are accepted in transaction requests.
pub const HTTPS_SCHEME: &str = "https";

pub const HTTPS_PROTOCOL: &str = "https:";

/// Advisory limit for callers rendering URLs, such as QR encoders. The codec
/// itself accepts and produces URLs of any length.
pub const MAX_URL_LENGTH: usize = 2048;
