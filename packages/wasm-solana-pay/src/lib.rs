//! wasm-solana-pay: Solana Pay URLs and transfers, for Rust and JavaScript.
//!
//! Encodes and parses `solana:` payment URLs, builds the unsigned transfer a
//! transfer request describes, and checks transactions against a request.
//! Nothing here touches the network; submission goes through caller-supplied
//! collaborators (see [`client`]).
//!
//! # Architecture
//!
//! 1. **Core** (`uri`, `transfer`, `amount`, `reference`, `validation`) -
//!    the codec and builder, pure Rust on top of `solana-sdk`
//! 2. **Wire helpers** (`transaction`, `keypair`, `client`) - extension traits
//!    on SDK types and the signer/RPC seams
//! 3. **WASM bindings** (`wasm/`) - thin wrappers that expose the core to JavaScript
//!
//! # Usage from Rust
//!
//! ```rust
//! use wasm_solana_pay::{build_transfer, parse_transfer_request, Pubkey, PubkeyExt};
//!
//! let request = parse_transfer_request(
//!     "solana:mvines9iiHiQTysrwkJjGf2gb9Ex9jXJX8ns3qwf2kN?amount=0.01&memo=OrderId1234",
//! )
//! .unwrap();
//!
//! let payer = Pubkey::from_base58("FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH").unwrap();
//! let transfer = build_transfer(&payer, &request, None).unwrap();
//! assert_eq!(transfer.instructions().len(), 2);
//! ```

pub mod amount;
pub mod client;
mod error;
pub mod instructions;
pub mod keypair;
pub mod pubkey;
pub mod reference;
pub mod transaction;
pub mod transfer;
pub mod uri;
pub mod validation;
pub mod wasm;

// Re-export core types at crate root
pub use amount::{Amount, NATIVE_DECIMALS};
pub use client::{sign_and_send, PaymentRpc, TransactionSigner};
pub use error::WasmSolanaPayError;
pub use keypair::{Keypair, KeypairExt};
pub use pubkey::{Pubkey, PubkeyExt};
pub use reference::References;
pub use transaction::{Transaction, TransactionExt};
pub use transfer::{build_transfer, verify_transfer, Mint, UnsignedTransfer};
pub use uri::{
    encode_transaction_request, encode_transfer_request, encode_url, parse_transfer_request,
    parse_url, PaymentRequest, TransactionRequest, TransferRequest, TransferRequestBuilder,
};

// Re-export WASM types
pub use wasm::{BuilderNamespace, UrlNamespace, WasmPubkey, WasmTransaction};
