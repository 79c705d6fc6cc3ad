//! Solana public key (address) used for recipients, mints and references.
//!
//! Wraps `solana_sdk::pubkey::Pubkey` with the protocol's address rules.

use crate::error::WasmSolanaPayError;
use crate::validation;

/// Re-export the underlying Solana Pubkey type.
pub use solana_sdk::pubkey::Pubkey;

/// Extension trait for Pubkey to add protocol-aware error handling.
pub trait PubkeyExt {
    fn from_base58(address: &str) -> Result<Pubkey, WasmSolanaPayError>;
    fn from_bytes_checked(bytes: &[u8]) -> Result<Pubkey, WasmSolanaPayError>;
}

impl PubkeyExt for Pubkey {
    /// Create a Pubkey from a base58 string that must decode to 32 bytes.
    fn from_base58(address: &str) -> Result<Pubkey, WasmSolanaPayError> {
        validation::parse_address(address)
    }

    /// Create a Pubkey from a byte slice with length validation.
    fn from_bytes_checked(bytes: &[u8]) -> Result<Pubkey, WasmSolanaPayError> {
        validation::address_from_bytes(bytes)
    }
}
