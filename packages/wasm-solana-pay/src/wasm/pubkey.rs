//! WASM bindings for Solana addresses.

use wasm_bindgen::prelude::*;

use crate::error::WasmSolanaPayError;
use crate::instructions::{self, TOKEN_PROGRAM};
use crate::pubkey::{Pubkey, PubkeyExt};

/// WASM wrapper for Solana public key (address).
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct WasmPubkey {
    inner: Pubkey,
}

#[wasm_bindgen]
impl WasmPubkey {
    /// Create a Pubkey from a base58 string.
    #[wasm_bindgen]
    pub fn from_base58(address: &str) -> Result<WasmPubkey, WasmSolanaPayError> {
        Pubkey::from_base58(address).map(WasmPubkey::from_inner)
    }

    /// Create a Pubkey from raw bytes (32 bytes).
    #[wasm_bindgen]
    pub fn from_bytes(bytes: &[u8]) -> Result<WasmPubkey, WasmSolanaPayError> {
        Pubkey::from_bytes_checked(bytes).map(WasmPubkey::from_inner)
    }

    #[wasm_bindgen]
    pub fn to_base58(&self) -> String {
        self.inner.to_string()
    }

    #[wasm_bindgen]
    pub fn to_bytes(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.inner.to_bytes()[..])
    }

    #[wasm_bindgen]
    pub fn equals(&self, other: &WasmPubkey) -> bool {
        self.inner == other.inner
    }

    /// Wallet addresses are on the Ed25519 curve; token accounts are not.
    #[wasm_bindgen]
    pub fn is_on_curve(&self) -> bool {
        self.inner.is_on_curve()
    }

    /// Associated token account of this owner for `mint`.
    ///
    /// @param mint - Token mint
    /// @param token_program - Token program ID (base58); defaults to SPL Token
    #[wasm_bindgen]
    pub fn associated_token_address(
        &self,
        mint: &WasmPubkey,
        token_program: Option<String>,
    ) -> Result<WasmPubkey, WasmSolanaPayError> {
        let token_program = match token_program {
            Some(program) => Pubkey::from_base58(&program)?,
            None => *TOKEN_PROGRAM,
        };
        instructions::associated_token_address(&self.inner, &mint.inner, &token_program)
            .map(WasmPubkey::from_inner)
    }
}

impl WasmPubkey {
    pub fn from_inner(inner: Pubkey) -> Self {
        WasmPubkey { inner }
    }

    /// Get the inner Pubkey for internal Rust use.
    pub fn inner(&self) -> &Pubkey {
        &self.inner
    }
}
