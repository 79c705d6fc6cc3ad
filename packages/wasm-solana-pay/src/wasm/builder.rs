//! WASM binding for transfer building and verification.
//!
//! - `buildTransfer` - Creates an unsigned transaction from a `solana:` transfer URL
//! - `verifyTransfer` - Checks a transaction against a `solana:` transfer URL

use std::str::FromStr;

use serde::Deserialize;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use wasm_bindgen::prelude::*;

use crate::error::WasmSolanaPayError;
use crate::transaction::Transaction;
use crate::transfer::{self, Mint};
use crate::uri;
use crate::validation;
use crate::wasm::transaction::WasmTransaction;

/// Token mint details supplied by the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MintParams {
    pub address: String,
    pub decimals: u8,
    /// Defaults to the SPL Token program
    #[serde(default)]
    pub token_program: Option<String>,
}

impl MintParams {
    pub fn to_mint(&self) -> Result<Mint, WasmSolanaPayError> {
        let mint = Mint::new(validation::parse_address(&self.address)?, self.decimals);
        match &self.token_program {
            Some(program) => Ok(mint.with_token_program(validation::parse_address(program)?)),
            None => Ok(mint),
        }
    }
}

/// Per-call build configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildParams {
    /// Fee payer and transfer authority (base58)
    pub payer: String,
    /// Recent blockhash fetched by the caller (base58)
    pub recent_blockhash: String,
    #[serde(default)]
    pub mint: Option<MintParams>,
}

impl BuildParams {
    pub fn payer(&self) -> Result<Pubkey, WasmSolanaPayError> {
        validation::parse_address(&self.payer)
    }

    pub fn blockhash(&self) -> Result<Hash, WasmSolanaPayError> {
        Hash::from_str(&self.recent_blockhash).map_err(|_| {
            WasmSolanaPayError::Transaction(format!(
                "Invalid blockhash: {}",
                self.recent_blockhash
            ))
        })
    }

    pub fn mint(&self) -> Result<Option<Mint>, WasmSolanaPayError> {
        self.mint.as_ref().map(MintParams::to_mint).transpose()
    }
}

/// Build the unsigned transaction for a transfer URL.
pub fn build_from_url(url: &str, params: &BuildParams) -> Result<Transaction, WasmSolanaPayError> {
    let request = uri::parse_transfer_request(url)?;
    let mint = params.mint()?;
    let transfer = transfer::build_transfer(&params.payer()?, &request, mint.as_ref())?;
    Ok(transfer.into_transaction(params.blockhash()?))
}

/// Namespace for transfer building operations.
#[wasm_bindgen]
pub struct BuilderNamespace;

#[wasm_bindgen]
impl BuilderNamespace {
    /// Build an unsigned transaction from a `solana:` transfer URL.
    ///
    /// # Params Structure
    ///
    /// ```json
    /// {
    ///   "payer": "FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH",
    ///   "recentBlockhash": "GWaQEymC3Z9SHM2gkh8u12xL1zJPMHPCSVR3pSDpEXE4",
    ///   "mint": { "address": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "decimals": 6 }
    /// }
    /// ```
    ///
    /// `mint` is required for `spl-token` URLs and ignored otherwise.
    ///
    /// @param url - A `solana:` transfer request URL
    /// @param params - Payer, blockhash and optional mint details
    /// @returns The unsigned transaction
    #[wasm_bindgen]
    pub fn build_transfer(url: &str, params: JsValue) -> Result<WasmTransaction, JsValue> {
        let params: BuildParams = serde_wasm_bindgen::from_value(params)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse build params: {}", e)))?;
        let tx = build_from_url(url, &params)?;
        Ok(WasmTransaction::from_inner(tx))
    }

    /// Check that a transaction pays what a `solana:` transfer URL asks for.
    ///
    /// Throws with a description of the first mismatch.
    #[wasm_bindgen]
    pub fn verify_transfer(tx: &WasmTransaction, url: &str) -> Result<(), WasmSolanaPayError> {
        let request = uri::parse_transfer_request(url)?;
        transfer::verify_transfer(tx.inner(), &request)
    }
}
