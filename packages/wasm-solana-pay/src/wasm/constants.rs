//! Protocol constants and program IDs exported via WASM.
//!
//! Lets JavaScript callers reference them without importing @solana/web3.js.

use wasm_bindgen::prelude::*;

use crate::amount::NATIVE_DECIMALS;
use crate::instructions::{
    ASSOCIATED_TOKEN_PROGRAM_ID, MEMO_PROGRAM_ID, SYSTEM_PROGRAM_ID, TOKEN_2022_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use crate::uri::{HTTPS_PROTOCOL, MAX_URL_LENGTH, SOLANA_PROTOCOL};
use crate::validation::MAX_AMOUNT_DECIMALS;

/// `solana:`
#[wasm_bindgen]
pub fn solana_protocol() -> String {
    SOLANA_PROTOCOL.to_string()
}

/// `https:`
#[wasm_bindgen]
pub fn https_protocol() -> String {
    HTTPS_PROTOCOL.to_string()
}

/// Advisory `solana:` URL length for QR rendering, in characters
#[wasm_bindgen]
pub fn max_url_length() -> usize {
    MAX_URL_LENGTH
}

/// Most fractional digits an amount may carry
#[wasm_bindgen]
pub fn max_amount_decimals() -> u32 {
    MAX_AMOUNT_DECIMALS
}

/// Decimal places of native SOL
#[wasm_bindgen]
pub fn native_decimals() -> u8 {
    NATIVE_DECIMALS
}

/// System Program ID
#[wasm_bindgen]
pub fn system_program_id() -> String {
    SYSTEM_PROGRAM_ID.to_string()
}

/// Token Program ID (SPL Token)
#[wasm_bindgen]
pub fn token_program_id() -> String {
    TOKEN_PROGRAM_ID.to_string()
}

/// Token 2022 Program ID
#[wasm_bindgen]
pub fn token_2022_program_id() -> String {
    TOKEN_2022_PROGRAM_ID.to_string()
}

/// Associated Token Account Program ID
#[wasm_bindgen]
pub fn ata_program_id() -> String {
    ASSOCIATED_TOKEN_PROGRAM_ID.to_string()
}

/// Memo Program ID
#[wasm_bindgen]
pub fn memo_program_id() -> String {
    MEMO_PROGRAM_ID.to_string()
}
