//! Acceptance rules shared by the URL codec, the transfer builder and the
//! JavaScript bindings.
//!
//! Every check that decides whether a request is valid lives here so the
//! codec and the builder cannot drift apart.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use solana_sdk::pubkey::Pubkey;

use crate::error::WasmSolanaPayError;

/// Maximum number of significant fractional digits an amount may carry.
///
/// Matches lamport precision (1 SOL = 10^9 lamports).
pub const MAX_AMOUNT_DECIMALS: u32 = 9;

/// Query keys that only make sense on a transfer request.
pub const TRANSFER_PARAM_KEYS: [&str; 4] = ["amount", "spl-token", "reference", "memo"];

static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)?$").expect("valid amount pattern"));

/// Decode a base58 address, requiring exactly 32 bytes.
pub fn parse_address(address: &str) -> Result<Pubkey, WasmSolanaPayError> {
    let bytes = solana_sdk::bs58::decode(address)
        .into_vec()
        .map_err(|e| WasmSolanaPayError::MalformedAddress(format!("{}: {}", address, e)))?;
    address_from_bytes(&bytes)
}

/// Build an address from raw bytes, requiring exactly 32 bytes.
pub fn address_from_bytes(bytes: &[u8]) -> Result<Pubkey, WasmSolanaPayError> {
    let array: [u8; 32] = bytes.try_into().map_err(|_| {
        WasmSolanaPayError::MalformedAddress(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        ))
    })?;
    Ok(Pubkey::from(array))
}

/// Check the textual form of an amount: digits with an optional fraction.
///
/// Signs, exponents, whitespace and bare dots are all rejected.
pub fn check_amount_syntax(amount: &str) -> Result<(), WasmSolanaPayError> {
    if AMOUNT_PATTERN.is_match(amount) {
        Ok(())
    } else {
        Err(WasmSolanaPayError::InvalidAmount(format!(
            "'{}' is not a non-negative decimal",
            amount
        )))
    }
}

/// Check an amount value: non-negative and within protocol precision.
///
/// Trailing zeros do not count against the precision bound.
pub fn check_amount_value(value: &Decimal) -> Result<(), WasmSolanaPayError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(WasmSolanaPayError::InvalidAmount(format!(
            "{} is negative",
            value
        )));
    }
    let scale = value.normalize().scale();
    if scale > MAX_AMOUNT_DECIMALS {
        return Err(WasmSolanaPayError::InvalidAmount(format!(
            "{} has {} fractional digits, at most {} allowed",
            value, scale, MAX_AMOUNT_DECIMALS
        )));
    }
    Ok(())
}

/// A reference set, when present, must hold at least one key.
pub fn check_references(references: &[Pubkey]) -> Result<(), WasmSolanaPayError> {
    if references.is_empty() {
        return Err(WasmSolanaPayError::EmptyReferences);
    }
    Ok(())
}

/// Associated token accounts are only derived for on-curve (wallet) owners.
pub fn check_token_owner(owner: &Pubkey) -> Result<(), WasmSolanaPayError> {
    if owner.is_on_curve() {
        Ok(())
    } else {
        Err(WasmSolanaPayError::AccountResolution(format!(
            "owner {} is off curve",
            owner
        )))
    }
}

/// Label, message and memo are optional; an empty string means absent.
pub fn normalize_text(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

/// Whether a query key belongs to the transfer request form.
pub fn is_transfer_param(key: &str) -> bool {
    TRANSFER_PARAM_KEYS.contains(&key)
}
