//! Program IDs and the instructions a Solana Pay transfer is made of.
//!
//! Builders return `solana_sdk` instructions; decoders are the inverse used
//! when checking a transaction against a request.

use std::sync::LazyLock;

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_system_interface::instruction::{self as system_ix, SystemInstruction};
use spl_token::instruction::TokenInstruction;

use crate::error::WasmSolanaPayError;
use crate::validation;

/// Program IDs as base58 strings
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";
pub const TOKEN_PROGRAM_ID: &str = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
pub const TOKEN_2022_PROGRAM_ID: &str = "TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb";
pub const ASSOCIATED_TOKEN_PROGRAM_ID: &str = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL";
pub const MEMO_PROGRAM_ID: &str = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr";

fn program_id(id: &str) -> Pubkey {
    id.parse().expect("valid program id constant")
}

pub static SYSTEM_PROGRAM: LazyLock<Pubkey> = LazyLock::new(|| program_id(SYSTEM_PROGRAM_ID));
pub static TOKEN_PROGRAM: LazyLock<Pubkey> = LazyLock::new(|| program_id(TOKEN_PROGRAM_ID));
pub static TOKEN_2022_PROGRAM: LazyLock<Pubkey> =
    LazyLock::new(|| program_id(TOKEN_2022_PROGRAM_ID));
pub static ASSOCIATED_TOKEN_PROGRAM: LazyLock<Pubkey> =
    LazyLock::new(|| program_id(ASSOCIATED_TOKEN_PROGRAM_ID));
pub static MEMO_PROGRAM: LazyLock<Pubkey> = LazyLock::new(|| program_id(MEMO_PROGRAM_ID));

/// SPL Token and Token-2022 share the `TransferChecked` layout.
pub fn is_token_program(program_id: &Pubkey) -> bool {
    *program_id == *TOKEN_PROGRAM || *program_id == *TOKEN_2022_PROGRAM
}

/// Derive the associated token account of `owner` for `mint`.
///
/// Pure address derivation; the account may not exist on chain yet.
pub fn associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey, WasmSolanaPayError> {
    validation::check_token_owner(owner)?;

    let seeds = &[owner.as_ref(), token_program.as_ref(), mint.as_ref()];
    Pubkey::try_find_program_address(seeds, &ASSOCIATED_TOKEN_PROGRAM)
        .map(|(ata, _bump)| ata)
        .ok_or_else(|| {
            WasmSolanaPayError::AccountResolution(format!(
                "no associated token address for owner {} and mint {}",
                owner, mint
            ))
        })
}

/// Native SOL transfer.
pub fn system_transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    system_ix::transfer(from, to, lamports)
}

/// SPL `TransferChecked`.
///
/// Accounts: `[source (w), mint (r), destination (w), authority (signer)]`.
pub fn transfer_checked(
    token_program: &Pubkey,
    source: &Pubkey,
    mint: &Pubkey,
    destination: &Pubkey,
    authority: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Instruction {
    let data = TokenInstruction::TransferChecked { amount, decimals }.pack();
    Instruction::new_with_bytes(
        *token_program,
        &data,
        vec![
            AccountMeta::new(*source, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*authority, true),
        ],
    )
}

/// Memo program instruction carrying the UTF-8 bytes of `text`.
pub fn memo(text: &str) -> Instruction {
    Instruction::new_with_bytes(*MEMO_PROGRAM, text.as_bytes(), vec![])
}

/// Decode a System program instruction from raw bytes.
pub fn decode_system_instruction(data: &[u8]) -> Result<SystemInstruction, WasmSolanaPayError> {
    bincode::deserialize(data).map_err(|e| {
        WasmSolanaPayError::Transaction(format!("Failed to decode System instruction: {}", e))
    })
}

/// Decode an SPL Token instruction from raw bytes.
pub fn decode_token_instruction(data: &[u8]) -> Result<TokenInstruction<'_>, WasmSolanaPayError> {
    TokenInstruction::unpack(data).map_err(|e| {
        WasmSolanaPayError::Transaction(format!("Failed to decode Token instruction: {}", e))
    })
}
