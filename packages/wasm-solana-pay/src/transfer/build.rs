//! Transfer building implementation.
//!
//! Pure: every account is either given or derived, nothing is fetched.

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use super::types::{Mint, UnsignedTransfer};
use crate::amount::{Amount, NATIVE_DECIMALS};
use crate::error::WasmSolanaPayError;
use crate::instructions;
use crate::uri::TransferRequest;

/// Build the unsigned transfer described by `request`, paid by `payer`.
///
/// Token requests need the `mint` details; native requests ignore it.
/// References are appended to the transfer instruction as read-only,
/// non-signer accounts in request order, and a memo becomes a separate
/// instruction after the transfer.
pub fn build_transfer(
    payer: &Pubkey,
    request: &TransferRequest,
    mint: Option<&Mint>,
) -> Result<UnsignedTransfer, WasmSolanaPayError> {
    let amount = request.amount().ok_or(WasmSolanaPayError::MissingAmount)?;

    let mut transfer = match request.spl_token() {
        None => build_native_transfer(payer, request.recipient(), amount)?,
        Some(token) => {
            let mint = mint.ok_or_else(|| {
                WasmSolanaPayError::AccountResolution(format!(
                    "mint details required for token {}",
                    token
                ))
            })?;
            if mint.address != *token {
                return Err(WasmSolanaPayError::AccountResolution(format!(
                    "mint {} does not match requested token {}",
                    mint.address, token
                )));
            }
            build_token_transfer(payer, request.recipient(), mint, amount)?
        }
    };

    if let Some(references) = request.references() {
        transfer
            .accounts
            .extend(references.iter().map(|key| AccountMeta::new_readonly(*key, false)));
    }

    let mut ixs = vec![transfer];
    if let Some(memo) = request.memo() {
        ixs.push(instructions::memo(memo));
    }

    debug!(
        payer = %payer,
        recipient = %request.recipient(),
        amount = %amount,
        token = ?request.spl_token(),
        instructions = ixs.len(),
        "built transfer"
    );
    Ok(UnsignedTransfer::new(*payer, ixs))
}

fn build_native_transfer(
    payer: &Pubkey,
    recipient: &Pubkey,
    amount: Amount,
) -> Result<Instruction, WasmSolanaPayError> {
    let lamports = amount.to_base_units(NATIVE_DECIMALS)?;
    Ok(instructions::system_transfer(payer, recipient, lamports))
}

fn build_token_transfer(
    payer: &Pubkey,
    recipient: &Pubkey,
    mint: &Mint,
    amount: Amount,
) -> Result<Instruction, WasmSolanaPayError> {
    let units = amount.to_base_units(mint.decimals)?;

    let source = instructions::associated_token_address(payer, &mint.address, &mint.token_program)?;
    let destination =
        instructions::associated_token_address(recipient, &mint.address, &mint.token_program)?;

    Ok(instructions::transfer_checked(
        &mint.token_program,
        &source,
        &mint.address,
        &destination,
        payer,
        units,
        mint.decimals,
    ))
}
