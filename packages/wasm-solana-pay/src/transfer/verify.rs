//! Check a transaction against a transfer request.
//!
//! Works on the compiled message alone, so it can run before signing (a
//! wallet double-checking its own build) or after (a merchant inspecting what
//! was submitted), without any RPC access.

use solana_sdk::message::compiled_instruction::CompiledInstruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;
use solana_system_interface::instruction::SystemInstruction;
use spl_token::instruction::TokenInstruction;
use tracing::{debug, warn};

use crate::amount::NATIVE_DECIMALS;
use crate::error::WasmSolanaPayError;
use crate::instructions::{self, MEMO_PROGRAM, SYSTEM_PROGRAM};
use crate::uri::TransferRequest;

/// Number of accounts before the references in each transfer form.
const SYSTEM_TRANSFER_ACCOUNTS: usize = 2;
const TOKEN_TRANSFER_ACCOUNTS: usize = 4;

/// An instruction with its program and account indices resolved to keys.
struct ResolvedInstruction<'a> {
    program_id: Pubkey,
    accounts: Vec<Pubkey>,
    data: &'a [u8],
}

fn resolve<'a>(
    message: &Message,
    ix: &'a CompiledInstruction,
) -> Result<ResolvedInstruction<'a>, WasmSolanaPayError> {
    let key = |index: u8| {
        message
            .account_keys
            .get(index as usize)
            .copied()
            .ok_or_else(|| {
                WasmSolanaPayError::Transaction(format!("account index {} out of range", index))
            })
    };

    Ok(ResolvedInstruction {
        program_id: key(ix.program_id_index)?,
        accounts: ix.accounts.iter().map(|&i| key(i)).collect::<Result<_, _>>()?,
        data: &ix.data,
    })
}

fn mismatch(reason: String) -> WasmSolanaPayError {
    warn!(reason = %reason, "transfer does not match request");
    WasmSolanaPayError::TransferMismatch(reason)
}

/// Verify that `tx` carries the transfer described by `request`.
///
/// Checks the recipient (or its associated token account and the mint),
/// the amount when one is requested, the references after the functional
/// accounts, and the memo. Extra instructions are tolerated, including
/// transfers to other accounts.
pub fn verify_transfer(
    tx: &Transaction,
    request: &TransferRequest,
) -> Result<(), WasmSolanaPayError> {
    let resolved = tx
        .message
        .instructions
        .iter()
        .map(|ix| resolve(&tx.message, ix))
        .collect::<Result<Vec<_>, _>>()?;

    let trailing = match request.spl_token() {
        None => verify_native(&resolved, request)?,
        Some(mint) => verify_token(&resolved, request, mint)?,
    };

    let expected_references: &[Pubkey] = request.references().map_or(&[], |r| r.as_slice());
    if trailing != expected_references {
        return Err(mismatch(format!(
            "expected {} reference(s), found {} trailing account(s) in a different order or set",
            expected_references.len(),
            trailing.len()
        )));
    }

    if let Some(memo) = request.memo() {
        let found = resolved
            .iter()
            .any(|ix| ix.program_id == *MEMO_PROGRAM && ix.data == memo.as_bytes());
        if !found {
            return Err(mismatch(format!("memo '{}' not found", memo)));
        }
    }

    debug!(recipient = %request.recipient(), "transfer verified");
    Ok(())
}

/// Returns the transfer instruction's accounts after the functional ones.
///
/// The transfer to the recipient is the one checked; other system transfers
/// in the same transaction are ignored.
fn verify_native(
    resolved: &[ResolvedInstruction<'_>],
    request: &TransferRequest,
) -> Result<Vec<Pubkey>, WasmSolanaPayError> {
    let transfers: Vec<_> = resolved
        .iter()
        .filter(|ix| ix.program_id == *SYSTEM_PROGRAM)
        .filter(|ix| ix.accounts.len() >= SYSTEM_TRANSFER_ACCOUNTS)
        .filter_map(|ix| match instructions::decode_system_instruction(ix.data) {
            Ok(SystemInstruction::Transfer { lamports }) => Some((ix, lamports)),
            _ => None,
        })
        .collect();
    if transfers.is_empty() {
        return Err(mismatch("no system transfer instruction".to_string()));
    }

    let (ix, lamports) = transfers
        .into_iter()
        .find(|(ix, _)| ix.accounts[1] == *request.recipient())
        .ok_or_else(|| {
            mismatch(format!("no system transfer to recipient {}", request.recipient()))
        })?;

    if let Some(amount) = request.amount() {
        let expected = amount.to_base_units(NATIVE_DECIMALS)?;
        if lamports != expected {
            return Err(mismatch(format!(
                "transferred {} lamports, expected {}",
                lamports, expected
            )));
        }
    }

    Ok(ix.accounts[SYSTEM_TRANSFER_ACCOUNTS..].to_vec())
}

fn verify_token(
    resolved: &[ResolvedInstruction<'_>],
    request: &TransferRequest,
    mint: &Pubkey,
) -> Result<Vec<Pubkey>, WasmSolanaPayError> {
    let transfers: Vec<_> = resolved
        .iter()
        .filter(|ix| instructions::is_token_program(&ix.program_id))
        .filter(|ix| ix.accounts.len() >= TOKEN_TRANSFER_ACCOUNTS)
        .filter_map(|ix| match instructions::decode_token_instruction(ix.data) {
            Ok(TokenInstruction::TransferChecked { amount, decimals }) => {
                Some((ix, amount, decimals))
            }
            _ => None,
        })
        .collect();
    if transfers.is_empty() {
        return Err(mismatch("no token TransferChecked instruction".to_string()));
    }

    let mut matched = None;
    for (ix, units, decimals) in transfers {
        if ix.accounts[1] != *mint {
            continue;
        }
        let recipient_ata =
            instructions::associated_token_address(request.recipient(), mint, &ix.program_id)?;
        if ix.accounts[2] == recipient_ata {
            matched = Some((ix, units, decimals));
            break;
        }
    }
    let (ix, units, decimals) = matched.ok_or_else(|| {
        mismatch(format!(
            "no TransferChecked of mint {} to the token account of {}",
            mint,
            request.recipient()
        ))
    })?;

    if let Some(amount) = request.amount() {
        let expected = amount.to_base_units(decimals)?;
        if units != expected {
            return Err(mismatch(format!(
                "transferred {} base units, expected {}",
                units, expected
            )));
        }
    }

    Ok(ix.accounts[TOKEN_TRANSFER_ACCOUNTS..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::transfer::{build_transfer, Mint};
    use solana_sdk::hash::Hash;
    use solana_sdk::instruction::Instruction;

    const PAYER: &str = "FKjSjCqByQRwSzZoMXA7bKnDbJe41YgJTHFFzBeC42bH";
    const RECIPIENT: &str = "mvines9iiHiQTysrwkJjGf2gb9Ex9jXJX8ns3qwf2kN";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn payer() -> Pubkey {
        PAYER.parse().unwrap()
    }

    fn recipient() -> Pubkey {
        RECIPIENT.parse().unwrap()
    }

    fn usdc() -> Mint {
        Mint::new(USDC.parse().unwrap(), 6)
    }

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn compile(request: &TransferRequest, mint: Option<&Mint>) -> Transaction {
        build_transfer(&payer(), request, mint)
            .unwrap()
            .into_transaction(Hash::new_from_array([1u8; 32]))
    }

    #[test]
    fn test_verify_native_with_references_and_memo() {
        let request = TransferRequest::builder(recipient())
            .amount(amount("0.01"))
            .reference(Pubkey::from([1u8; 32]))
            .reference(Pubkey::from([2u8; 32]))
            .memo("OrderId1234")
            .build();
        let tx = compile(&request, None);
        assert_eq!(verify_transfer(&tx, &request), Ok(()));
    }

    #[test]
    fn test_verify_token() {
        let request = TransferRequest::builder(recipient())
            .amount(amount("0.01"))
            .spl_token(usdc().address)
            .reference(Pubkey::from([1u8; 32]))
            .build();
        let tx = compile(&request, Some(&usdc()));
        assert_eq!(verify_transfer(&tx, &request), Ok(()));
    }

    #[test]
    fn test_verify_without_amount_accepts_any_amount() {
        let built = TransferRequest::builder(recipient()).amount(amount("3")).build();
        let tx = compile(&built, None);
        let open = TransferRequest::builder(recipient()).build();
        assert_eq!(verify_transfer(&tx, &open), Ok(()));
    }

    #[test]
    fn test_verify_amount_mismatch() {
        let built = TransferRequest::builder(recipient()).amount(amount("1")).build();
        let tx = compile(&built, None);
        let expected = TransferRequest::builder(recipient()).amount(amount("2")).build();
        assert!(matches!(
            verify_transfer(&tx, &expected),
            Err(WasmSolanaPayError::TransferMismatch(_))
        ));
    }

    #[test]
    fn test_verify_recipient_mismatch() {
        let built = TransferRequest::builder(recipient()).amount(amount("1")).build();
        let tx = compile(&built, None);
        let expected = TransferRequest::builder(Pubkey::from([5u8; 32]))
            .amount(amount("1"))
            .build();
        assert!(matches!(
            verify_transfer(&tx, &expected),
            Err(WasmSolanaPayError::TransferMismatch(_))
        ));
    }

    #[test]
    fn test_verify_reference_order_matters() {
        let a = Pubkey::from([1u8; 32]);
        let b = Pubkey::from([2u8; 32]);
        let built = TransferRequest::builder(recipient())
            .amount(amount("1"))
            .reference(a)
            .reference(b)
            .build();
        let tx = compile(&built, None);
        let swapped = TransferRequest::builder(recipient())
            .amount(amount("1"))
            .reference(b)
            .reference(a)
            .build();
        assert!(matches!(
            verify_transfer(&tx, &swapped),
            Err(WasmSolanaPayError::TransferMismatch(_))
        ));
    }

    #[test]
    fn test_verify_missing_memo() {
        let built = TransferRequest::builder(recipient()).amount(amount("1")).build();
        let tx = compile(&built, None);
        let with_memo = TransferRequest::builder(recipient())
            .amount(amount("1"))
            .memo("OrderId1234")
            .build();
        assert!(matches!(
            verify_transfer(&tx, &with_memo),
            Err(WasmSolanaPayError::TransferMismatch(_))
        ));
    }

    #[test]
    fn test_verify_native_request_against_token_transfer() {
        let token = TransferRequest::builder(recipient())
            .amount(amount("1"))
            .spl_token(usdc().address)
            .build();
        let tx = compile(&token, Some(&usdc()));
        let native = TransferRequest::builder(recipient()).amount(amount("1")).build();
        assert!(matches!(
            verify_transfer(&tx, &native),
            Err(WasmSolanaPayError::TransferMismatch(_))
        ));
    }

    fn compile_after(
        request: &TransferRequest,
        mint: Option<&Mint>,
        leading: Instruction,
    ) -> Transaction {
        let transfer = build_transfer(&payer(), request, mint).unwrap();
        let mut ixs = vec![leading];
        ixs.extend(transfer.instructions().iter().cloned());
        let message =
            Message::new_with_blockhash(&ixs, Some(&payer()), &Hash::new_from_array([1u8; 32]));
        Transaction::new_unsigned(message)
    }

    #[test]
    fn test_verify_native_skips_unrelated_transfer() {
        let request = TransferRequest::builder(recipient())
            .amount(amount("0.01"))
            .reference(Pubkey::from([1u8; 32]))
            .build();
        let tip = instructions::system_transfer(&payer(), &Pubkey::from([9u8; 32]), 5);
        let tx = compile_after(&request, None, tip);
        assert_eq!(verify_transfer(&tx, &request), Ok(()));
    }

    #[test]
    fn test_verify_token_skips_unrelated_transfer() {
        let request = TransferRequest::builder(recipient())
            .amount(amount("0.01"))
            .spl_token(usdc().address)
            .build();
        let fee = instructions::transfer_checked(
            &instructions::TOKEN_PROGRAM,
            &Pubkey::from([7u8; 32]),
            &usdc().address,
            &Pubkey::from([8u8; 32]),
            &payer(),
            1,
            6,
        );
        let tx = compile_after(&request, Some(&usdc()), fee);
        assert_eq!(verify_transfer(&tx, &request), Ok(()));
    }

    #[test]
    fn test_verify_only_unrelated_transfer_is_mismatch() {
        let request = TransferRequest::builder(recipient()).amount(amount("1")).build();
        let other =
            instructions::system_transfer(&payer(), &Pubkey::from([9u8; 32]), 1_000_000_000);
        let message = Message::new_with_blockhash(
            &[other],
            Some(&payer()),
            &Hash::new_from_array([1u8; 32]),
        );
        let tx = Transaction::new_unsigned(message);
        assert!(matches!(
            verify_transfer(&tx, &request),
            Err(WasmSolanaPayError::TransferMismatch(_))
        ));
    }
}
