//! Types for transfer building.

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::error::WasmSolanaPayError;
use crate::instructions::TOKEN_PROGRAM;

/// Token mint details the caller already knows.
///
/// The builder never looks these up; a wallet fetches the mint account once
/// and passes the result in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mint {
    pub address: Pubkey,
    pub decimals: u8,
    /// SPL Token by default; Token-2022 mints set this explicitly.
    pub token_program: Pubkey,
}

impl Mint {
    pub fn new(address: Pubkey, decimals: u8) -> Self {
        Self {
            address,
            decimals,
            token_program: *TOKEN_PROGRAM,
        }
    }

    pub fn with_token_program(mut self, token_program: Pubkey) -> Self {
        self.token_program = token_program;
        self
    }
}

/// Ordered instructions for a transfer, not yet tied to a blockhash.
///
/// The first instruction is always the transfer itself; a memo, when
/// requested, follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransfer {
    payer: Pubkey,
    instructions: Vec<Instruction>,
}

impl UnsignedTransfer {
    pub(crate) fn new(payer: Pubkey, instructions: Vec<Instruction>) -> Self {
        Self {
            payer,
            instructions,
        }
    }

    /// Fee payer and transfer authority.
    pub fn payer(&self) -> &Pubkey {
        &self.payer
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// The system or token transfer instruction.
    pub fn transfer_instruction(&self) -> &Instruction {
        &self.instructions[0]
    }

    /// Every key the transfer touches, payer first, then in instruction
    /// order (accounts before program id). Each key appears once.
    pub fn account_keys(&self) -> Vec<Pubkey> {
        let mut keys = vec![self.payer];
        for ix in &self.instructions {
            for key in ix.accounts.iter().map(|meta| &meta.pubkey).chain([&ix.program_id]) {
                if !keys.contains(key) {
                    keys.push(*key);
                }
            }
        }
        keys
    }

    /// Compile into an unsigned legacy transaction paid by the payer.
    pub fn to_transaction(&self, blockhash: Hash) -> Transaction {
        let message = Message::new_with_blockhash(&self.instructions, Some(&self.payer), &blockhash);
        Transaction::new_unsigned(message)
    }

    pub fn into_transaction(self, blockhash: Hash) -> Transaction {
        self.to_transaction(blockhash)
    }

    /// Unsigned transaction in wire format.
    pub fn to_bytes(&self, blockhash: Hash) -> Result<Vec<u8>, WasmSolanaPayError> {
        bincode::serialize(&self.to_transaction(blockhash))
            .map_err(|e| WasmSolanaPayError::Transaction(format!("Serialize: {}", e)))
    }
}
