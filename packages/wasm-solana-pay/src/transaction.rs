//! Wire-format helpers for compiled transfers.
//!
//! A built transfer leaves the crate as a legacy `Transaction`. Wallets sign
//! it (here or elsewhere) and merchants may hand one back for verification,
//! so both directions of the bincode wire format are covered, plus base64
//! for JSON transport.

use base64::prelude::*;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;

use crate::error::WasmSolanaPayError;

/// Re-export the underlying Solana Transaction type.
pub use solana_sdk::transaction::Transaction;

/// Ed25519 signature length.
const SIGNATURE_LEN: usize = 64;

/// Extension trait for Transaction to add WASM-friendly methods.
pub trait TransactionExt {
    /// Deserialize a transaction from raw bytes (wire format).
    fn from_bytes(bytes: &[u8]) -> Result<Transaction, WasmSolanaPayError>;

    /// Deserialize from standard base64 wire bytes.
    fn from_base64(encoded: &str) -> Result<Transaction, WasmSolanaPayError>;

    /// Serialize transaction to bytes (wire format).
    fn to_bytes(&self) -> Result<Vec<u8>, WasmSolanaPayError>;

    fn to_base64(&self) -> Result<String, WasmSolanaPayError>;

    /// Fee payer address as base58, if the message has any keys.
    fn fee_payer_string(&self) -> Option<String>;

    /// The message bytes a signer signs.
    fn signable_payload(&self) -> Vec<u8>;

    /// Position of `pubkey` among the required signers.
    fn signer_index(&self, pubkey: &Pubkey) -> Option<usize>;

    /// Place a 64-byte Ed25519 signature at the signer's index.
    fn add_signature(&mut self, pubkey: &Pubkey, signature: &[u8])
        -> Result<(), WasmSolanaPayError>;
}

impl TransactionExt for Transaction {
    fn from_bytes(bytes: &[u8]) -> Result<Transaction, WasmSolanaPayError> {
        bincode::deserialize(bytes).map_err(|e| {
            WasmSolanaPayError::Transaction(format!("Failed to deserialize transaction: {}", e))
        })
    }

    fn from_base64(encoded: &str) -> Result<Transaction, WasmSolanaPayError> {
        let bytes = BASE64_STANDARD
            .decode(encoded)
            .map_err(|e| WasmSolanaPayError::Transaction(format!("Invalid base64: {}", e)))?;
        Transaction::from_bytes(&bytes)
    }

    fn to_bytes(&self) -> Result<Vec<u8>, WasmSolanaPayError> {
        bincode::serialize(self).map_err(|e| {
            WasmSolanaPayError::Transaction(format!("Failed to serialize transaction: {}", e))
        })
    }

    fn to_base64(&self) -> Result<String, WasmSolanaPayError> {
        Ok(BASE64_STANDARD.encode(TransactionExt::to_bytes(self)?))
    }

    fn fee_payer_string(&self) -> Option<String> {
        self.message.account_keys.first().map(|p| p.to_string())
    }

    fn signable_payload(&self) -> Vec<u8> {
        self.message.serialize()
    }

    fn signer_index(&self, pubkey: &Pubkey) -> Option<usize> {
        let num_signers = self.message.header.num_required_signatures as usize;
        self.message
            .account_keys
            .iter()
            .take(num_signers)
            .position(|key| key == pubkey)
    }

    fn add_signature(
        &mut self,
        pubkey: &Pubkey,
        signature: &[u8],
    ) -> Result<(), WasmSolanaPayError> {
        let bytes: [u8; SIGNATURE_LEN] = signature.try_into().map_err(|_| {
            WasmSolanaPayError::Transaction(format!(
                "Invalid signature length: expected {} bytes, got {}",
                SIGNATURE_LEN,
                signature.len()
            ))
        })?;

        let index = self.signer_index(pubkey).ok_or_else(|| {
            WasmSolanaPayError::Transaction(format!("{} is not a required signer", pubkey))
        })?;

        let num_signers = self.message.header.num_required_signatures as usize;
        if self.signatures.len() < num_signers {
            self.signatures.resize(num_signers, Signature::default());
        }
        self.signatures[index] = Signature::from(bytes);
        Ok(())
    }
}
