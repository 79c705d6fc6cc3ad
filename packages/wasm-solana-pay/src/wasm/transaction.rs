//! WASM bindings for built and received transactions.

use solana_sdk::message::Message;
use wasm_bindgen::prelude::*;

use crate::error::WasmSolanaPayError;
use crate::pubkey::{Pubkey, PubkeyExt};
use crate::transaction::{Transaction, TransactionExt};
use crate::wasm::try_into_js_value::{js_obj, JsConversionError, TryIntoJsValue};

/// One account of a decoded instruction.
struct AccountView {
    pubkey: String,
    is_signer: bool,
    is_writable: bool,
}

impl TryIntoJsValue for AccountView {
    fn try_to_js_value(&self) -> Result<JsValue, JsConversionError> {
        js_obj! {
            "pubkey" => self.pubkey.clone(),
            "isSigner" => self.is_signer,
            "isWritable" => self.is_writable,
        }
    }
}

/// Signer and writable flags follow from the key's position and the header:
/// writable signers, read-only signers, writable non-signers, read-only
/// non-signers.
fn account_flags(message: &Message, index: usize) -> (bool, bool) {
    let header = &message.header;
    let signers = header.num_required_signatures as usize;
    let readonly_signed = header.num_readonly_signed_accounts as usize;
    let readonly_unsigned = header.num_readonly_unsigned_accounts as usize;
    let total = message.account_keys.len();

    if index < signers {
        (true, index < signers.saturating_sub(readonly_signed))
    } else {
        (false, index < total.saturating_sub(readonly_unsigned))
    }
}

/// WASM wrapper for a legacy Solana transaction.
#[wasm_bindgen]
pub struct WasmTransaction {
    inner: Transaction,
}

#[wasm_bindgen]
impl WasmTransaction {
    /// Deserialize a transaction from a base64-encoded string.
    #[wasm_bindgen]
    pub fn from_base64(base64_str: &str) -> Result<WasmTransaction, WasmSolanaPayError> {
        Transaction::from_base64(base64_str).map(WasmTransaction::from_inner)
    }

    /// Deserialize a transaction from raw bytes.
    #[wasm_bindgen]
    pub fn from_bytes(bytes: &[u8]) -> Result<WasmTransaction, WasmSolanaPayError> {
        Transaction::from_bytes(bytes).map(WasmTransaction::from_inner)
    }

    #[wasm_bindgen(getter)]
    pub fn fee_payer(&self) -> Option<String> {
        self.inner.fee_payer_string()
    }

    #[wasm_bindgen(getter)]
    pub fn recent_blockhash(&self) -> String {
        self.inner.message.recent_blockhash.to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn num_instructions(&self) -> usize {
        self.inner.message.instructions.len()
    }

    #[wasm_bindgen(getter)]
    pub fn num_signatures(&self) -> usize {
        self.inner.signatures.len()
    }

    /// The serialized message that signers sign.
    #[wasm_bindgen]
    pub fn signable_payload(&self) -> js_sys::Uint8Array {
        js_sys::Uint8Array::from(&self.inner.signable_payload()[..])
    }

    #[wasm_bindgen]
    pub fn to_bytes(&self) -> Result<js_sys::Uint8Array, WasmSolanaPayError> {
        let bytes = TransactionExt::to_bytes(&self.inner)?;
        Ok(js_sys::Uint8Array::from(&bytes[..]))
    }

    #[wasm_bindgen]
    pub fn to_base64(&self) -> Result<String, WasmSolanaPayError> {
        self.inner.to_base64()
    }

    /// All account keys as base58 strings, in message order.
    #[wasm_bindgen]
    pub fn account_keys(&self) -> js_sys::Array {
        self.inner
            .message
            .account_keys
            .iter()
            .map(|key| JsValue::from_str(&key.to_string()))
            .collect()
    }

    /// Signature at `index` as base58, or `undefined`.
    #[wasm_bindgen]
    pub fn signature_at(&self, index: usize) -> Option<String> {
        self.inner.signatures.get(index).map(|s| s.to_string())
    }

    /// Place an externally produced 64-byte signature for `pubkey`.
    #[wasm_bindgen]
    pub fn add_signature(&mut self, pubkey: &str, signature: &[u8]) -> Result<(), WasmSolanaPayError> {
        let signer = Pubkey::from_base58(pubkey)?;
        self.inner.add_signature(&signer, signature)
    }

    /// All instructions as `{ programId, accounts: [{ pubkey, isSigner, isWritable }], data }`.
    #[wasm_bindgen]
    pub fn instructions(&self) -> Result<js_sys::Array, JsValue> {
        let msg = &self.inner.message;
        let arr = js_sys::Array::new();
        for ix in &msg.instructions {
            let key = |index: u8| {
                msg.account_keys.get(index as usize).ok_or_else(|| {
                    WasmSolanaPayError::Transaction(format!("account index {} out of range", index))
                })
            };

            let program_id = key(ix.program_id_index)?;
            let accounts = ix
                .accounts
                .iter()
                .map(|&index| {
                    let (is_signer, is_writable) = account_flags(msg, index as usize);
                    Ok(AccountView {
                        pubkey: key(index)?.to_string(),
                        is_signer,
                        is_writable,
                    })
                })
                .collect::<Result<Vec<_>, WasmSolanaPayError>>()?;

            let obj = js_obj! {
                "programId" => program_id.to_string(),
                "accounts" => accounts,
                "data" => js_sys::Uint8Array::from(&ix.data[..]),
            }?;
            arr.push(&obj);
        }
        Ok(arr)
    }
}

impl WasmTransaction {
    pub fn from_inner(inner: Transaction) -> Self {
        WasmTransaction { inner }
    }

    /// Get the inner Transaction for internal Rust use.
    pub fn inner(&self) -> &Transaction {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::build_transfer;
    use crate::uri::TransferRequest;
    use solana_sdk::hash::Hash;

    fn sample() -> Transaction {
        let payer = Pubkey::from([1u8; 32]);
        let request = TransferRequest::builder(Pubkey::from([2u8; 32]))
            .amount("1".parse().unwrap())
            .reference(Pubkey::from([3u8; 32]))
            .build();
        build_transfer(&payer, &request, None)
            .unwrap()
            .into_transaction(Hash::default())
    }

    #[test]
    fn test_account_flags_follow_header() {
        let tx = sample();
        let msg = &tx.message;
        // payer, recipient, then read-only reference and system program
        assert_eq!(account_flags(msg, 0), (true, true));
        assert_eq!(account_flags(msg, 1), (false, true));
        for index in 2..msg.account_keys.len() {
            assert_eq!(account_flags(msg, index), (false, false));
        }
    }
}
