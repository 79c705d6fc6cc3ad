//! Hand-off to the network.
//!
//! The crate never talks to a cluster itself. Callers plug in a
//! [`PaymentRpc`] (blockhash, submit, confirm) and a [`TransactionSigner`];
//! [`sign_and_send`] wires them around an [`UnsignedTransfer`].

use std::fmt::Display;

use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use tracing::{debug, warn};

use crate::error::WasmSolanaPayError;
use crate::transaction::TransactionExt;
use crate::transfer::UnsignedTransfer;

/// Minimal RPC surface needed to settle a transfer.
pub trait PaymentRpc {
    type Error: Display;

    fn latest_blockhash(&self) -> Result<Hash, Self::Error>;

    /// Submit signed wire bytes; returns the transaction signature.
    fn send_transaction(&self, transaction: &[u8]) -> Result<Signature, Self::Error>;

    /// Whether the transaction reached the caller's commitment level.
    fn confirm_transaction(&self, signature: &Signature) -> Result<bool, Self::Error>;
}

/// Something that can sign on behalf of a payer: a local keypair, a hardware
/// wallet bridge, a remote signer.
pub trait TransactionSigner {
    fn pubkey(&self) -> Pubkey;

    fn sign_message(&self, message: &[u8]) -> Result<Signature, WasmSolanaPayError>;
}

impl TransactionSigner for Keypair {
    fn pubkey(&self) -> Pubkey {
        Signer::pubkey(self)
    }

    fn sign_message(&self, message: &[u8]) -> Result<Signature, WasmSolanaPayError> {
        Ok(Signer::sign_message(self, message))
    }
}

fn rpc_error(e: impl Display) -> WasmSolanaPayError {
    WasmSolanaPayError::Rpc(e.to_string())
}

/// Compile, sign, submit and confirm a transfer. Nothing is retried.
pub fn sign_and_send<R, S>(
    rpc: &R,
    signer: &S,
    transfer: &UnsignedTransfer,
) -> Result<Signature, WasmSolanaPayError>
where
    R: PaymentRpc,
    S: TransactionSigner + ?Sized,
{
    let signer_key = signer.pubkey();
    if signer_key != *transfer.payer() {
        return Err(WasmSolanaPayError::Signing(format!(
            "signer {} is not the payer {}",
            signer_key,
            transfer.payer()
        )));
    }

    let blockhash = rpc.latest_blockhash().map_err(rpc_error)?;
    let mut tx = transfer.to_transaction(blockhash);

    let signature = signer.sign_message(&tx.signable_payload())?;
    tx.add_signature(&signer_key, signature.as_ref())?;

    let wire = TransactionExt::to_bytes(&tx)?;
    let sent = rpc.send_transaction(&wire).map_err(rpc_error)?;
    debug!(signature = %sent, blockhash = %blockhash, "transfer submitted");

    if !rpc.confirm_transaction(&sent).map_err(rpc_error)? {
        warn!(signature = %sent, "transfer not confirmed");
        return Err(WasmSolanaPayError::Rpc(format!(
            "transaction {} was not confirmed",
            sent
        )));
    }

    debug!(signature = %sent, "transfer confirmed");
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::KeypairExt;
    use crate::transaction::Transaction;
    use crate::transfer::build_transfer;
    use crate::uri::TransferRequest;
    use std::cell::RefCell;

    struct MockRpc {
        blockhash: Result<Hash, String>,
        confirmed: bool,
        sent: RefCell<Vec<Vec<u8>>>,
    }

    impl MockRpc {
        fn ok() -> Self {
            Self {
                blockhash: Ok(Hash::new_from_array([7u8; 32])),
                confirmed: true,
                sent: RefCell::new(vec![]),
            }
        }
    }

    impl PaymentRpc for MockRpc {
        type Error = String;

        fn latest_blockhash(&self) -> Result<Hash, String> {
            self.blockhash.clone()
        }

        fn send_transaction(&self, transaction: &[u8]) -> Result<Signature, String> {
            self.sent.borrow_mut().push(transaction.to_vec());
            let tx = Transaction::from_bytes(transaction).map_err(|e| e.to_string())?;
            Ok(tx.signatures[0])
        }

        fn confirm_transaction(&self, _signature: &Signature) -> Result<bool, String> {
            Ok(self.confirmed)
        }
    }

    fn keypair() -> Keypair {
        Keypair::from_seed_bytes(&[11u8; 32]).unwrap()
    }

    fn transfer_for(payer: &Pubkey) -> UnsignedTransfer {
        let request = TransferRequest::builder(Pubkey::from([2u8; 32]))
            .amount("1".parse().unwrap())
            .build();
        build_transfer(payer, &request, None).unwrap()
    }

    #[test]
    fn test_sign_and_send() {
        let rpc = MockRpc::ok();
        let keypair = keypair();
        let transfer = transfer_for(&keypair.address());

        let signature = sign_and_send(&rpc, &keypair, &transfer).unwrap();

        let sent = rpc.sent.borrow();
        assert_eq!(sent.len(), 1);
        let tx = Transaction::from_bytes(&sent[0]).unwrap();
        assert_eq!(tx.message.recent_blockhash, Hash::new_from_array([7u8; 32]));
        assert_eq!(tx.signatures[0], signature);
        assert_eq!(
            signature,
            Signer::sign_message(&keypair, &tx.signable_payload())
        );
    }

    #[test]
    fn test_rejects_foreign_signer() {
        let rpc = MockRpc::ok();
        let transfer = transfer_for(&Pubkey::from([1u8; 32]));
        assert!(matches!(
            sign_and_send(&rpc, &keypair(), &transfer),
            Err(WasmSolanaPayError::Signing(_))
        ));
        assert!(rpc.sent.borrow().is_empty());
    }

    #[test]
    fn test_rpc_failures_surface() {
        let keypair = keypair();
        let transfer = transfer_for(&keypair.address());

        let rpc = MockRpc {
            blockhash: Err("node unavailable".to_string()),
            ..MockRpc::ok()
        };
        assert_eq!(
            sign_and_send(&rpc, &keypair, &transfer),
            Err(WasmSolanaPayError::Rpc("node unavailable".to_string()))
        );

        let rpc = MockRpc {
            confirmed: false,
            ..MockRpc::ok()
        };
        assert!(matches!(
            sign_and_send(&rpc, &keypair, &transfer),
            Err(WasmSolanaPayError::Rpc(_))
        ));
    }
}
