//! Error types for wasm-solana-pay

use wasm_bindgen::prelude::*;

/// Main error type for payment URL and transfer operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WasmSolanaPayError {
    /// Address is not valid base58 or does not decode to 32 bytes
    #[error("Malformed address: {0}")]
    MalformedAddress(String),
    /// Amount is not a non-negative decimal within protocol precision
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    /// Amount cannot be represented exactly in the target unit
    #[error("Precision overflow: {0}")]
    PrecisionOverflow(String),
    /// Associated token account could not be derived
    #[error("Account resolution failed: {0}")]
    AccountResolution(String),
    /// Building a transfer needs a concrete amount
    #[error("Transfer request has no amount")]
    MissingAmount,
    /// URL is neither a transfer request nor a transaction request
    #[error("Unsupported URL shape: {0}")]
    UnsupportedUrlShape(String),
    /// A reference set was given but holds no keys
    #[error("Reference set must not be empty")]
    EmptyReferences,
    /// Transaction does not satisfy the transfer request
    #[error("Transfer mismatch: {0}")]
    TransferMismatch(String),
    /// Transaction wire format or signature shape error
    #[error("Transaction error: {0}")]
    Transaction(String),
    /// Failure reported by the RPC collaborator
    #[error("RPC error: {0}")]
    Rpc(String),
    /// Signer cannot sign this transaction
    #[error("Signing error: {0}")]
    Signing(String),
}

// Converts to a JS Error with stack trace
impl From<WasmSolanaPayError> for JsValue {
    fn from(err: WasmSolanaPayError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WasmSolanaPayError::MalformedAddress("bad address".to_string());
        assert_eq!(err.to_string(), "Malformed address: bad address");
    }

    #[test]
    fn test_unit_variants_display() {
        assert_eq!(
            WasmSolanaPayError::MissingAmount.to_string(),
            "Transfer request has no amount"
        );
        assert_eq!(
            WasmSolanaPayError::EmptyReferences.to_string(),
            "Reference set must not be empty"
        );
    }
}
