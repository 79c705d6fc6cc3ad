//! Structured payment requests carried by `solana:` URLs.

use std::fmt;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;
use url::Url;

use super::{encode, parse, HTTPS_SCHEME};
use crate::amount::Amount;
use crate::error::WasmSolanaPayError;
use crate::reference::References;
use crate::validation::normalize_text;

/// A transfer request: the wallet builds the transfer itself.
///
/// Construct with [`TransferRequest::builder`]. Fields are read-only once
/// built; empty label/message/memo strings are dropped so that encoding and
/// parsing agree on what "absent" means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    recipient: Pubkey,
    amount: Option<Amount>,
    spl_token: Option<Pubkey>,
    references: Option<References>,
    label: Option<String>,
    message: Option<String>,
    memo: Option<String>,
}

impl TransferRequest {
    pub fn builder(recipient: Pubkey) -> TransferRequestBuilder {
        TransferRequestBuilder::new(recipient)
    }

    /// Native SOL account or token owner receiving the payment.
    pub fn recipient(&self) -> &Pubkey {
        &self.recipient
    }

    /// Amount in user units. `None` lets the wallet ask the payer.
    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    /// SPL token mint. `None` means native SOL.
    pub fn spl_token(&self) -> Option<&Pubkey> {
        self.spl_token.as_ref()
    }

    pub fn references(&self) -> Option<&References> {
        self.references.as_ref()
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Memo written on chain by the memo program.
    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    /// Encode as a `solana:` URL.
    pub fn to_url(&self) -> String {
        encode::encode_transfer_request(self)
    }
}

impl fmt::Display for TransferRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

impl FromStr for TransferRequest {
    type Err = WasmSolanaPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_transfer_request(s)
    }
}

/// Builder for [`TransferRequest`].
#[derive(Debug, Clone)]
pub struct TransferRequestBuilder {
    recipient: Pubkey,
    amount: Option<Amount>,
    spl_token: Option<Pubkey>,
    references: Option<References>,
    label: Option<String>,
    message: Option<String>,
    memo: Option<String>,
}

impl TransferRequestBuilder {
    pub fn new(recipient: Pubkey) -> Self {
        Self {
            recipient,
            amount: None,
            spl_token: None,
            references: None,
            label: None,
            message: None,
            memo: None,
        }
    }

    pub fn amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn spl_token(mut self, mint: Pubkey) -> Self {
        self.spl_token = Some(mint);
        self
    }

    /// Replace the reference set.
    pub fn references(mut self, references: References) -> Self {
        self.references = Some(references);
        self
    }

    /// Append one reference after any already set.
    pub fn reference(mut self, key: Pubkey) -> Self {
        match self.references.as_mut() {
            Some(references) => references.push(key),
            None => self.references = Some(References::from(key)),
        }
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = normalize_text(Some(label.into()));
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = normalize_text(Some(message.into()));
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = normalize_text(Some(memo.into()));
        self
    }

    pub fn build(self) -> TransferRequest {
        TransferRequest {
            recipient: self.recipient,
            amount: self.amount,
            spl_token: self.spl_token,
            references: self.references,
            label: self.label,
            message: self.message,
            memo: self.memo,
        }
    }
}

/// A transaction request: the wallet fetches a ready-made transaction from
/// `link`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    link: Url,
    label: Option<String>,
    message: Option<String>,
}

impl TransactionRequest {
    /// Create a request for an `https` link.
    pub fn new(link: Url) -> Result<Self, WasmSolanaPayError> {
        if link.scheme() != HTTPS_SCHEME {
            return Err(WasmSolanaPayError::UnsupportedUrlShape(format!(
                "link must use https, got {}",
                link.scheme()
            )));
        }
        Ok(Self {
            link,
            label: None,
            message: None,
        })
    }

    /// Parse and validate a link string.
    pub fn from_link(link: &str) -> Result<Self, WasmSolanaPayError> {
        let url = Url::parse(link).map_err(|e| {
            WasmSolanaPayError::UnsupportedUrlShape(format!("invalid link '{}': {}", link, e))
        })?;
        TransactionRequest::new(url)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = normalize_text(Some(label.into()));
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = normalize_text(Some(message.into()));
        self
    }

    pub fn link(&self) -> &Url {
        &self.link
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Encode as a `solana:` URL.
    pub fn to_url(&self) -> String {
        encode::encode_transaction_request(self)
    }
}

impl fmt::Display for TransactionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// Either form of `solana:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentRequest {
    Transfer(TransferRequest),
    Transaction(TransactionRequest),
}

impl PaymentRequest {
    pub fn to_url(&self) -> String {
        match self {
            PaymentRequest::Transfer(request) => request.to_url(),
            PaymentRequest::Transaction(request) => request.to_url(),
        }
    }

    pub fn as_transfer(&self) -> Option<&TransferRequest> {
        match self {
            PaymentRequest::Transfer(request) => Some(request),
            PaymentRequest::Transaction(_) => None,
        }
    }

    pub fn as_transaction(&self) -> Option<&TransactionRequest> {
        match self {
            PaymentRequest::Transfer(_) => None,
            PaymentRequest::Transaction(request) => Some(request),
        }
    }
}

impl From<TransferRequest> for PaymentRequest {
    fn from(request: TransferRequest) -> Self {
        PaymentRequest::Transfer(request)
    }
}

impl From<TransactionRequest> for PaymentRequest {
    fn from(request: TransactionRequest) -> Self {
        PaymentRequest::Transaction(request)
    }
}

impl fmt::Display for PaymentRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_url())
    }
}

impl FromStr for PaymentRequest {
    type Err = WasmSolanaPayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::parse_url(s)
    }
}
