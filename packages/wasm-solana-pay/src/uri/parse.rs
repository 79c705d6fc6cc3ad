//! URL parsing.
//!
//! Unknown query keys are ignored; recognised keys are validated strictly and
//! the first failure rejects the whole URL.

use percent_encoding::percent_decode_str;
use tracing::debug;
use url::Url;

use super::types::{PaymentRequest, TransactionRequest, TransferRequest};
use super::SOLANA_SCHEME;
use crate::amount::Amount;
use crate::error::WasmSolanaPayError;
use crate::reference::References;
use crate::validation;

/// Query values of interest, in first-seen order for repeated references.
#[derive(Debug, Default)]
struct QueryFields {
    amount: Option<String>,
    spl_token: Option<String>,
    references: Vec<String>,
    label: Option<String>,
    message: Option<String>,
    memo: Option<String>,
    has_transfer_params: bool,
}

impl QueryFields {
    fn collect(url: &Url) -> Self {
        let mut fields = QueryFields::default();
        for (key, value) in url.query_pairs() {
            if validation::is_transfer_param(&key) {
                fields.has_transfer_params = true;
            }
            let value = value.into_owned();
            match key.as_ref() {
                "amount" => {
                    fields.amount.get_or_insert(value);
                }
                "spl-token" => {
                    fields.spl_token.get_or_insert(value);
                }
                "reference" => fields.references.push(value),
                "label" => {
                    fields.label.get_or_insert(value);
                }
                "message" => {
                    fields.message.get_or_insert(value);
                }
                "memo" => {
                    fields.memo.get_or_insert(value);
                }
                // Unknown keys are ignored for forward compatibility
                _ => {}
            }
        }
        fields
    }
}

/// Parse a `solana:` URL into whichever request form it carries.
///
/// A path that percent-decodes to something containing `:` is a link and
/// yields a [`TransactionRequest`]; anything else must be a recipient address
/// and yields a [`TransferRequest`].
pub fn parse_url(input: &str) -> Result<PaymentRequest, WasmSolanaPayError> {
    let url = Url::parse(input)
        .map_err(|e| WasmSolanaPayError::UnsupportedUrlShape(format!("invalid URL: {}", e)))?;

    if url.scheme() != SOLANA_SCHEME {
        return Err(WasmSolanaPayError::UnsupportedUrlShape(format!(
            "scheme must be {}, got {}",
            SOLANA_SCHEME,
            url.scheme()
        )));
    }
    if !url.cannot_be_a_base() {
        return Err(WasmSolanaPayError::UnsupportedUrlShape(
            "URL must not have an authority".to_string(),
        ));
    }

    let path = percent_decode_str(url.path())
        .decode_utf8()
        .map_err(|e| WasmSolanaPayError::UnsupportedUrlShape(format!("invalid path: {}", e)))?;
    if path.is_empty() {
        return Err(WasmSolanaPayError::UnsupportedUrlShape(
            "missing recipient or link".to_string(),
        ));
    }

    let fields = QueryFields::collect(&url);

    if path.contains(':') {
        parse_transaction_request(&path, fields).map(PaymentRequest::Transaction)
    } else {
        parse_transfer_fields(&path, fields).map(PaymentRequest::Transfer)
    }
}

/// Parse a URL that must be a transfer request.
pub fn parse_transfer_request(input: &str) -> Result<TransferRequest, WasmSolanaPayError> {
    match parse_url(input)? {
        PaymentRequest::Transfer(request) => Ok(request),
        PaymentRequest::Transaction(_) => Err(WasmSolanaPayError::UnsupportedUrlShape(
            "expected a transfer request, found a transaction request".to_string(),
        )),
    }
}

fn parse_transfer_fields(
    path: &str,
    fields: QueryFields,
) -> Result<TransferRequest, WasmSolanaPayError> {
    let recipient = validation::parse_address(path)?;
    let mut builder = TransferRequest::builder(recipient);

    if let Some(amount) = fields.amount {
        builder = builder.amount(amount.parse::<Amount>()?);
    }

    if let Some(mint) = fields.spl_token {
        builder = builder.spl_token(validation::parse_address(&mint)?);
    }

    if !fields.references.is_empty() {
        builder = builder.references(References::from_base58(&fields.references)?);
    }

    if let Some(label) = fields.label {
        builder = builder.label(label);
    }
    if let Some(message) = fields.message {
        builder = builder.message(message);
    }
    if let Some(memo) = fields.memo {
        builder = builder.memo(memo);
    }

    let request = builder.build();
    debug!(
        recipient = %request.recipient(),
        token = ?request.spl_token(),
        references = request.references().map_or(0, |r| r.len()),
        "parsed transfer request"
    );
    Ok(request)
}

fn parse_transaction_request(
    link: &str,
    fields: QueryFields,
) -> Result<TransactionRequest, WasmSolanaPayError> {
    if fields.has_transfer_params {
        return Err(WasmSolanaPayError::UnsupportedUrlShape(
            "transaction request link cannot carry transfer parameters".to_string(),
        ));
    }

    let mut request = TransactionRequest::from_link(link)?;
    if let Some(label) = fields.label {
        request = request.with_label(label);
    }
    if let Some(message) = fields.message {
        request = request.with_message(message);
    }

    debug!(link = %request.link(), "parsed transaction request");
    Ok(request)
}
