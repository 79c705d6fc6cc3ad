//! WASM binding for the `solana:` URL codec.
//!
//! Fields come in as plain JS objects (camelCase keys) and parsed URLs go
//! back out the same way, tagged with `type`.

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::error::WasmSolanaPayError;
use crate::reference::References;
use crate::uri::{self, PaymentRequest, TransactionRequest, TransferRequest};
use crate::validation;
use crate::wasm::try_into_js_value::{js_obj, JsConversionError};

/// `reference` may be one key or a list of keys.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReferenceField {
    One(String),
    Many(Vec<String>),
}

impl ReferenceField {
    fn into_references(self) -> Result<References, WasmSolanaPayError> {
        match self {
            ReferenceField::One(key) => References::from_base58([key]),
            ReferenceField::Many(keys) => References::from_base58(keys),
        }
    }
}

/// Transfer request as passed from JavaScript.
///
/// `amount` is a decimal string; numbers are not accepted so no binary
/// float ever reaches an amount.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequestFields {
    pub recipient: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub spl_token: Option<String>,
    #[serde(default)]
    pub reference: Option<ReferenceField>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl TransferRequestFields {
    pub fn into_request(self) -> Result<TransferRequest, WasmSolanaPayError> {
        let mut builder = TransferRequest::builder(validation::parse_address(&self.recipient)?);
        if let Some(amount) = self.amount {
            builder = builder.amount(amount.parse()?);
        }
        if let Some(mint) = self.spl_token {
            builder = builder.spl_token(validation::parse_address(&mint)?);
        }
        if let Some(reference) = self.reference {
            builder = builder.references(reference.into_references()?);
        }
        if let Some(label) = self.label {
            builder = builder.label(label);
        }
        if let Some(message) = self.message {
            builder = builder.message(message);
        }
        if let Some(memo) = self.memo {
            builder = builder.memo(memo);
        }
        Ok(builder.build())
    }
}

/// Transaction request as passed from JavaScript.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequestFields {
    pub link: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl TransactionRequestFields {
    pub fn into_request(self) -> Result<TransactionRequest, WasmSolanaPayError> {
        let mut request = TransactionRequest::from_link(&self.link)?;
        if let Some(label) = self.label {
            request = request.with_label(label);
        }
        if let Some(message) = self.message {
            request = request.with_message(message);
        }
        Ok(request)
    }
}

fn payment_request_to_js(request: &PaymentRequest) -> Result<JsValue, JsConversionError> {
    match request {
        PaymentRequest::Transfer(r) => js_obj! {
            "type" => "transfer",
            "recipient" => r.recipient().to_string(),
            "amount" => r.amount().map(|a| a.to_string()),
            "splToken" => r.spl_token().map(|m| m.to_string()),
            "reference" => r
                .references()
                .map(|refs| refs.iter().map(|k| k.to_string()).collect::<Vec<_>>()),
            "label" => r.label().map(str::to_string),
            "message" => r.message().map(str::to_string),
            "memo" => r.memo().map(str::to_string),
        },
        PaymentRequest::Transaction(r) => js_obj! {
            "type" => "transaction",
            "link" => r.link().to_string(),
            "label" => r.label().map(str::to_string),
            "message" => r.message().map(str::to_string),
        },
    }
}

/// Namespace for `solana:` URL encoding and parsing.
#[wasm_bindgen]
pub struct UrlNamespace;

#[wasm_bindgen]
impl UrlNamespace {
    /// Encode a transfer request.
    ///
    /// ```json
    /// {
    ///   "recipient": "mvines9iiHiQTysrwkJjGf2gb9Ex9jXJX8ns3qwf2kN",
    ///   "amount": "0.01",
    ///   "splToken": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
    ///   "reference": ["..."],
    ///   "label": "Michael",
    ///   "message": "Thanks for all the fish",
    ///   "memo": "OrderId1234"
    /// }
    /// ```
    ///
    /// @param fields - Transfer request fields; only `recipient` is required
    /// @returns The `solana:` URL
    #[wasm_bindgen]
    pub fn encode_transfer_request(fields: JsValue) -> Result<String, JsValue> {
        let fields: TransferRequestFields = serde_wasm_bindgen::from_value(fields)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse transfer request: {}", e)))?;
        Ok(uri::encode_transfer_request(&fields.into_request()?))
    }

    /// Encode a transaction request (`{ link, label?, message? }`).
    #[wasm_bindgen]
    pub fn encode_transaction_request(fields: JsValue) -> Result<String, JsValue> {
        let fields: TransactionRequestFields = serde_wasm_bindgen::from_value(fields).map_err(
            |e| JsValue::from_str(&format!("Failed to parse transaction request: {}", e)),
        )?;
        Ok(uri::encode_transaction_request(&fields.into_request()?))
    }

    /// Parse a `solana:` URL.
    ///
    /// Returns `{ type: "transfer", recipient, amount?, splToken?, reference?, label?, message?, memo? }`
    /// or `{ type: "transaction", link, label?, message? }`. `reference` is
    /// always an array when present.
    #[wasm_bindgen]
    pub fn parse_url(url: &str) -> Result<JsValue, JsValue> {
        let request = uri::parse_url(url)?;
        Ok(payment_request_to_js(&request)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RECIPIENT: &str = "mvines9iiHiQTysrwkJjGf2gb9Ex9jXJX8ns3qwf2kN";

    #[test]
    fn test_reference_accepts_string_or_list() {
        let one: TransferRequestFields = serde_json::from_value(json!({
            "recipient": RECIPIENT,
            "reference": RECIPIENT,
        }))
        .unwrap();
        assert_eq!(one.into_request().unwrap().references().unwrap().len(), 1);

        let many: TransferRequestFields = serde_json::from_value(json!({
            "recipient": RECIPIENT,
            "reference": [RECIPIENT, "11111111111111111111111111111111"],
        }))
        .unwrap();
        assert_eq!(many.into_request().unwrap().references().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_reference_list_rejected() {
        let fields: TransferRequestFields = serde_json::from_value(json!({
            "recipient": RECIPIENT,
            "reference": [],
        }))
        .unwrap();
        assert_eq!(fields.into_request(), Err(WasmSolanaPayError::EmptyReferences));
    }

    #[test]
    fn test_fields_encode_native_scenario() {
        let fields: TransferRequestFields = serde_json::from_value(json!({
            "recipient": RECIPIENT,
            "amount": "0.01",
            "label": "Michael",
            "message": "Thanks for all the fish",
            "memo": "OrderId1234",
        }))
        .unwrap();
        assert_eq!(
            fields.into_request().unwrap().to_url(),
            "solana:mvines9iiHiQTysrwkJjGf2gb9Ex9jXJX8ns3qwf2kN?amount=0.01&label=Michael&message=Thanks%20for%20all%20the%20fish&memo=OrderId1234"
        );
    }

    #[test]
    fn test_numeric_amount_rejected() {
        let result: Result<TransferRequestFields, _> = serde_json::from_value(json!({
            "recipient": RECIPIENT,
            "amount": 0.01,
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_transaction_fields() {
        let fields: TransactionRequestFields = serde_json::from_value(json!({
            "link": "https://example.com/pay",
            "label": "Shop",
        }))
        .unwrap();
        let request = fields.into_request().unwrap();
        assert_eq!(request.label(), Some("Shop"));
        assert_eq!(request.message(), None);
    }
}
