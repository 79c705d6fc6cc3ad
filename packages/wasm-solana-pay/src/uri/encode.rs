//! URL encoding.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;
use url::Position;

use super::types::{PaymentRequest, TransactionRequest, TransferRequest};
use super::SOLANA_PROTOCOL;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

fn append_query(url: &mut String, params: &[(&str, String)]) {
    if params.is_empty() {
        return;
    }
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode_component(value)))
        .collect::<Vec<_>>()
        .join("&");
    url.push('?');
    url.push_str(&query);
}

/// Encode a transfer request.
///
/// Parameters are always emitted in the order `amount`, `spl-token`,
/// `reference` (one entry per key, in order), `label`, `message`, `memo`.
pub fn encode_transfer_request(request: &TransferRequest) -> String {
    let mut url = format!(
        "{}{}",
        SOLANA_PROTOCOL,
        encode_component(&request.recipient().to_string())
    );

    let mut params: Vec<(&str, String)> = Vec::new();

    if let Some(amount) = request.amount() {
        params.push(("amount", amount.to_string()));
    }

    if let Some(mint) = request.spl_token() {
        params.push(("spl-token", mint.to_string()));
    }

    if let Some(references) = request.references() {
        for key in references {
            params.push(("reference", key.to_string()));
        }
    }

    if let Some(label) = request.label() {
        params.push(("label", label.to_string()));
    }

    if let Some(message) = request.message() {
        params.push(("message", message.to_string()));
    }

    if let Some(memo) = request.memo() {
        params.push(("memo", memo.to_string()));
    }

    append_query(&mut url, &params);

    debug!(
        recipient = %request.recipient(),
        params = params.len(),
        "encoded transfer request"
    );
    url
}

/// Encode a transaction request.
///
/// A trailing `/` on the link's path is dropped, so `https://example.com/`
/// is written as `https://example.com`. The query and fragment are kept as
/// given.
pub fn encode_transaction_request(request: &TransactionRequest) -> String {
    let link = request.link();
    let through_path = &link[..Position::AfterPath];
    let rest = &link[Position::AfterPath..];
    let link_str = format!(
        "{}{}",
        through_path.strip_suffix('/').unwrap_or(through_path),
        rest
    );

    let mut url = format!("{}{}", SOLANA_PROTOCOL, encode_component(&link_str));

    let mut params: Vec<(&str, String)> = Vec::new();
    if let Some(label) = request.label() {
        params.push(("label", label.to_string()));
    }
    if let Some(message) = request.message() {
        params.push(("message", message.to_string()));
    }
    append_query(&mut url, &params);

    debug!(link = %link, "encoded transaction request");
    url
}

/// Encode either request form.
pub fn encode_url(request: &PaymentRequest) -> String {
    match request {
        PaymentRequest::Transfer(request) => encode_transfer_request(request),
        PaymentRequest::Transaction(request) => encode_transaction_request(request),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::pubkey::{Pubkey, PubkeyExt};

    const RECIPIENT: &str = "mvines9iiHiQTysrwkJjGf2gb9Ex9jXJX8ns3qwf2kN";
    const USDC: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn recipient() -> Pubkey {
        Pubkey::from_base58(RECIPIENT).unwrap()
    }

    #[test]
    fn test_encode_native_scenario() {
        let request = TransferRequest::builder(recipient())
            .amount("0.01".parse::<Amount>().unwrap())
            .label("Michael")
            .message("Thanks for all the fish")
            .memo("OrderId1234")
            .build();

        assert_eq!(
            encode_transfer_request(&request),
            "solana:mvines9iiHiQTysrwkJjGf2gb9Ex9jXJX8ns3qwf2kN?amount=0.01&label=Michael&message=Thanks%20for%20all%20the%20fish&memo=OrderId1234"
        );
    }

    #[test]
    fn test_encode_token_scenario() {
        let request = TransferRequest::builder(recipient())
            .amount("0.01".parse::<Amount>().unwrap())
            .spl_token(Pubkey::from_base58(USDC).unwrap())
            .label("Michael")
            .message("Thanks for all the fish")
            .memo("OrderId5678")
            .build();

        assert_eq!(
            encode_transfer_request(&request),
            "solana:mvines9iiHiQTysrwkJjGf2gb9Ex9jXJX8ns3qwf2kN?amount=0.01&spl-token=EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v&label=Michael&message=Thanks%20for%20all%20the%20fish&memo=OrderId5678"
        );
    }

    #[test]
    fn test_encode_recipient_only() {
        let request = TransferRequest::builder(recipient()).build();
        assert_eq!(encode_transfer_request(&request), format!("solana:{}", RECIPIENT));
    }

    #[test]
    fn test_encode_references_in_order() {
        let a = Pubkey::from([1u8; 32]);
        let b = Pubkey::from([2u8; 32]);
        let request = TransferRequest::builder(recipient())
            .reference(b)
            .reference(a)
            .build();

        let url = encode_transfer_request(&request);
        let expected = format!("solana:{}?reference={}&reference={}", RECIPIENT, b, a);
        assert_eq!(url, expected);
    }

    #[test]
    fn test_encode_is_idempotent() {
        let request = TransferRequest::builder(recipient())
            .amount("1.5".parse::<Amount>().unwrap())
            .memo("#42 & more")
            .build();
        assert_eq!(encode_transfer_request(&request), encode_transfer_request(&request));
    }

    #[test]
    fn test_encode_component_matches_encode_uri_component() {
        assert_eq!(encode_component("a b"), "a%20b");
        assert_eq!(encode_component("-_.!~*'()"), "-_.!~*'()");
        assert_eq!(encode_component("&=?/#+"), "%26%3D%3F%2F%23%2B");
        assert_eq!(encode_component("café"), "caf%C3%A9");
    }

    #[test]
    fn test_encode_transaction_request() {
        let request = TransactionRequest::from_link("https://example.com/pay")
            .unwrap()
            .with_label("Shop")
            .with_message("Order 7");
        assert_eq!(
            encode_transaction_request(&request),
            "solana:https%3A%2F%2Fexample.com%2Fpay?label=Shop&message=Order%207"
        );
    }

    #[test]
    fn test_encode_transaction_request_link_normalisation() {
        let bare = TransactionRequest::from_link("https://example.com").unwrap();
        assert_eq!(encode_transaction_request(&bare), "solana:https%3A%2F%2Fexample.com");

        let with_query = TransactionRequest::from_link("https://example.com/?order=1").unwrap();
        assert_eq!(
            encode_transaction_request(&with_query),
            "solana:https%3A%2F%2Fexample.com%3Forder%3D1"
        );
    }

    #[test]
    fn test_encode_transaction_request_keeps_query_slashes() {
        let request =
            TransactionRequest::from_link("https://example.com/pay?next=/?x=1").unwrap();
        assert_eq!(
            encode_transaction_request(&request),
            "solana:https%3A%2F%2Fexample.com%2Fpay%3Fnext%3D%2F%3Fx%3D1"
        );

        let trailing =
            TransactionRequest::from_link("https://example.com/pay/?next=/?x=1").unwrap();
        assert_eq!(
            encode_transaction_request(&trailing),
            "solana:https%3A%2F%2Fexample.com%2Fpay%3Fnext%3D%2F%3Fx%3D1"
        );
    }
}
