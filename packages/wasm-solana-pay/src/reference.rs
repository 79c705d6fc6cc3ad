//! Reference markers.
//!
//! References are read-only account keys added to a transfer purely so the
//! payment can be found later by scanning transaction account lists. The
//! order given by the merchant is kept everywhere: URL parameter order,
//! parsed order and instruction key order.

use solana_sdk::pubkey::Pubkey;

use crate::error::WasmSolanaPayError;
use crate::validation;

/// An ordered, non-empty set of reference keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct References(Vec<Pubkey>);

impl References {
    /// Create a reference set; an empty list is rejected.
    pub fn new(keys: Vec<Pubkey>) -> Result<Self, WasmSolanaPayError> {
        validation::check_references(&keys)?;
        Ok(References(keys))
    }

    /// Parse base58 keys in order.
    pub fn from_base58<I, S>(keys: I) -> Result<Self, WasmSolanaPayError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys = keys
            .into_iter()
            .map(|k| validation::parse_address(k.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        References::new(keys)
    }

    pub(crate) fn push(&mut self, key: Pubkey) {
        self.0.push(key);
    }

    pub fn as_slice(&self) -> &[Pubkey] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pubkey> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a constructed set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Pubkey> for References {
    fn from(key: Pubkey) -> Self {
        References(vec![key])
    }
}

impl TryFrom<Vec<Pubkey>> for References {
    type Error = WasmSolanaPayError;

    fn try_from(keys: Vec<Pubkey>) -> Result<Self, Self::Error> {
        References::new(keys)
    }
}

impl<'a> IntoIterator for &'a References {
    type Item = &'a Pubkey;
    type IntoIter = std::slice::Iter<'a, Pubkey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        assert_eq!(References::new(vec![]), Err(WasmSolanaPayError::EmptyReferences));
    }

    #[test]
    fn test_single_key() {
        let key = Pubkey::from([1u8; 32]);
        let refs = References::from(key);
        assert_eq!(refs.as_slice(), &[key]);
    }

    #[test]
    fn test_order_preserved() {
        let keys = vec![
            Pubkey::from([3u8; 32]),
            Pubkey::from([1u8; 32]),
            Pubkey::from([2u8; 32]),
        ];
        let refs = References::new(keys.clone()).unwrap();
        assert_eq!(refs.iter().copied().collect::<Vec<_>>(), keys);
    }

    #[test]
    fn test_from_base58_rejects_bad_entry() {
        let result = References::from_base58(["11111111111111111111111111111111", "nope"]);
        assert!(matches!(result, Err(WasmSolanaPayError::MalformedAddress(_))));
    }
}
