use std::collections::BTreeMap;

use crate::address;
use crate::error::DuplicateTokenError;
use crate::types::{TokenEntry, TokenListDocument};

/// Normalized token lookup key (CAIP-19 style: `eip155:{chain_id}/erc20:{address}`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenLookupKey(pub String);

impl TokenLookupKey {
    /// Create a lookup key from chain ID and address.
    pub fn new(chain_id: u64, address: &str) -> Self {
        let addr = address::normalize(address);
        Self(format!("eip155:{chain_id}/erc20:{addr}"))
    }
}

/// Trait for token metadata providers.
pub trait TokenSource {
    fn lookup(&self, key: &TokenLookupKey) -> Option<&TokenEntry>;
}

/// A resolved token catalog: at most one entry per (chain id, address).
///
/// Construction fails on the first duplicate rather than keeping either copy.
#[derive(Debug, Clone, Default)]
pub struct TokenCatalog {
    tokens: BTreeMap<TokenLookupKey, TokenEntry>,
}

impl TokenCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entries, rejecting duplicate (chain id, address) pairs.
    pub fn from_entries<I>(entries: I) -> Result<Self, DuplicateTokenError>
    where
        I: IntoIterator<Item = TokenEntry>,
    {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry)?;
        }
        Ok(catalog)
    }

    /// Merge the tokens of several documents into one catalog.
    pub fn from_documents(documents: &[&TokenListDocument]) -> Result<Self, DuplicateTokenError> {
        Self::from_entries(
            documents
                .iter()
                .flat_map(|doc| doc.tokens.iter().cloned()),
        )
    }

    /// Add a token. Fails if its (chain id, address) pair is already present.
    pub fn insert(&mut self, entry: TokenEntry) -> Result<(), DuplicateTokenError> {
        let key = TokenLookupKey::new(entry.chain_id, &entry.address);
        if self.tokens.contains_key(&key) {
            return Err(DuplicateTokenError {
                chain_id: entry.chain_id,
                address: entry.address,
            });
        }
        self.tokens.insert(key, entry);
        Ok(())
    }

    pub fn get(&self, chain_id: u64, address: &str) -> Option<&TokenEntry> {
        self.tokens.get(&TokenLookupKey::new(chain_id, address))
    }

    pub fn tokens_for_chain(&self, chain_id: u64) -> impl Iterator<Item = &TokenEntry> {
        self.tokens.values().filter(move |t| t.chain_id == chain_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenEntry> {
        self.tokens.values()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl TokenSource for TokenCatalog {
    fn lookup(&self, key: &TokenLookupKey) -> Option<&TokenEntry> {
        self.tokens.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_rejected() {
        let result = TokenCatalog::from_entries(vec![
            TokenEntry::new(274, "0xABC", 18, "A", "Token A"),
            TokenEntry::new(274, "0xABC", 6, "B", "Token B"),
        ]);
        assert_eq!(
            result.unwrap_err(),
            DuplicateTokenError {
                chain_id: 274,
                address: "0xABC".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_detection_ignores_address_case() {
        let result = TokenCatalog::from_entries(vec![
            TokenEntry::new(274, "0xDe09E74d4888Bc4e65F589e8c13Bce9F71DdF4c7", 18, "UXD", "UXD"),
            TokenEntry::new(274, "0xde09e74d4888bc4e65f589e8c13bce9f71ddf4c7", 18, "UXD", "UXD"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_same_address_on_different_chains() {
        let catalog = TokenCatalog::from_entries(vec![
            TokenEntry::new(274, "0xabc", 18, "WETH", "Wrapped LAC"),
            TokenEntry::new(418, "0xabc", 18, "WETH", "Wrapped LAC"),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.tokens_for_chain(418).count(), 1);
    }

    #[test]
    fn test_lookup_case_insensitive() {
        let catalog = TokenCatalog::from_entries(vec![TokenEntry::new(
            1,
            "0xdAC17F958D2ee523a2206206994597C13D831ec7",
            6,
            "USDT",
            "Tether USD",
        )])
        .unwrap();
        let key = TokenLookupKey::new(1, "0xDAC17F958D2EE523A2206206994597C13D831EC7");
        assert_eq!(catalog.lookup(&key).map(|t| t.decimals), Some(6));
        assert!(catalog.get(5, "0xdac17f958d2ee523a2206206994597c13d831ec7").is_none());
    }
}
