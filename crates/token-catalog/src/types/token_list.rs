use serde::{Deserialize, Serialize};

use super::version::Version;

/// A versioned token-list document, in the Uniswap token-list JSON layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenListDocument {
    pub name: String,

    /// RFC 3339 timestamp of the list revision.
    pub timestamp: String,

    pub version: Version,

    pub tokens: Vec<TokenEntry>,

    #[serde(rename = "logoURI")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

/// A single token within a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEntry {
    #[serde(rename = "chainId")]
    pub chain_id: u64,

    pub address: String,

    pub symbol: String,

    pub name: String,

    pub decimals: u8,

    #[serde(rename = "logoURI")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_uri: Option<String>,
}

impl TokenListDocument {
    /// Parse a document from JSON without schema checks.
    ///
    /// Use [`crate::validator::SchemaValidator`] for untrusted input.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the document to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Tokens deployed on the given chain, in list order.
    pub fn tokens_for_chain(&self, chain_id: u64) -> impl Iterator<Item = &TokenEntry> {
        self.tokens.iter().filter(move |t| t.chain_id == chain_id)
    }
}

impl TokenEntry {
    pub fn new(chain_id: u64, address: &str, decimals: u8, symbol: &str, name: &str) -> Self {
        Self {
            chain_id,
            address: address.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            decimals,
            logo_uri: None,
        }
    }

    pub fn with_logo(mut self, logo_uri: &str) -> Self {
        self.logo_uri = Some(logo_uri.to_string());
        self
    }
}
