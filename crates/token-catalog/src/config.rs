use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::token::TokenCatalog;
use crate::types::{TokenEntry, TokenListDocument, Version};

/// Chain id of LaChain mainnet.
pub const LACHAIN_CHAIN_ID: u64 = 274;

/// Chain id of the LaChain testnet.
pub const LACHAIN_TESTNET_CHAIN_ID: u64 = 418;

/// URL of the list bundled with the application and selected by default.
pub const DEFAULT_TOKEN_LIST_URL: &str = "tokens.uniswap.eth";

/// Lists registered on first start, before the user adds any.
pub const DEFAULT_LIST_OF_LISTS: &[&str] = &[
    DEFAULT_TOKEN_LIST_URL,
    "t2crtokens.eth",
    "tokens.1inch.eth",
    "synths.snx.eth",
    "tokenlist.dharma.eth",
    "defi.cmc.eth",
    "erc20.cmc.eth",
    "stablecoin.cmc.eth",
    "tokenlist.zerion.eth",
    "tokenlist.aave.eth",
    "https://tokens.coingecko.com/uniswap/all.json",
    "https://app.tryroll.com/tokens.json",
    "https://raw.githubusercontent.com/compound-finance/token-list/master/compound.tokenlist.json",
    "https://defiprime.com/defiprime.tokenlist.json",
    "https://umaproject.org/uma.tokenlist.json",
];

const BUNDLED_LOGO: &str = "https://exchange.sushiswap.org/images/tokens/SUSHI.png";

/// Policy configuration consumed by [`crate::policy::PolicyEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    /// When set, `fixed_document` replaces every fetch outcome.
    #[serde(default)]
    pub override_mode: bool,

    /// The operator-supplied list. Also the bundled list for `default_selected_url`.
    pub fixed_document: TokenListDocument,

    #[serde(default)]
    pub default_list_of_lists: Vec<String>,

    pub default_selected_url: String,
}

impl CatalogConfig {
    /// Parse a configuration from JSON and check it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.check()?;
        Ok(config)
    }

    /// The default selection must be one of the default lists, and the fixed
    /// document must form a valid catalog on its own.
    pub fn check(&self) -> Result<(), Error> {
        if self.default_selected_url.is_empty() {
            return Err(Error::Config("default selected URL is empty".to_string()));
        }
        if !self.default_list_of_lists.contains(&self.default_selected_url) {
            return Err(Error::Config(format!(
                "default selected URL {} is not in the default list of lists",
                self.default_selected_url
            )));
        }
        TokenCatalog::from_documents(&[&self.fixed_document])?;
        Ok(())
    }

    /// Standards-compliant behaviour: fetched lists are honoured.
    pub fn standard(bundled: TokenListDocument) -> Self {
        Self {
            override_mode: false,
            fixed_document: bundled,
            default_list_of_lists: DEFAULT_LIST_OF_LISTS.iter().map(|s| s.to_string()).collect(),
            default_selected_url: DEFAULT_TOKEN_LIST_URL.to_string(),
        }
    }

    /// The LaChain deployment: the bundled list always wins.
    pub fn lachain() -> Self {
        Self {
            override_mode: true,
            ..Self::standard(lachain_token_list())
        }
    }
}

/// The token list shipped with the LaChain exchange front end.
pub fn lachain_token_list() -> TokenListDocument {
    let tokens = [
        (
            "0x51115241c7b8361EeE88D8610f71d0A92cee5323",
            "USDC",
            "USD Coin (USDC)",
        ),
        (
            "0x7dC8b9e3B083C26C68f0B124cA923AaEc7FBee39",
            "USDT",
            "Tether USD (USDT)",
        ),
        ("0x2911a1AB18546cb501628Be8625C7503a2A7DB54", "WLAC", "WLAC"),
        ("0xDe09E74d4888Bc4e65F589e8c13Bce9F71DdF4c7", "UXD", "UXD"),
    ]
    .into_iter()
    .map(|(address, symbol, name)| {
        TokenEntry::new(LACHAIN_CHAIN_ID, address, 18, symbol, name).with_logo(BUNDLED_LOGO)
    })
    .collect();

    TokenListDocument {
        name: "SambaSwap Choices".to_string(),
        timestamp: "2020-09-01T00:00:00+00:00".to_string(),
        version: Version::new(1, 0, 0),
        tokens,
        logo_uri: None,
        keywords: Vec::new(),
    }
}
