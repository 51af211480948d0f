use serde::{Deserialize, Serialize};

use crate::error::{DuplicateTokenError, Error};
use crate::store::{CatalogStore, ListEntry};
use crate::token::TokenCatalog;
use crate::types::TokenEntry;

/// Snapshot of every tracked list plus the user's selection.
///
/// Owned by whoever embeds the policy engine; consumers only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    pub by_url: CatalogStore,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_list_url: Option<String>,

    /// `None` for state restored from a snapshot that predates default
    /// list-of-lists tracking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_initialized_default_list_of_lists: Option<Vec<String>>,
}

impl CatalogState {
    /// Restore a persisted snapshot.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::State(e.to_string()))
    }

    /// Persist the state as JSON.
    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|e| Error::State(e.to_string()))
    }

    pub fn entry(&self, url: &str) -> Option<&ListEntry> {
        self.by_url.get(url)
    }

    pub fn selected_entry(&self) -> Option<&ListEntry> {
        self.selected_list_url
            .as_deref()
            .and_then(|url| self.by_url.get(url))
    }

    /// Tokens of the selected list's accepted document, or an empty slice.
    pub fn selected_tokens(&self) -> &[TokenEntry] {
        self.selected_entry()
            .and_then(|entry| entry.current.as_ref())
            .map(|doc| doc.tokens.as_slice())
            .unwrap_or_default()
    }

    /// Resolve the selected list into a lookup catalog.
    pub fn selected_catalog(&self) -> Result<TokenCatalog, DuplicateTokenError> {
        TokenCatalog::from_entries(self.selected_tokens().iter().cloned())
    }

    /// URLs that hold an update awaiting the user's acceptance.
    pub fn pending_updates(&self) -> impl Iterator<Item = &str> {
        self.by_url
            .iter()
            .filter(|(_, entry)| entry.pending_update.is_some())
            .map(|(url, _)| url)
    }

    /// URLs whose last fetch failed, with the recorded message.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_url
            .iter()
            .filter_map(|(url, entry)| entry.error.as_deref().map(|e| (url, e)))
    }
}
