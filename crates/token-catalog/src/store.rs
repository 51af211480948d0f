use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::TokenListDocument;

/// Fetch and acceptance state of one tracked list URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub current: Option<TokenListDocument>,
    pub pending_update: Option<TokenListDocument>,
    pub loading_request_id: Option<String>,
    pub error: Option<String>,
}

impl ListEntry {
    /// An entry whose accepted list is `document`, with nothing in flight.
    pub fn with_current(document: TokenListDocument) -> Self {
        Self {
            current: Some(document),
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading_request_id.is_some()
    }
}

/// URL-keyed table of list entries.
///
/// Entries are replaced wholesale; there is no per-field mutation API.
/// Iteration is in lexicographic URL order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogStore {
    entries: BTreeMap<String, ListEntry>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: &str) -> Option<&ListEntry> {
        self.entries.get(url)
    }

    pub fn put(&mut self, url: impl Into<String>, entry: ListEntry) {
        self.entries.insert(url.into(), entry);
    }

    /// Delete an entry, returning it. No-op if the URL is not tracked.
    pub fn remove(&mut self, url: &str) -> Option<ListEntry> {
        self.entries.remove(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ListEntry)> {
        self.entries.iter().map(|(url, entry)| (url.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_replaces_wholesale() {
        let mut store = CatalogStore::new();
        store.put(
            "a",
            ListEntry {
                error: Some("boom".to_string()),
                loading_request_id: Some("r1".to_string()),
                ..ListEntry::default()
            },
        );
        store.put("a", ListEntry::default());
        assert_eq!(store.get("a"), Some(&ListEntry::default()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut store = CatalogStore::new();
        assert!(store.remove("missing").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_urls_sorted() {
        let mut store = CatalogStore::new();
        store.put("https://b", ListEntry::default());
        store.put("https://a", ListEntry::default());
        store.put("ipns://c", ListEntry::default());
        let urls: Vec<&str> = store.urls().collect();
        assert_eq!(urls, vec!["https://a", "https://b", "ipns://c"]);
    }
}
