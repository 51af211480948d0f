use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::state::CatalogState;
use crate::store::ListEntry;
use crate::types::TokenListDocument;

/// A state transition request for the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    FetchStarted {
        url: String,
        request_id: String,
    },
    FetchSucceeded {
        url: String,
        request_id: String,
        document: TokenListDocument,
    },
    FetchFailed {
        url: String,
        request_id: String,
        message: String,
    },
    AcceptPendingUpdate {
        url: String,
    },
    SelectList {
        url: String,
    },
    AddList {
        url: String,
    },
    RemoveList {
        url: String,
    },
    GlobalVersionBump,
}

impl Event {
    /// The list URL this event targets, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Event::FetchStarted { url, .. }
            | Event::FetchSucceeded { url, .. }
            | Event::FetchFailed { url, .. }
            | Event::AcceptPendingUpdate { url }
            | Event::SelectList { url }
            | Event::AddList { url }
            | Event::RemoveList { url } => Some(url.as_str()),
            Event::GlobalVersionBump => None,
        }
    }
}

/// Decides how the catalog evolves for each event.
///
/// `apply` is a pure function of (state, event). Callers serialize access to
/// the state they feed it; the engine holds no state of its own besides the
/// configuration.
#[derive(Debug, Clone)]
pub struct PolicyEngine {
    config: CatalogConfig,
}

impl PolicyEngine {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// State before any event: the default list of lists registered and the
    /// bundled list selected.
    pub fn initial_state(&self) -> CatalogState {
        let mut state = CatalogState {
            selected_list_url: Some(self.config.default_selected_url.clone()),
            last_initialized_default_list_of_lists: Some(self.config.default_list_of_lists.clone()),
            ..CatalogState::default()
        };
        for url in &self.config.default_list_of_lists {
            state.by_url.put(url.as_str(), self.new_entry());
        }
        state.by_url.put(
            self.config.default_selected_url.as_str(),
            ListEntry::with_current(self.config.fixed_document.clone()),
        );
        state
    }

    /// Produce the state that follows `event`.
    pub fn apply(&self, state: &CatalogState, event: Event) -> CatalogState {
        let mut next = state.clone();
        self.reduce(&mut next, event);
        if self.config.override_mode {
            self.enforce_override(&mut next);
        }
        next
    }

    /// Fold a sequence of events, in order.
    pub fn apply_all<I>(&self, state: &CatalogState, events: I) -> CatalogState
    where
        I: IntoIterator<Item = Event>,
    {
        events
            .into_iter()
            .fold(state.clone(), |acc, event| self.apply(&acc, event))
    }

    fn reduce(&self, state: &mut CatalogState, event: Event) {
        match event {
            Event::FetchStarted { url, request_id } => {
                debug!(%url, %request_id, "token list fetch started");
                let entry = self.entry_or_new(state, &url);
                let current = if self.config.override_mode {
                    Some(self.config.fixed_document.clone())
                } else {
                    entry.current
                };
                state.by_url.put(
                    url,
                    ListEntry {
                        current,
                        pending_update: None,
                        loading_request_id: Some(request_id),
                        error: None,
                    },
                );
            }
            Event::FetchSucceeded {
                url,
                request_id,
                document,
            } => self.fetch_succeeded(state, url, request_id, document),
            Event::FetchFailed {
                url,
                request_id,
                message,
            } => self.fetch_failed(state, url, request_id, message),
            Event::AcceptPendingUpdate { url } => {
                let Some(entry) = state.by_url.get(&url).cloned() else {
                    debug!(%url, "accept for untracked list ignored");
                    return;
                };
                if self.config.override_mode {
                    state.by_url.put(url, self.forced(entry));
                    return;
                }
                match entry.pending_update {
                    Some(update) => {
                        info!(%url, version = %update.version, "token list update accepted");
                        state.by_url.put(
                            url,
                            ListEntry {
                                current: Some(update),
                                pending_update: None,
                                ..entry
                            },
                        );
                    }
                    None => debug!(%url, "no pending update to accept"),
                }
            }
            Event::SelectList { url } => {
                if !state.by_url.contains(&url) {
                    state.by_url.put(url.as_str(), self.new_entry());
                }
                state.selected_list_url = Some(url);
            }
            Event::AddList { url } => {
                if !state.by_url.contains(&url) {
                    state.by_url.put(url, self.new_entry());
                }
            }
            Event::RemoveList { url } => remove_list(state, &url),
            Event::GlobalVersionBump => self.version_bump(state),
        }
    }

    fn fetch_succeeded(
        &self,
        state: &mut CatalogState,
        url: String,
        request_id: String,
        document: TokenListDocument,
    ) {
        let entry = self.entry_or_new(state, &url);

        if self.config.override_mode {
            debug!(%url, %request_id, fetched = %document.name, "fetched list replaced by fixed list");
            state.by_url.put(
                url,
                ListEntry {
                    loading_request_id: None,
                    error: None,
                    ..self.forced(entry)
                },
            );
            return;
        }

        if is_stale(&entry, &request_id) {
            warn!(%url, %request_id, "stale fetch completion discarded");
            return;
        }

        let (current, pending_update) = match entry.current {
            None => (Some(document), None),
            Some(current) => {
                let upgrade = current.version.upgrade_to(&document.version);
                if document.version > current.version {
                    debug!(
                        %url,
                        from = %current.version,
                        to = %document.version,
                        ?upgrade,
                        "token list update pending"
                    );
                    (Some(current), Some(document))
                } else {
                    debug!(%url, version = %document.version, "fetched list is not newer");
                    (Some(current), entry.pending_update)
                }
            }
        };

        state.by_url.put(
            url,
            ListEntry {
                current,
                pending_update,
                loading_request_id: None,
                error: None,
            },
        );
    }

    fn fetch_failed(
        &self,
        state: &mut CatalogState,
        url: String,
        request_id: String,
        message: String,
    ) {
        let entry = self.entry_or_new(state, &url);

        if !self.config.override_mode && is_stale(&entry, &request_id) {
            warn!(%url, %request_id, "stale fetch failure discarded");
            return;
        }

        warn!(%url, %request_id, error = %message, "token list fetch failed");
        let entry = if self.config.override_mode {
            self.forced(entry)
        } else {
            entry
        };
        state.by_url.put(
            url,
            ListEntry {
                loading_request_id: None,
                error: Some(message),
                ..entry
            },
        );
    }

    fn version_bump(&self, state: &mut CatalogState) {
        let defaults = &self.config.default_list_of_lists;

        let previous = state
            .last_initialized_default_list_of_lists
            .take()
            .unwrap_or_default();
        for url in defaults {
            if !previous.contains(url) && !state.by_url.contains(url) {
                debug!(%url, "new default list registered");
                state.by_url.put(url.as_str(), self.new_entry());
            }
        }

        let urls: Vec<String> = state.by_url.urls().map(str::to_string).collect();
        for url in urls {
            if let Some(entry) = state.by_url.get(&url).cloned() {
                let entry = if self.config.override_mode {
                    self.forced(entry)
                } else {
                    ListEntry {
                        pending_update: None,
                        ..entry
                    }
                };
                state.by_url.put(url, entry);
            }
        }

        state.last_initialized_default_list_of_lists = Some(defaults.clone());
    }

    /// Every tracked list holds the fixed document and no pending update.
    fn enforce_override(&self, state: &mut CatalogState) {
        let drifted: Vec<String> = state
            .by_url
            .iter()
            .filter(|(_, entry)| {
                entry.current.as_ref() != Some(&self.config.fixed_document)
                    || entry.pending_update.is_some()
            })
            .map(|(url, _)| url.to_string())
            .collect();
        for url in drifted {
            if let Some(entry) = state.by_url.get(&url).cloned() {
                state.by_url.put(url, self.forced(entry));
            }
        }
    }

    fn forced(&self, entry: ListEntry) -> ListEntry {
        ListEntry {
            current: Some(self.config.fixed_document.clone()),
            pending_update: None,
            ..entry
        }
    }

    /// Entry created when a URL is first registered.
    fn new_entry(&self) -> ListEntry {
        if self.config.override_mode {
            ListEntry::with_current(self.config.fixed_document.clone())
        } else {
            ListEntry::default()
        }
    }

    fn entry_or_new(&self, state: &CatalogState, url: &str) -> ListEntry {
        state
            .by_url
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.new_entry())
    }
}

/// A completion is stale when a different request is in flight for the URL.
fn is_stale(entry: &ListEntry, request_id: &str) -> bool {
    entry
        .loading_request_id
        .as_deref()
        .is_some_and(|loading| loading != request_id)
}

/// Drop a list; a removed selection falls back to the first remaining URL.
fn remove_list(state: &mut CatalogState, url: &str) {
    state.by_url.remove(url);
    if state.selected_list_url.as_deref() == Some(url) {
        state.selected_list_url = state.by_url.urls().next().map(str::to_string);
        debug!(%url, fallback = ?state.selected_list_url, "selected list removed");
    }
}
