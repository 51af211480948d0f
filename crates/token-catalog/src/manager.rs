use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::CatalogConfig;
use crate::error::Error;
use crate::policy::{Event, PolicyEngine};
use crate::source::ListSource;
use crate::state::CatalogState;
use crate::token::TokenCatalog;
use crate::types::TokenListDocument;
use crate::validator::ListValidator;

/// Owns a catalog state and applies events to it one at a time.
///
/// Fetches run without holding the state lock, so completions for different
/// URLs interleave in whatever order the source delivers them.
pub struct CatalogManager {
    engine: PolicyEngine,
    state: Mutex<CatalogState>,
}

impl CatalogManager {
    /// Start from the engine's initial state.
    pub fn new(config: CatalogConfig) -> Self {
        let engine = PolicyEngine::new(config);
        let state = engine.initial_state();
        Self {
            engine,
            state: Mutex::new(state),
        }
    }

    /// Resume from a persisted snapshot, reconciling it with the current
    /// configuration.
    pub fn restore(config: CatalogConfig, snapshot: &str) -> Result<Self, Error> {
        let engine = PolicyEngine::new(config);
        let restored = CatalogState::from_json(snapshot)?;
        let state = engine.apply(&restored, Event::GlobalVersionBump);
        info!(lists = state.by_url.len(), "token catalog restored");
        Ok(Self {
            engine,
            state: Mutex::new(state),
        })
    }

    pub fn engine(&self) -> &PolicyEngine {
        &self.engine
    }

    /// Apply one event and return the resulting snapshot.
    pub async fn dispatch(&self, event: Event) -> CatalogState {
        let mut state = self.state.lock().await;
        *state = self.engine.apply(&state, event);
        state.clone()
    }

    pub async fn snapshot(&self) -> CatalogState {
        self.state.lock().await.clone()
    }

    /// Serialize the current state for persistence.
    pub async fn save(&self) -> Result<String, Error> {
        self.state.lock().await.to_json()
    }

    /// Resolve the selected list into a lookup catalog.
    pub async fn selected_catalog(&self) -> Result<TokenCatalog, Error> {
        Ok(self.state.lock().await.selected_catalog()?)
    }

    /// Fetch, validate and record one list.
    ///
    /// The outcome is always recorded in the state; the returned value tells
    /// the caller what the source delivered.
    pub async fn refresh<S, V>(
        &self,
        url: &str,
        source: &S,
        validator: &V,
    ) -> Result<TokenListDocument, Error>
    where
        S: ListSource,
        V: ListValidator,
    {
        let request_id = Uuid::new_v4().to_string();
        self.dispatch(Event::FetchStarted {
            url: url.to_string(),
            request_id: request_id.clone(),
        })
        .await;

        let outcome = match source.fetch(url).await {
            Ok(raw) => validator.validate(&raw).map_err(Error::from),
            Err(e) => Err(Error::from(e)),
        };

        let event = match &outcome {
            Ok(document) => {
                debug!(%url, version = %document.version, tokens = document.tokens.len(), "token list fetched");
                Event::FetchSucceeded {
                    url: url.to_string(),
                    request_id,
                    document: document.clone(),
                }
            }
            Err(e) => Event::FetchFailed {
                url: url.to_string(),
                request_id,
                message: e.to_string(),
            },
        };
        self.dispatch(event).await;
        outcome
    }

    /// Refresh every tracked list in URL order.
    pub async fn refresh_all<S, V>(
        &self,
        source: &S,
        validator: &V,
    ) -> Vec<(String, Result<TokenListDocument, Error>)>
    where
        S: ListSource,
        V: ListValidator,
    {
        let urls: Vec<String> = self
            .snapshot()
            .await
            .by_url
            .urls()
            .map(str::to_string)
            .collect();

        let mut results = Vec::with_capacity(urls.len());
        for url in urls {
            let outcome = self.refresh(&url, source, validator).await;
            results.push((url, outcome));
        }
        results
    }
}
