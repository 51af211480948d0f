pub mod address;
pub mod config;
pub mod error;
pub mod manager;
pub mod policy;
pub mod source;
pub mod state;
pub mod store;
pub mod token;
pub mod types;
pub mod validator;

use error::Error;

// Re-exports for convenience
pub use config::CatalogConfig;
pub use manager::CatalogManager;
pub use policy::{Event, PolicyEngine};
pub use source::{ListSource, StaticListSource};
pub use state::CatalogState;
pub use store::{CatalogStore, ListEntry};
pub use token::{TokenCatalog, TokenLookupKey, TokenSource};
pub use types::{TokenEntry, TokenListDocument, Version};
pub use validator::{ListValidator, SchemaValidator};

/// Build one catalog from several token lists.
///
/// Fails on the first (chain id, address) pair that appears twice, across
/// or within lists; nothing is silently dropped.
pub fn build_catalog(documents: &[&TokenListDocument]) -> Result<TokenCatalog, Error> {
    Ok(TokenCatalog::from_documents(documents)?)
}

/// Validate raw list bytes and feed the outcome to the engine as a fetch
/// completion for `url`.
pub fn apply_fetched(
    engine: &PolicyEngine,
    state: &CatalogState,
    url: &str,
    request_id: &str,
    raw: &[u8],
    validator: &dyn ListValidator,
) -> CatalogState {
    let event = match validator.validate(raw) {
        Ok(document) => Event::FetchSucceeded {
            url: url.to_string(),
            request_id: request_id.to_string(),
            document,
        },
        Err(e) => Event::FetchFailed {
            url: url.to_string(),
            request_id: request_id.to_string(),
            message: Error::from(e).to_string(),
        },
    };
    engine.apply(state, event)
}
