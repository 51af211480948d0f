use thiserror::Error;

/// Unified error type for the token catalog library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    DuplicateToken(#[from] DuplicateTokenError),

    #[error("state error: {0}")]
    State(String),

    #[error("config error: {0}")]
    Config(String),
}

/// Transport-level failures while retrieving a token list.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("list not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("network error: {0}")]
    Network(String),
}

/// Token-list documents that do not conform to the list schema.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("invalid list name: {0:?}")]
    InvalidName(String),

    #[error("invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("token count {count} outside 1..={max}")]
    TokenCount { count: usize, max: usize },

    #[error("token #{index}: {reason}")]
    InvalidToken { index: usize, reason: String },
}

/// Two catalog entries share a (chain id, address) pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate token on chain {chain_id}: {address}")]
pub struct DuplicateTokenError {
    pub chain_id: u64,
    pub address: String,
}

/// Errors parsing an EVM address string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("missing 0x prefix: {0}")]
    MissingPrefix(String),

    #[error("expected 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("checksum mismatch: {0}")]
    BadChecksum(String),
}
