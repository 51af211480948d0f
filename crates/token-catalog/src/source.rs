use std::collections::HashMap;
use std::future::Future;

use crate::error::FetchError;

/// Trait for token-list sources (bundled fixtures, HTTP, IPFS gateways, etc.).
///
/// Sources return the raw document bytes; schema checks happen in a
/// [`crate::validator::ListValidator`].
pub trait ListSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Static in-memory list source for testing.
pub struct StaticListSource {
    /// Map of list URL → canned response.
    responses: HashMap<String, Result<Vec<u8>, FetchError>>,
}

impl StaticListSource {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    /// Serve `json` for `url`.
    pub fn add_json(&mut self, url: &str, json: &str) {
        self.responses
            .insert(url.to_string(), Ok(json.as_bytes().to_vec()));
    }

    /// Fail every fetch of `url` with `error`.
    pub fn add_error(&mut self, url: &str, error: FetchError) {
        self.responses.insert(url.to_string(), Err(error));
    }
}

impl Default for StaticListSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSource for StaticListSource {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send {
        let response = self
            .responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError::NotFound {
                    url: url.to_string(),
                })
            });
        std::future::ready(response)
    }
}

/// Expand a list URI into the HTTP URLs to try, in order.
///
/// `http` lists are upgraded to `https` first; `ipfs`/`ipns` URIs go through
/// public gateways. ENS names and unknown schemes yield nothing.
pub fn uri_to_http(uri: &str) -> Vec<String> {
    let Some((scheme, rest)) = uri.split_once(':') else {
        return Vec::new();
    };
    match scheme.to_lowercase().as_str() {
        "https" => vec![uri.to_string()],
        "http" => vec![format!("https:{rest}"), uri.to_string()],
        "ipfs" => {
            let hash = rest.trim_start_matches('/');
            vec![
                format!("https://cloudflare-ipfs.com/ipfs/{hash}/"),
                format!("https://ipfs.io/ipfs/{hash}/"),
            ]
        }
        "ipns" => {
            let name = rest.trim_start_matches('/');
            vec![
                format!("https://cloudflare-ipfs.com/ipns/{name}/"),
                format!("https://ipfs.io/ipns/{name}/"),
            ]
        }
        _ => Vec::new(),
    }
}

#[cfg(feature = "http")]
pub use http::HttpListSource;

#[cfg(feature = "http")]
mod http {
    use std::future::Future;
    use std::time::Duration;

    use tracing::debug;

    use super::{uri_to_http, ListSource};
    use crate::error::FetchError;

    /// Fetches lists over HTTP(S), falling back across gateway URLs.
    pub struct HttpListSource {
        client: reqwest::Client,
    }

    impl HttpListSource {
        pub fn new(timeout: Duration) -> Result<Self, FetchError> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| FetchError::Network(e.to_string()))?;
            Ok(Self { client })
        }

        async fn fetch_one(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            let response = self.client.get(url).send().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout {
                        url: url.to_string(),
                    }
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::Network(e.to_string()))?;
            Ok(body.to_vec())
        }
    }

    impl ListSource for HttpListSource {
        fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send {
            let candidates = uri_to_http(url);
            let list_url = url.to_string();
            async move {
                let mut last_error = FetchError::Network(format!("unsupported list URI: {list_url}"));
                for candidate in candidates {
                    match self.fetch_one(&candidate).await {
                        Ok(body) => return Ok(body),
                        Err(e) => {
                            debug!(url = %candidate, error = %e, "list gateway failed");
                            last_error = e;
                        }
                    }
                }
                Err(last_error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_source_not_found() {
        let source = StaticListSource::new();
        let result = source.fetch("https://example.com/list.json").await;
        assert!(matches!(result, Err(FetchError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_static_source_serves_canned_responses() {
        let mut source = StaticListSource::new();
        source.add_json("ok", "{}");
        source.add_error(
            "slow",
            FetchError::Timeout {
                url: "slow".to_string(),
            },
        );
        assert_eq!(source.fetch("ok").await.unwrap(), b"{}".to_vec());
        assert!(matches!(
            source.fetch("slow").await,
            Err(FetchError::Timeout { .. })
        ));
    }

    #[test]
    fn test_uri_to_http() {
        assert_eq!(
            uri_to_http("https://tokens.coingecko.com/uniswap/all.json"),
            vec!["https://tokens.coingecko.com/uniswap/all.json"]
        );
        assert_eq!(
            uri_to_http("http://example.com/list.json"),
            vec!["https://example.com/list.json", "http://example.com/list.json"]
        );
        assert_eq!(
            uri_to_http("ipfs://QmHash"),
            vec![
                "https://cloudflare-ipfs.com/ipfs/QmHash/",
                "https://ipfs.io/ipfs/QmHash/"
            ]
        );
        assert_eq!(uri_to_http("ipns://list.eth").len(), 2);
        assert!(uri_to_http("tokens.uniswap.eth").is_empty());
        assert!(uri_to_http("ftp://example.com/list.json").is_empty());
    }
}
