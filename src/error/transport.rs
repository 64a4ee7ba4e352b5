use thiserror::Error;

/// Failures raised by a transport when the underlying HTTP call produced no
/// response-shaped outcome. Anything that does carry a status line is
/// normalized into an ordinary [`crate::transport::Response`] instead.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("URL '{url}' has no host.")]
    UrlMissingHost { url: String },
    #[error("Invalid proxy '{value}': {source}")]
    InvalidProxy {
        value: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Invalid header '{name}'.")]
    InvalidHeader { name: String },
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Request timed out: {source}")]
    Timeout {
        #[source]
        source: reqwest::Error,
    },
    #[error("Connection failed: {source}")]
    Connect {
        #[source]
        source: reqwest::Error,
    },
    #[error("HTTP call failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body: {source}")]
    ReadBody {
        #[source]
        source: reqwest::Error,
    },
    #[error("Worker task failed: {source}")]
    Join {
        #[source]
        source: tokio::task::JoinError,
    },
}
