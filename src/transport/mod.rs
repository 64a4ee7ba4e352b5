//! Pluggable HTTP transport.
//!
//! A [`Transport`] turns a `(url, message)` pair into a [`Response`],
//! abstracting over the concrete HTTP client underneath. Two implementations
//! exist: [`BlockingTransport`] occupies the calling thread for the duration
//! of the call, [`AsyncTransport`] yields to the scheduler while waiting on
//! I/O. Callers cannot tell them apart except by scheduling behavior.
//!
//! Any outcome that carries a status line is a [`Response`], including HTTP
//! error statuses; only failures with no response shape (DNS, refused
//! connection, timeout) surface as [`TransportError`].

mod blocking;
mod nonblocking;

#[cfg(test)]
pub(crate) mod test_support;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use url::Url;

use crate::error::TransportError;

pub use blocking::BlockingTransport;
pub use nonblocking::AsyncTransport;

pub type TransportResult<T> = Result<T, TransportError>;

/// Default User-Agent attached to every request unless the caller overrides it.
pub const USER_AGENT: &str = concat!("scour/", env!("CARGO_PKG_VERSION"));

/// Port assumed when a URL does not name one explicitly, regardless of scheme.
const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One outbound call, constructed per request and then discarded.
///
/// The method is an explicit field; it is never rewritten after construction.
/// Headers keep their insertion order so overlays stay deterministic.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Message {
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn post(body: Vec<u8>) -> Self {
        Self {
            method: Method::Post,
            headers: Vec::new(),
            body,
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }
}

/// Normalized response shape shared by every transport.
///
/// Non-2xx statuses are ordinary responses here; inspect [`Response::status`]
/// rather than expecting an error.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub reason: String,
    headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    #[must_use]
    pub fn new(status: u16, reason: String, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            reason,
            headers,
            body,
        }
    }

    /// Case-insensitive header lookup; first match wins.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
}

impl ProxyConfig {
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Connection defaults carried by a transport instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransportSettings {
    pub timeout: Option<Duration>,
    pub insecure: bool,
    pub proxy: Option<ProxyConfig>,
}

/// Per-call overrides; any field left `None` falls back to the instance
/// defaults, explicit values win.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub timeout: Option<Duration>,
    pub insecure: Option<bool>,
    pub proxy: Option<ProxyConfig>,
}

impl TransportSettings {
    #[must_use]
    pub fn merge(&self, options: &CallOptions) -> TransportSettings {
        TransportSettings {
            timeout: options.timeout.or(self.timeout),
            insecure: options.insecure.unwrap_or(self.insecure),
            proxy: options.proxy.clone().or_else(|| self.proxy.clone()),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one HTTP request and normalize whatever comes back.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only for failures with no response shape;
    /// HTTP error statuses come back as an `Ok` [`Response`].
    async fn request(
        &self,
        url: &str,
        message: Message,
        options: CallOptions,
    ) -> TransportResult<Response>;
}

/// URL constituents used for header assembly and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitUrl {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub path: String,
}

/// Splits a URL into scheme, host, port, and path.
///
/// The port defaults to 80 whenever the URL does not name one, for any
/// scheme.
///
/// # Errors
///
/// Returns an error when the URL does not parse or has no host.
pub fn split_url(url: &str) -> TransportResult<SplitUrl> {
    let parsed = Url::parse(url).map_err(|err| TransportError::InvalidUrl {
        url: url.to_owned(),
        source: err,
    })?;
    let host = parsed
        .host_str()
        .ok_or_else(|| TransportError::UrlMissingHost {
            url: url.to_owned(),
        })?;
    Ok(SplitUrl {
        scheme: parsed.scheme().to_owned(),
        host: host.to_owned(),
        port: parsed.port().unwrap_or(DEFAULT_PORT),
        path: parsed.path().to_owned(),
    })
}

/// Builds the effective header set for a call: the default headers
/// (`Content-Length`, `Host`, `User-Agent`, `Accept`) overlaid with the
/// caller's, caller values winning on every key collision.
#[must_use]
pub fn assemble_headers(
    host: &str,
    body_len: usize,
    caller: &[(String, String)],
) -> Vec<(String, String)> {
    let mut headers: Vec<(String, String)> = vec![
        ("Content-Length".to_owned(), body_len.to_string()),
        ("Host".to_owned(), host.to_owned()),
        ("User-Agent".to_owned(), USER_AGENT.to_owned()),
        ("Accept".to_owned(), "*/*".to_owned()),
    ];
    for (name, value) in caller {
        match headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value.clone(),
            None => headers.push((name.clone(), value.clone())),
        }
    }
    headers
}

/// Proxy rules a transport installs before issuing a call: one rule per
/// scheme when a proxy is configured, none otherwise.
#[must_use]
pub fn proxy_rules(proxy: Option<&ProxyConfig>) -> Vec<(&'static str, String)> {
    match proxy {
        Some(proxy) => {
            let url = proxy.url();
            vec![("http", url.clone()), ("https", url)]
        }
        None => Vec::new(),
    }
}

/// Normalizes a response-shaped error into an ordinary [`Response`].
///
/// The underlying client raised, but the failure still carries a status
/// line, so the caller gets a response to inspect rather than an error.
#[must_use]
pub fn response_from_status(status: StatusCode) -> Response {
    Response::new(
        status.as_u16(),
        status.canonical_reason().unwrap_or_default().to_owned(),
        Vec::new(),
        Vec::new(),
    )
}

/// Normalizes the failed half of an HTTP call outcome.
///
/// An error that still exposes a status line becomes an ordinary
/// [`Response`]; anything else propagates as a transport failure.
///
/// # Errors
///
/// Returns the classified [`TransportError`] when the failure carries no
/// response shape.
pub fn normalize_failure(err: reqwest::Error) -> TransportResult<Response> {
    match err.status() {
        Some(status) => Ok(response_from_status(status)),
        None => Err(classify_error(err)),
    }
}

pub(crate) fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

pub(crate) fn header_map(pairs: &[(String, String)]) -> TransportResult<HeaderMap> {
    use reqwest::header::{HeaderName, HeaderValue};

    let mut map = HeaderMap::with_capacity(pairs.len());
    for (name, value) in pairs {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| TransportError::InvalidHeader {
                name: name.clone(),
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| TransportError::InvalidHeader {
                name: name.clone(),
            })?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

/// Maps a reqwest failure with no response shape onto the transport error
/// taxonomy.
pub(crate) fn classify_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout { source: err }
    } else if err.is_connect() {
        TransportError::Connect { source: err }
    } else {
        TransportError::Request { source: err }
    }
}

pub(crate) fn apply_proxies(
    mut builder: reqwest::ClientBuilder,
    proxy: Option<&ProxyConfig>,
) -> TransportResult<reqwest::ClientBuilder> {
    for (scheme, url) in proxy_rules(proxy) {
        let rule = match scheme {
            "https" => reqwest::Proxy::https(&url),
            _ => reqwest::Proxy::http(&url),
        }
        .map_err(|err| TransportError::InvalidProxy {
            value: url.clone(),
            source: err,
        })?;
        builder = builder.proxy(rule);
    }
    Ok(builder)
}

pub(crate) fn apply_blocking_proxies(
    mut builder: reqwest::blocking::ClientBuilder,
    proxy: Option<&ProxyConfig>,
) -> TransportResult<reqwest::blocking::ClientBuilder> {
    for (scheme, url) in proxy_rules(proxy) {
        let rule = match scheme {
            "https" => reqwest::Proxy::https(&url),
            _ => reqwest::Proxy::http(&url),
        }
        .map_err(|err| TransportError::InvalidProxy {
            value: url.clone(),
            source: err,
        })?;
        builder = builder.proxy(rule);
    }
    Ok(builder)
}
