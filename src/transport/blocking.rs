use async_trait::async_trait;

use crate::error::TransportError;

use super::{
    CallOptions, Message, Response, Transport, TransportResult, TransportSettings,
    apply_blocking_proxies, assemble_headers, header_map, header_pairs, normalize_failure,
    split_url,
};

/// Transport backed by the blocking reqwest client.
///
/// Each call occupies a thread until the response arrives. Calls run on the
/// runtime's blocking pool so a blocked request never stalls the scheduler
/// itself, but nothing overlaps within one logical thread of control.
///
/// Construct this before entering the async runtime.
pub struct BlockingTransport {
    settings: TransportSettings,
    client: reqwest::blocking::Client,
}

impl BlockingTransport {
    /// Builds the transport and its underlying client from connection
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the proxy rules are invalid or the client
    /// cannot be constructed.
    pub fn new(settings: TransportSettings) -> TransportResult<Self> {
        let client = build_client(&settings)?;
        Ok(Self { settings, client })
    }

    #[must_use]
    pub fn settings(&self) -> &TransportSettings {
        &self.settings
    }
}

fn build_client(settings: &TransportSettings) -> TransportResult<reqwest::blocking::Client> {
    let mut builder =
        reqwest::blocking::Client::builder().danger_accept_invalid_certs(settings.insecure);
    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }
    builder = apply_blocking_proxies(builder, settings.proxy.as_ref())?;
    builder
        .build()
        .map_err(|err| TransportError::BuildClientFailed { source: err })
}

#[async_trait]
impl Transport for BlockingTransport {
    async fn request(
        &self,
        url: &str,
        message: Message,
        options: CallOptions,
    ) -> TransportResult<Response> {
        let resolved = self.settings.merge(&options);
        let rebuild = resolved != self.settings;

        let split = split_url(url)?;
        let headers = assemble_headers(&split.host, message.body.len(), &message.headers);
        let header_map = header_map(&headers)?;

        let client = self.client.clone();
        let url = url.to_owned();
        let method = message.method;
        let body = message.body;
        let timeout = resolved.timeout;

        tokio::task::spawn_blocking(move || {
            let client = if rebuild {
                build_client(&resolved)?
            } else {
                client
            };
            let mut request = client
                .request(method.to_reqwest(), url)
                .headers(header_map)
                .body(body);
            if let Some(timeout) = timeout {
                request = request.timeout(timeout);
            }
            match request.send() {
                Ok(response) => {
                    let status = response.status();
                    let headers = header_pairs(response.headers());
                    let body = response
                        .bytes()
                        .map_err(|err| TransportError::ReadBody { source: err })?;
                    Ok(Response::new(
                        status.as_u16(),
                        status.canonical_reason().unwrap_or_default().to_owned(),
                        headers,
                        body.to_vec(),
                    ))
                }
                Err(err) => normalize_failure(err),
            }
        })
        .await
        .map_err(|err| TransportError::Join { source: err })?
    }
}
