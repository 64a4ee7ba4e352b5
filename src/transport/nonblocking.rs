use async_trait::async_trait;

use crate::error::TransportError;

use super::{
    CallOptions, Message, Response, Transport, TransportResult, TransportSettings, apply_proxies,
    assemble_headers, header_map, header_pairs, normalize_failure, split_url,
};

/// Transport backed by the asynchronous reqwest client.
///
/// A call suspends at I/O-wait points and hands control back to the
/// scheduler, so many calls can interleave on one thread.
pub struct AsyncTransport {
    settings: TransportSettings,
    client: reqwest::Client,
}

impl AsyncTransport {
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

fn build_client(settings: &TransportSettings) -> TransportResult<reqwest::Client> {
    let mut builder = reqwest::Client::builder().danger_accept_invalid_certs(settings.insecure);
    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }
    builder = apply_proxies(builder, settings.proxy.as_ref())?;
    builder
        .build()
        .map_err(|err| TransportError::BuildClientFailed { source: err })
}

#[async_trait]
impl Transport for AsyncTransport {
    async fn request(
        &self,
        url: &str,
        message: Message,
        options: CallOptions,
    ) -> TransportResult<Response> {
        let resolved = self.settings.merge(&options);
        // The cached client already reflects the defaults; only a per-call
        // override forces a fresh one.
        let client = if resolved == self.settings {
            self.client.clone()
        } else {
            build_client(&resolved)?
        };

        let split = split_url(url)?;
        let headers = assemble_headers(&split.host, message.body.len(), &message.headers);
        let header_map = header_map(&headers)?;

        let mut request = client
            .request(message.method.to_reqwest(), url)
            .headers(header_map)
            .body(message.body);
        if let Some(timeout) = resolved.timeout {
            request = request.timeout(timeout);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                let headers = header_pairs(response.headers());
                let body = response
                    .bytes()
                    .await
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
    }
}
