//! Minimal search-service client.
//!
//! Covers the surface the examples need: a single login call, installed-app
//! listing, configuration-stanza enumeration, and search-job
//! create/await/fetch. Every call goes through the [`Transport`] injected at
//! [`connect`] time; the client itself never touches a concrete HTTP
//! library.
//!
//! The transport never raises on HTTP error statuses, so HTTP-level failure
//! detection lives here, in [`check_status`].

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::form_urlencoded;

use crate::config::ConnectConfig;
use crate::error::{AppResult, ServiceError};
use crate::transport::{CallOptions, Message, Response, Transport};

/// Execution mode for a search job. `Blocking` jobs are complete by the time
/// the create call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Blocking,
}

impl ExecMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ExecMode::Blocking => "blocking",
        }
    }
}

/// An authenticated session against one service instance.
pub struct Service {
    transport: Arc<dyn Transport>,
    base_url: String,
    session_key: String,
}

/// An installed app descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    pub name: String,
}

/// One stanza of a configuration file.
#[derive(Debug, Clone)]
pub struct ConfStanza {
    name: String,
    content: BTreeMap<String, serde_json::Value>,
}

impl ConfStanza {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stanza's key/value pairs, in key order.
    #[must_use]
    pub fn read(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.content
    }
}

/// A server-side search job, alive for one create/fetch cycle.
pub struct Job<'a> {
    service: &'a Service,
    sid: String,
}

/// Guards a response against unexpected HTTP statuses.
///
/// # Errors
///
/// Returns [`ServiceError::Http`] when the status is not in `allowed`.
pub fn check_status(response: &Response, allowed: &[u16]) -> Result<(), ServiceError> {
    if allowed.contains(&response.status) {
        return Ok(());
    }
    Err(ServiceError::Http {
        status: response.status,
        reason: response.reason.clone(),
    })
}

fn parse_json<T: DeserializeOwned>(response: &Response) -> Result<T, ServiceError> {
    serde_json::from_slice(&response.body).map_err(|err| ServiceError::MalformedBody { source: err })
}

#[derive(Debug, Deserialize)]
struct LoginBody {
    #[serde(rename = "sessionKey")]
    session_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Feed {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    name: String,
    #[serde(default)]
    content: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct JobCreated {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    results: Vec<BTreeMap<String, serde_json::Value>>,
}

/// Logs in with the configured credentials and returns an authenticated
/// [`Service`] bound to the given transport.
///
/// # Errors
///
/// Returns an error when the login call fails at the transport level, comes
/// back with an unexpected status, or yields no session key.
pub async fn connect(config: &ConnectConfig, transport: Arc<dyn Transport>) -> AppResult<Service> {
    let base_url = config.base_url();
    let body = form_urlencoded::Serializer::new(String::new())
        .append_pair("username", &config.username)
        .append_pair("password", &config.password)
        .append_pair("output_mode", "json")
        .finish();
    let message = Message::post(body.into_bytes())
        .with_header("Content-Type", "application/x-www-form-urlencoded");

    let url = format!("{base_url}/services/auth/login");
    let response = transport.request(&url, message, CallOptions::default()).await?;
    check_status(&response, &[200, 201])?;

    let login: LoginBody = parse_json(&response)?;
    let session_key = login.session_key.ok_or(ServiceError::MissingSessionKey)?;
    tracing::debug!(host = %config.host, "logged in");

    Ok(Service {
        transport,
        base_url,
        session_key,
    })
}

impl Service {
    async fn call(&self, url: &str, message: Message) -> AppResult<Response> {
        let message =
            message.with_header("Authorization", &format!("Splunk {}", self.session_key));
        let response = self
            .transport
            .request(url, message, CallOptions::default())
            .await?;
        Ok(response)
    }

    /// Lists installed apps.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected status.
    pub async fn apps(&self) -> AppResult<Vec<App>> {
        let url = format!("{}/services/apps/local?output_mode=json", self.base_url);
        let response = self.call(&url, Message::get()).await?;
        check_status(&response, &[200])?;
        let feed: Feed = parse_json(&response)?;
        Ok(feed
            .entry
            .into_iter()
            .map(|entry| App { name: entry.name })
            .collect())
    }

    /// Enumerates the stanzas of the named configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected status.
    pub async fn confs(&self, file: &str) -> AppResult<Vec<ConfStanza>> {
        let url = format!(
            "{}/services/configs/conf-{}?output_mode=json",
            self.base_url, file
        );
        let response = self.call(&url, Message::get()).await?;
        check_status(&response, &[200])?;
        let feed: Feed = parse_json(&response)?;
        Ok(feed
            .entry
            .into_iter()
            .map(|entry| ConfStanza {
                name: entry.name,
                content: entry.content,
            })
            .collect())
    }

    /// Creates a search job. With [`ExecMode::Blocking`] the job has already
    /// run to completion when this returns.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected status.
    pub async fn create_job(&self, query: &str, mode: ExecMode) -> AppResult<Job<'_>> {
        let body = form_urlencoded::Serializer::new(String::new())
            .append_pair("search", query)
            .append_pair("exec_mode", mode.as_str())
            .append_pair("output_mode", "json")
            .finish();
        let message = Message::post(body.into_bytes())
            .with_header("Content-Type", "application/x-www-form-urlencoded");

        let url = format!("{}/services/search/jobs", self.base_url);
        let response = self.call(&url, message).await?;
        check_status(&response, &[200, 201])?;
        let created: JobCreated = parse_json(&response)?;
        Ok(Job {
            service: self,
            sid: created.sid,
        })
    }
}

impl Job<'_> {
    #[must_use]
    pub fn sid(&self) -> &str {
        &self.sid
    }

    /// Fetches the job's result rows.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or an unexpected status.
    pub async fn results(&self) -> AppResult<Vec<BTreeMap<String, serde_json::Value>>> {
        let url = format!(
            "{}/services/search/jobs/{}/results?output_mode=json",
            self.service.base_url, self.sid
        );
        let response = self.service.call(&url, Message::get()).await?;
        check_status(&response, &[200])?;
        let set: ResultSet = parse_json(&response)?;
        Ok(set.results)
    }
}
