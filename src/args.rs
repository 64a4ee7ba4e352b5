//! Connection flags shared by every entry point.

use std::time::Duration;

use clap::Args;

use crate::config::{ConnectConfig, DEFAULT_HOST, DEFAULT_PORT, Scheme, load_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::transport::{ProxyConfig, TransportSettings};

#[derive(Debug, Args, Clone)]
pub struct ConnectArgs {
    /// Service host
    #[arg(long, env = "SCOUR_HOST")]
    pub host: Option<String>,

    /// Service management port
    #[arg(long, env = "SCOUR_PORT")]
    pub port: Option<u16>,

    /// URL scheme (http, https)
    #[arg(long, ignore_case = true)]
    pub scheme: Option<Scheme>,

    /// Login username
    #[arg(long, short = 'u', env = "SCOUR_USERNAME")]
    pub username: Option<String>,

    /// Login password
    #[arg(long, short = 'p', env = "SCOUR_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Proxy in 'host:port' format
    #[arg(long)]
    pub proxy: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Config file path (defaults to ./.scour.toml, then ~/.scour.toml)
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl ConnectArgs {
    /// Resolves flags against the dotfile into a full [`ConnectConfig`];
    /// explicit flag values win over file values.
    ///
    /// # Errors
    ///
    /// Returns an error when the dotfile is unreadable, the proxy string is
    /// malformed, or credentials are missing from every source.
    pub fn resolve(&self) -> AppResult<ConnectConfig> {
        let file = load_config(self.config.as_deref())?.unwrap_or_default();

        let host = self
            .host
            .clone()
            .or(file.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = self.port.or(file.port).unwrap_or(DEFAULT_PORT);
        let scheme = self.scheme.or(file.scheme).unwrap_or_default();
        let username = self
            .username
            .clone()
            .or(file.username)
            .ok_or_else(|| AppError::validation(ValidationError::MissingUsername))?;
        let password = self
            .password
            .clone()
            .or(file.password)
            .ok_or_else(|| AppError::validation(ValidationError::MissingPassword))?;

        let timeout = self.timeout.or(file.timeout).map(Duration::from_secs);
        let insecure = self.insecure || file.insecure.unwrap_or(false);
        let proxy = match self.proxy.clone().or(file.proxy) {
            Some(value) => Some(parse_proxy(&value)?),
            None => None,
        };

        Ok(ConnectConfig {
            host,
            port,
            scheme,
            username,
            password,
            settings: TransportSettings {
                timeout,
                insecure,
                proxy,
            },
        })
    }
}

/// Parses a `host:port` proxy spec.
///
/// # Errors
///
/// Returns a validation error when the separator is missing, the host is
/// empty, or the port does not parse.
pub fn parse_proxy(value: &str) -> AppResult<ProxyConfig> {
    let (host, port) = value.split_once(':').ok_or_else(|| {
        AppError::validation(ValidationError::InvalidProxyFormat {
            value: value.to_owned(),
        })
    })?;
    if host.is_empty() {
        return Err(AppError::validation(ValidationError::InvalidProxyFormat {
            value: value.to_owned(),
        }));
    }
    let port = port.parse().map_err(|err| {
        AppError::validation(ValidationError::InvalidProxyPort {
            value: value.to_owned(),
            source: err,
        })
    })?;
    Ok(ProxyConfig {
        host: host.to_owned(),
        port,
    })
}
