use clap::ValueEnum;
use serde::Deserialize;

use crate::transport::TransportSettings;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8089;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Dotfile shape (`.scour.toml`): connection defaults that CLI flags
/// override field by field.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub scheme: Option<Scheme>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds.
    pub timeout: Option<u64>,
    pub insecure: Option<bool>,
    /// Proxy as `host:port`.
    pub proxy: Option<String>,
}

/// Fully resolved connection configuration.
#[derive(Debug, Clone)]
pub struct ConnectConfig {
    pub host: String,
    pub port: u16,
    pub scheme: Scheme,
    pub username: String,
    pub password: String,
    pub settings: TransportSettings,
}

impl ConnectConfig {
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }
}
