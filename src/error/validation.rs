use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing username (set --username, SCOUR_USERNAME, or the config file).")]
    MissingUsername,
    #[error("Missing password (set --password, SCOUR_PASSWORD, or the config file).")]
    MissingPassword,
    #[error("Invalid proxy '{value}'. Expected 'host:port'.")]
    InvalidProxyFormat { value: String },
    #[error("Invalid proxy port in '{value}': {source}")]
    InvalidProxyPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Query list must not be empty.")]
    NoQueries,
}
