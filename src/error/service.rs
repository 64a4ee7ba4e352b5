use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Request failed with HTTP {status} {reason}.")]
    Http { status: u16, reason: String },
    #[error("Response body was not valid UTF-8: {source}")]
    BodyNotUtf8 {
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("Malformed response body: {source}")]
    MalformedBody {
        #[source]
        source: serde_json::Error,
    },
    #[error("Login response did not contain a session key.")]
    MissingSessionKey,
}
