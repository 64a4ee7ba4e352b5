mod app;
mod config;
mod service;
mod transport;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use service::ServiceError;
pub use transport::TransportError;
pub use validation::ValidationError;
