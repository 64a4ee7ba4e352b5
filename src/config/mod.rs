//! Connection configuration: dotfile defaults plus CLI overrides.
mod loader;
mod types;


pub use loader::{DOTFILE, load_config};
pub use types::{ConfigFile, ConnectConfig, DEFAULT_HOST, DEFAULT_PORT, Scheme};
