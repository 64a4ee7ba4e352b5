//! Client library for a remote search service.
//!
//! The pieces: a pluggable HTTP transport contract with blocking and async
//! implementations, a thin service client (login, apps, configuration
//! stanzas, search jobs), connection configuration from a dotfile plus CLI
//! flags, and an execution driver that fans search jobs out serially or
//! across a bounded cooperative pool. The `scour-*` binaries are small entry
//! points over these modules.
pub mod args;
pub mod bench;
pub mod client;
pub mod config;
pub mod error;
pub mod logger;
pub mod transport;
