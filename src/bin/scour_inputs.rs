//! Prints every stanza of the service's `inputs` configuration as
//! `[name]` followed by indented `key: value` lines.

use std::sync::Arc;

use clap::Parser;

use scour::args::ConnectArgs;
use scour::client::connect;
use scour::error::AppResult;
use scour::logger;
use scour::transport::AsyncTransport;

#[derive(Debug, Parser)]
#[clap(version, about = "List the configured inputs of a search service.")]
struct Cli {
    #[command(flatten)]
    connect: ConnectArgs,
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn main() -> AppResult<()> {
    let cli = Cli::parse();
    logger::init_logging(cli.connect.verbose);

    let config = cli.connect.resolve()?;
    let transport = Arc::new(AsyncTransport::new(config.settings.clone())?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let service = connect(&config, transport).await?;
        for stanza in service.confs("inputs").await? {
            println!("[{}]", stanza.name());
            for (key, value) in stanza.read() {
                println!("    {}: {}", key, format_value(value));
            }
            println!();
        }
        Ok(())
    })
}
