//! Prints the apps installed on the service, one name per line.

use std::sync::Arc;

use clap::Parser;

use scour::args::ConnectArgs;
use scour::client::connect;
use scour::error::AppResult;
use scour::logger;
use scour::transport::AsyncTransport;

#[derive(Debug, Parser)]
#[clap(version, about = "List the apps installed on a search service.")]
struct Cli {
    #[command(flatten)]
    connect: ConnectArgs,
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
        for app in service.apps().await? {
            println!("{}", app.name);
        }
        Ok(())
    })
}
