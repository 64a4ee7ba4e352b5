//! Times a fixed batch of search jobs against the service.
//!
//! `sync` runs the batch serially over the blocking transport; `async` fans
//! it out across a pooled, cooperative transport. Same work either way, the
//! elapsed time shows the difference.

use std::sync::Arc;

use clap::Parser;

use scour::args::ConnectArgs;
use scour::bench::{RunMode, run_queries};
use scour::client::connect;
use scour::error::AppResult;
use scour::logger;
use scour::transport::{AsyncTransport, BlockingTransport, Transport};

const QUERY: &str = "search * | head 100";
const QUERY_COUNT: usize = 22;

#[derive(Debug, Parser)]
#[clap(
    version,
    about = "Run a batch of search jobs serially (sync) or through a cooperative pool (async) and report elapsed time."
)]
struct Cli {
    /// Execution mode
    #[arg(value_enum)]
    mode: RunMode,

    #[command(flatten)]
    connect: ConnectArgs,
}

fn main() -> AppResult<()> {
    // Clap exits with status 2 on a missing or invalid mode argument.
    let cli = Cli::parse();
    logger::init_logging(cli.connect.verbose);

    let config = cli.connect.resolve()?;
    // The mode picks the transport, constructed once up front and injected;
    // nothing rebinds it afterwards.
    let transport: Arc<dyn Transport> = match cli.mode {
        RunMode::Serial => Arc::new(BlockingTransport::new(config.settings.clone())?),
        RunMode::Pooled => Arc::new(AsyncTransport::new(config.settings.clone())?),
    };
    let mode = cli.mode;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let service = connect(&config, transport).await?;
        let queries = vec![QUERY.to_owned(); QUERY_COUNT];
        let outcome = run_queries(&service, &queries, mode).await?;
        println!("Elapsed time: {:?}", outcome.elapsed);
        Ok(())
    })
}
