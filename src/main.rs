use anyhow::Result;
use carhubd::{config::ServerConfig, rest, seed, AppContext};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "carhubd",
    about = "CarHub — vehicle marketplace REST API server",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// HTTP listen port
    #[arg(long, env = "CARHUB_PORT")]
    port: Option<u16>,

    /// Data directory for the SQLite database, token secret, and uploads
    #[arg(long, env = "CARHUB_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    /// Bind address (default: 0.0.0.0)
    #[arg(long, env = "CARHUB_BIND")]
    bind_address: Option<String>,

    /// Log filter (trace, debug, info, warn, error)
    #[arg(long, env = "CARHUB_LOG")]
    log: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the API server (default when no subcommand given).
    Serve,
    /// Wipe the database and load the demo dataset.
    ///
    /// Creates one seller (seller@carhub.com / seller123), two buyers
    /// (buyer@carhub.com / buyer123), sample listings, and a pending offer.
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::new(args.port, args.data_dir, args.bind_address, args.log);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log)),
        )
        .init();

    let ctx = AppContext::init(config).await?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => rest::start_rest_server(ctx).await,
        Command::Seed => seed::run(&ctx.storage).await,
    }
}
