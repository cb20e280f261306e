mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use formpipe_proxy::config::Config;
use formpipe_proxy::observability;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => {
            let mut config = Config::load(args.config)?;
            observability::init_tracing(config.logging.format);

            if let Some(address) = args.address {
                config.server.bind_addr = address;
            }

            formpipe_proxy::api::run(config).await?;
        }
    }

    Ok(())
}
