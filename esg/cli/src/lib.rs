pub mod cli;
pub mod table;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;

const ENV_ESG_LOGLEVEL: &str = "ESG_LOGLEVEL";

/// Main entry point for the CLI
#[tokio::main]
pub async fn cli_main(args: Vec<String>) -> Result<()> {
    // Ignore the error if a logger is already installed by the host process.
    let _ = env_logger::try_init_from_env(Env::new().filter(ENV_ESG_LOGLEVEL));
    cli::Cli::parse_from(args).run().await
}
