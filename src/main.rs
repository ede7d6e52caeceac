use anyhow::Result;
use esg_cli::cli_main;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    // cli_main owns the tokio runtime
    cli_main(args)
}
