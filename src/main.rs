//! sommelier-rs command-line entry point.

use anyhow::Context as _;
use clap::Parser;
use sommelier_rs::cli::{Cli, execute};
use tracing_subscriber::EnvFilter;

#[allow(clippy::print_stdout)]
fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let output = execute(&cli).context("sommelier-rs failed")?;
    if !output.is_empty() {
        print!("{output}");
    }
    Ok(())
}
