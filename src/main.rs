//! Vitrine storefront CLI

use std::process;

use clap::Parser;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = cli.logging.init() {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("Logging error: {error}");
        }

        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        tracing::error!(%error, "command failed");

        #[expect(clippy::print_stderr, reason = "final error report for the shell")]
        {
            eprintln!("{error}");
        }

        process::exit(1);
    }
}
