use clap::Parser;
use tracing_subscriber::EnvFilter;

use sr_common::StructuredError;
use sr_core::cli::{self, Cli};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = cli::run(cli) {
        eprintln!("{}", StructuredError::from(&err).to_json());
        std::process::exit(1);
    }
}
