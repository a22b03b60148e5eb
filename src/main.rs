use std::process;
use clap::Parser;

use release_watch::cli::Cli;

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = cli.run().await {
        eprintln!("Error: {} [{}]", e, e.error_code());
        process::exit(1);
    }
}
