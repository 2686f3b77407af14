//! promsd - resolve identifiers against a discovery endpoint
//!
//! Command-line front end for the discovery client: builds one shared
//! client, resolves every requested identifier concurrently, and prints a
//! per-identifier summary (or raw JSON with --json).

use clap::Parser;
use futures::future;

use promsd::cli::{self, Cli};
use promsd::client::DiscoveryClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let client = DiscoveryClient::new(&cli.url, &cli.login, &cli.password)
        .with_version(env!("CARGO_PKG_VERSION"));
    if client.is_inert() {
        eprintln!("warning: invalid endpoint URL or empty credentials; every lookup will return no records");
    }

    let lookups = cli
        .identifiers
        .iter()
        .map(|identifier| client.resolve_with_category(identifier, &cli.category));
    let results = future::join_all(lookups).await;

    let mut failed = false;
    for (identifier, result) in cli.identifiers.iter().zip(results) {
        match result {
            Ok(records) => {
                if cli.json {
                    println!("{}", serde_json::to_string(&records)?);
                } else {
                    println!("{}", cli::summarize(identifier, &records));
                }
            }
            Err(err) => {
                failed = true;
                eprintln!("{identifier}: {err}");
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
