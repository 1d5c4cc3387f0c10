//! Command line resolver for `did:web` identifiers.
//!
//! Prints the resolved DID Document as pretty JSON, or the document URL with
//! `--url-only`. Failures are printed as `<kind>: <message>` and exit with 1.
//! Set `RUST_LOG=didweb_resolver=debug` to trace each resolution stage.

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use didweb_resolver::{resolve_url, ClientConfig, ResolutionError, Resolver};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Resolve a did:web identifier to its DID Document")]
struct Args {
    /// The DID to resolve, e.g. did:web:example.com
    did: String,

    /// DNS-over-HTTPS provider used to look up the host (none, cloudflare)
    #[arg(long, default_value = "none")]
    doh: String,

    /// Only print the URL the DID Document would be fetched from
    #[arg(long)]
    url_only: bool,

    /// Request timeout in seconds
    #[arg(short = 't', long)]
    timeout: Option<u64>,
}

async fn run(args: &Args) -> Result<String, ResolutionError> {
    if args.url_only {
        return Ok(resolve_url(&args.did)?.to_string());
    }

    let config = ClientConfig {
        timeout: args.timeout.map(Duration::from_secs),
        ..ClientConfig::default()
    };
    let document = Resolver::with_config(config)
        .resolve_with_raw_options(&args.did, &json!({ "doh": args.doh }))
        .await?;

    Ok(serde_json::to_string_pretty(&document)?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{}: {}", err.kind(), err.message());
            ExitCode::FAILURE
        }
    }
}
