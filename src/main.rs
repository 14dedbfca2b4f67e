use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use std::time::Duration;

use clap::{Arg, Command};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use invoice_scanner::http::server::start_server;
use invoice_scanner::scan::denylist::load_denylist;
use invoice_scanner::scan::engine::ScanEngine;
use invoice_scanner::utils::fetch::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_DOCUMENT_BYTES};

#[tokio::main]
async fn main() {
    // Parse command line arguments first
    let matches = Command::new("invoice-scanner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("HTTP service that scans invoice PDFs for denylisted IBANs")
        .long_about(
            "Fetches the PDF named per request, extracts its text and rejects the\n\
            document when it contains a denylisted IBAN.\n\
            Endpoint: GET /api/v1/invoice-scan?url=<document url>",
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .short('b')
                .value_name("ADDR")
                .help("Socket address to listen on")
                .default_value("127.0.0.1:8080")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("fetch-timeout-secs")
                .long("fetch-timeout-secs")
                .value_name("SECS")
                .help("Timeout for fetching a document over HTTP")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("max-document-bytes")
                .long("max-document-bytes")
                .value_name("BYTES")
                .help("Largest document body accepted for scanning")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("denylist-file")
                .long("denylist-file")
                .value_name("PATH")
                .help("File with one denylisted IBAN per line (default: built-in list)")
                .action(clap::ArgAction::Set),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    // RUST_LOG wins when set; otherwise quiet mode drops to errors only
    let default_level = if matches.get_flag("quiet") {
        "error"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let bind = matches
        .get_one::<String>("bind")
        .cloned()
        .unwrap_or_else(|| "127.0.0.1:8080".to_string());
    let addr: SocketAddr = match bind.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid bind address '{}': {}", bind, e);
            process::exit(1);
        }
    };

    let fetch_timeout_secs = match parse_u64_flag(
        &matches,
        "fetch-timeout-secs",
        DEFAULT_FETCH_TIMEOUT_SECS,
    ) {
        Ok(value) => value,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let max_document_bytes = match parse_u64_flag(
        &matches,
        "max-document-bytes",
        DEFAULT_MAX_DOCUMENT_BYTES,
    ) {
        Ok(value) => value,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    // Denylist file from command line or environment
    let denylist_path = matches
        .get_one::<String>("denylist-file")
        .cloned()
        .or_else(|| env::var("DENYLIST_FILE").ok())
        .map(PathBuf::from);

    let denylist = match load_denylist(denylist_path.as_deref()) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Failed to load denylist: {:#}", e);
            process::exit(1);
        }
    };
    if denylist.is_empty() {
        warn!("denylist is empty - every readable document will be accepted");
    }
    info!("denylist loaded with {} entries", denylist.len());

    let engine = match ScanEngine::new(
        denylist,
        Duration::from_secs(fetch_timeout_secs),
        max_document_bytes,
    ) {
        Ok(engine) => engine,
        Err(e) => {
            error!("Failed to build scan engine: {:#}", e);
            process::exit(1);
        }
    };

    info!("Starting invoice scan server...");

    if let Err(e) = start_server(addr, Arc::new(engine)).await {
        error!("Failed to start server: {}", e);
        process::exit(1);
    }
}

fn parse_u64_flag(
    matches: &clap::ArgMatches,
    name: &str,
    default: u64,
) -> Result<u64, String> {
    match matches.get_one::<String>(name) {
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|e| format!("Invalid value '{}' for --{}: {}", raw, name, e)),
        None => Ok(default),
    }
}
