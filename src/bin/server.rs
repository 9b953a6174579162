//! AegisRPC Server Binary
//!
//! Starts the TCP server for AegisRPC.

use std::io::BufRead;
use std::thread;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use aegisrpc::network::Server;
use aegisrpc::Config;

/// AegisRPC Server
#[derive(Parser, Debug)]
#[command(name = "aegis-server")]
#[command(about = "Minimal authenticated RPC server")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Number of connection worker threads
    #[arg(short, long, default_value = "8")]
    pool_size: usize,

    /// Connection read timeout in milliseconds
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Connection write timeout in milliseconds
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,

    /// Log authentication attempts and outcomes
    #[arg(long)]
    debug_auth: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aegisrpc=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("AegisRPC Server v{}", aegisrpc::VERSION);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .listen_addr(&args.listen)
        .pool_size(args.pool_size)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .debug_auth(args.debug_auth)
        .build();

    // Bind server (provisions the default admin identity)
    let mut server = match Server::bind(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to bind server: {}", e);
            std::process::exit(1);
        }
    };

    let shutdown = server.shutdown_handle();
    let acceptor = thread::spawn(move || server.run());

    // Block until stdin is closed, then stop the accept loop
    eprintln!("Close server with Ctrl+D (Unix) or Ctrl+Z (Win)");
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        if line.is_err() {
            break;
        }
    }

    shutdown.shutdown();
    match acceptor.join() {
        Ok(Ok(())) => tracing::info!("Server shut down cleanly"),
        Ok(Err(e)) => {
            tracing::error!("Server error: {}", e);
            std::process::exit(1);
        }
        Err(_) => {
            tracing::error!("Server thread panicked");
            std::process::exit(1);
        }
    }
}
