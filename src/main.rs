// Copyright (c) 2025 Echogate Contributors
// Licensed under the MIT License. See LICENSE file for details.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use echogate::Server;

#[derive(Parser)]
#[command(name = "echogate")]
#[command(version)]
#[command(about = "Session-gated demo API. Login first; chat and settings behind the gate.")]
#[command(long_about = "echogate - session-gated demo API\n\n\
    Start the server:          echogate\n\
    Pick a port:               echogate --port 9000\n\
    Expose on the network:     echogate --bind 0.0.0.0\n\n\
    Credentials, TTL, and redirect target come from ECHOGATE_* \n\
    environment variables, with demo defaults compiled in.")]
struct Cli {
    /// Port to listen on (overrides ECHOGATE_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind to (overrides ECHOGATE_BIND)
    #[arg(short, long)]
    bind: Option<String>,

    /// Verbose mode: detailed output for debugging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let mut server = Server::from_env();
    if let Some(port) = cli.port {
        server = server.with_port(port);
    }
    if let Some(bind) = cli.bind {
        server = server.with_bind_address(bind);
    }

    server.start().await
}
