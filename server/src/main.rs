//! Ragline Entry Point
//!
//! Builds the question answering pipeline from flags and environment, then
//! serves it over MCP on stdio. Logs go to stderr so stdout stays a clean
//! protocol channel.

use clap::Parser;
use ragline_server::mcp::McpServer;
use ragline_server::{RagApi, RagConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ragline")]
#[command(about = "Retrieval-augmented question answering over MCP")]
#[command(version)]
struct Args {
    #[command(flatten)]
    config: RagConfig,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragline_server=info,ragline_memory=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting ragline MCP server");

    let api = match RagApi::from_config(&args.config).await {
        Ok(api) => api,
        Err(e) => {
            tracing::error!("Failed to build pipeline: {}", e);
            std::process::exit(1);
        }
    };

    let server = McpServer::new(api);
    if let Err(e) = server.run().await {
        tracing::error!("MCP server error: {}", e);
        std::process::exit(1);
    }
}
