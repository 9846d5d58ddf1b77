// FRED MCP server binary

use anyhow::{Context, Result};
use fred_client::{FredApi, FredClient, RateLimitConfig};
use fred_mcp::config::ServerConfig;
use fred_mcp::prompts::PromptRegistry;
use fred_mcp::server::McpServer;
use fred_mcp::tools::*;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration problems are fatal before any request is served.
    let config = ServerConfig::from_env().context("invalid configuration")?;
    init_tracing(&config)?;

    tracing::info!("FRED MCP server starting");

    let client = FredClient::builder()
        .base_url(&config.api_endpoint)
        .api_key(&config.api_key)
        .timeout(config.request_timeout)
        .rate_limit(RateLimitConfig {
            max_requests: config.rate_limit,
            period: config.rate_limit_period,
        })
        .build()
        .context("failed to build FRED client")?;
    let api: Arc<dyn FredApi> = Arc::new(client);

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(SearchSeriesTool::new(api.clone())));
    registry.register(Arc::new(GetSeriesDataTool::new(api.clone())));
    registry.register(Arc::new(GetSeriesMetadataTool::new(api.clone())));
    registry.register(Arc::new(GetCategorySeriesTool::new(api.clone())));
    registry.register(Arc::new(GetReleasesTool::new(api.clone())));
    registry.register(Arc::new(CompareSeriesTool::new(api.clone())));
    registry.register(Arc::new(CalculateStatisticsTool::new(api.clone())));
    registry.register(Arc::new(DetectTrendsTool::new(api.clone())));

    let prompts = PromptRegistry::with_defaults();

    tracing::info!(
        "Registered {} tools and {} prompts",
        registry.len(),
        prompts.len()
    );

    let server = Arc::new(McpServer::new(registry, prompts));
    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted, shutting down");
            Ok(())
        }
    }
}

/// Set up tracing: stderr by default, a file when configured.
///
/// stdout is never used for logs; it carries the protocol.
fn init_tracing(config: &ServerConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.clone()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            builder.with_writer(std::io::stderr).init();
        }
    }

    Ok(())
}
