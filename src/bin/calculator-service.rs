//! Square-root calculator agent over HTTP
//!
//! Run with: cargo run --bin calculator-service

use agent_factory::{
    config::Config,
    provider::{ProviderClient, ProviderConfig},
    remote::{router, AppState},
    telemetry,
};
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "calculator-service")]
#[command(about = "Serve the square-root calculator agent over HTTP", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_console_logging(cli.verbose);

    let config = Config::from_env();
    let api_key_set = config.llm.has_api_key();
    if !api_key_set {
        tracing::warn!(
            env = %config.llm.api_key_env,
            "API key not set, /run will answer with an error"
        );
    }

    let provider = ProviderClient::new(
        ProviderConfig::from_llm(&config.llm),
        config.llm.api_key.as_deref().unwrap_or_default(),
    );
    let state = Arc::new(AppState::new(Arc::new(provider), api_key_set)?);
    let app = router(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Calculator service listening");
    axum::serve(listener, app).await?;

    Ok(())
}
