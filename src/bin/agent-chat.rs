//! Chat with an agent team composed from JSON configs
//!
//! Run with: cargo run --bin agent-chat

use agent_factory::{
    agent::{AgentFactory, ConfigSource, DirectorySource, StoreSource, TeamBuilder},
    config::Config,
    conversation::run_repl,
    hooks::ConsoleHooks,
    provider::{ProviderClient, ProviderConfig},
    runner::Runner,
    store::{ConfigStore, RedisStore},
    telemetry, tools,
};
use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;

const DEFAULT_EXPOSURES: &[(&str, &str)] = &[
    ("weather", "Get weather information based on the user's full question"),
    ("news", "Get news information based on the user's full question"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Source {
    File,
    Redis,
}

#[derive(Parser)]
#[command(name = "agent-chat")]
#[command(about = "Chat with an agent composed from JSON configs", long_about = None)]
struct Cli {
    /// Directory holding <id>.json agent configs
    #[arg(short = 'd', long)]
    config_dir: Option<PathBuf>,

    /// Where agent configs are loaded from
    #[arg(short, long, value_enum, default_value = "file")]
    source: Source,

    /// Redis URL (overrides REDIS_URL)
    #[arg(long)]
    redis_url: Option<String>,

    /// Id of the agent the conversation starts with
    #[arg(short, long, default_value = "conversation")]
    root: String,

    /// Expose agent ID as a tool: ID=DESCRIPTION (repeatable)
    #[arg(short, long = "expose", value_name = "ID=DESCRIPTION")]
    expose: Vec<String>,

    /// Verbose output (console logs on stderr)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_exposure(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((id, description)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), description.trim().to_string()))
        }
        _ => bail!("invalid --expose value '{}', expected ID=DESCRIPTION", raw),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().with_verbose(cli.verbose);
    if let Some(dir) = cli.config_dir {
        config = config.with_config_dir(dir);
    }
    if let Some(url) = cli.redis_url {
        config = config.with_redis_url(url);
    }

    let _guard = telemetry::init_logging(&config.log_dir, "agent-chat", config.verbose)?;

    let api_key = config.llm.require_api_key()?.to_string();

    let registry = Arc::new(tools::create_registry(&config.tools)?);
    tracing::info!(tools = ?registry.names(), "Registered built-in tools");
    let factory = AgentFactory::new(registry);

    let source: Box<dyn ConfigSource> = match cli.source {
        Source::File => Box::new(DirectorySource::new(&config.config_dir)),
        Source::Redis => {
            let store: Arc<dyn ConfigStore> = Arc::new(RedisStore::connect(&config.redis_url).await?);
            Box::new(StoreSource::new(store))
        }
    };

    let exposures = if cli.expose.is_empty() {
        DEFAULT_EXPOSURES
            .iter()
            .map(|(id, description)| (id.to_string(), description.to_string()))
            .collect::<Vec<_>>()
    } else {
        cli.expose
            .iter()
            .map(|raw| parse_exposure(raw))
            .collect::<Result<Vec<_>>>()?
    };

    let mut builder = TeamBuilder::new(source.as_ref(), &factory);
    for (id, description) in exposures {
        builder = builder.expose(id, description);
    }
    let team = builder
        .assemble(&cli.root)
        .await
        .with_context(|| format!("failed to compose agent '{}'", cli.root))?;

    let provider = ProviderClient::new(ProviderConfig::from_llm(&config.llm), &api_key);
    let runner = Runner::new(Arc::new(provider)).with_hooks(Arc::new(ConsoleHooks::new()));

    std::fs::create_dir_all(&config.log_dir)?;
    let history_path = config.log_dir.join("history.txt");
    run_repl(&runner, team.root, Some(&history_path)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exposure() {
        assert_eq!(
            parse_exposure("weather=Get weather information").unwrap(),
            ("weather".to_string(), "Get weather information".to_string())
        );
        assert!(parse_exposure("weather").is_err());
        assert!(parse_exposure("=desc").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::parse_from([
            "agent-chat",
            "--source",
            "redis",
            "--expose",
            "news=News",
            "--root",
            "triage",
        ]);
        assert_eq!(cli.source, Source::Redis);
        assert_eq!(cli.expose, vec!["news=News"]);
        assert_eq!(cli.root, "triage");
    }
}
