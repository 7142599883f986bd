//! Validate agent config files and upload them to the Redis config store
//!
//! Run with: cargo run --bin store-configs

use agent_factory::{
    agent::{schema::SCHEMA_FILE_NAME, AgentSchema},
    config::Config,
    store::{parse_confirmation, Importer, RedisStore},
    telemetry,
};
use anyhow::Result;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "store-configs")]
#[command(about = "Validate agent configs and store them in Redis", long_about = None)]
struct Cli {
    /// Directory holding <id>.json agent configs
    #[arg(short = 'd', long)]
    config_dir: Option<PathBuf>,

    /// Redis URL (overrides REDIS_URL)
    #[arg(long)]
    redis_url: Option<String>,

    /// Delete invalid stored configs without asking
    #[arg(short, long, conflicts_with = "keep_invalid")]
    yes: bool,

    /// Keep invalid stored configs without asking
    #[arg(long)]
    keep_invalid: bool,

    /// Verbose output (console logs on stderr)
    #[arg(short, long)]
    verbose: bool,
}

/// Ask until the answer is y/yes/n/no. EOF or Ctrl-C counts as no.
fn confirm_delete() -> Result<bool> {
    let mut rl = DefaultEditor::new()?;
    loop {
        match rl.readline("\nDo you want to delete these invalid configs from Redis? (y/n): ") {
            Ok(answer) => match parse_confirmation(&answer) {
                Some(decision) => return Ok(decision),
                None => println!("Please enter 'y' or 'n'"),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(false),
            Err(err) => return Err(err.into()),
        }
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

    let _guard = telemetry::init_logging(&config.log_dir, "store-configs", config.verbose)?;

    let store = RedisStore::connect(&config.redis_url).await?;
    println!("Connected to Redis successfully");

    let schema_path = config.config_dir.join(SCHEMA_FILE_NAME);
    let loaded_schema;
    let schema = if schema_path.is_file() {
        loaded_schema = AgentSchema::from_path(&schema_path)?;
        println!("Loaded agent config schema from {}", schema_path.display());
        &loaded_schema
    } else {
        println!("Using the built-in agent config schema");
        AgentSchema::embedded()?
    };

    let importer = Importer::new(&store, schema);
    importer.connect_check().await?;

    println!("\nChecking existing configs in Redis...");
    let scan = importer.scan_existing().await?;
    for key in &scan.valid {
        println!("✓ Redis key '{}' passes validation", key);
    }
    for (key, reason) in &scan.invalid {
        println!("⚠️  Redis key '{}' is invalid: {}", key, reason);
    }

    if scan.invalid.is_empty() {
        println!("✓ All existing configs in Redis are valid\n");
    } else {
        println!("\n🚨 WARNING: Found {} invalid configs in Redis:", scan.invalid.len());
        for (key, _) in &scan.invalid {
            println!("   - {}", key);
        }

        let delete = if cli.yes {
            true
        } else if cli.keep_invalid {
            false
        } else {
            confirm_delete()?
        };

        if delete {
            let deleted = importer.delete_invalid(&scan.invalid_keys()).await?;
            println!("\n✓ Deleted {} invalid configs from Redis\n", deleted);
        } else {
            println!("Invalid configs left in Redis. Please manually correct them.\n");
        }
    }

    let report = importer.import_dir(&config.config_dir).await?;
    println!(
        "Found {} config files to store",
        report.stored.len() + report.skipped.len()
    );
    for (file, key) in &report.stored {
        println!("Stored {} as key: {}", file.display(), key);
    }
    for (file, reason) in &report.skipped {
        println!("✗ Skipped {}: {}", file.display(), reason);
    }

    println!("\nStored configs in Redis:");
    for key in importer.list_keys().await? {
        println!("  {}", key);
    }

    Ok(())
}
