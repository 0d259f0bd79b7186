//! Filegate CLI — resolve upload events against the reputation service.
//!
//! Configuration comes from the environment (see GateConfig); the reputation
//! host and API key are resolved through the secret store at startup.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use filegate_cli::{init_tracing, portal_base_url};
use filegate_core::{ContentHash, EnvSecretStore, GateConfig, SecretStore, UploadEvent};
use filegate_pipeline::{Orchestrator, PollPolicy, Resolution, RouteTable};
use filegate_reputation::{ReputationClient, ReputationService};
use filegate_storage::create_storage;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "filegate", about = "File quarantine pipeline CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle an upload event end to end (verdict, routing, analysis)
    Handle {
        /// Path to the provider's event JSON; reads stdin when omitted
        /// and no inline fields are given
        #[arg(long)]
        event_file: Option<std::path::PathBuf>,
        /// Source bucket (inline event)
        #[arg(long, requires = "object", requires = "md5")]
        bucket: Option<String>,
        /// Object name (inline event)
        #[arg(long)]
        object: Option<String>,
        /// Provider-encoded content hash (inline event)
        #[arg(long)]
        md5: Option<String>,
    },
    /// Look up the verdict for a content hash
    Verdict {
        /// Content hash, hex-encoded
        hash: String,
    },
    /// Submit a local file for analysis
    Submit {
        /// Path to the file to submit
        file: std::path::PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn load_event(
    event_file: Option<std::path::PathBuf>,
    bucket: Option<String>,
    object: Option<String>,
    md5: Option<String>,
) -> anyhow::Result<UploadEvent> {
    if let (Some(bucket), Some(object), Some(md5)) = (&bucket, &object, &md5) {
        return Ok(UploadEvent::new(bucket, object, md5));
    }

    let raw = match event_file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Read event file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
                .context("Read event from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Parse upload event JSON")
}

async fn build_client(config: &GateConfig) -> anyhow::Result<ReputationClient> {
    let secrets = match &config.project_id {
        Some(project) => EnvSecretStore::scoped(project),
        None => EnvSecretStore::new(),
    };

    let portal = secrets
        .resolve(&config.api_portal_secret)
        .await
        .context("Resolve reputation portal secret")?;
    let api_key = secrets
        .resolve(&config.api_key_secret)
        .await
        .context("Resolve reputation API key secret")?;

    ReputationClient::new(
        portal_base_url(&portal),
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )
    .context("Build reputation client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = GateConfig::from_env().context("Load configuration")?;
    let client = build_client(&config).await?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Handle {
            event_file,
            bucket,
            object,
            md5,
        } => {
            let event = load_event(event_file, bucket, object, md5)?;
            let storage = create_storage(&config)
                .await
                .context("Create storage backend")?;
            let orchestrator = Orchestrator::new(
                Arc::new(client),
                storage,
                RouteTable::from_config(&config),
                PollPolicy::from_config(&config),
            );

            let resolution = orchestrator.handle(&event).await?;
            match &resolution {
                Resolution::Routed { verdict, .. } => {
                    print_json(&serde_json::json!({
                        "outcome": "routed",
                        "verdict": verdict,
                        "object": event.source_location().to_string(),
                    }))?;
                }
                Resolution::AlreadyRouted => {
                    print_json(&serde_json::json!({ "outcome": "already-routed" }))?;
                }
                Resolution::AnalysisTimedOut => {
                    print_json(&serde_json::json!({ "outcome": "analysis-timed-out" }))?;
                    std::process::exit(1);
                }
                Resolution::Failed(reason) => {
                    print_json(&serde_json::json!({
                        "outcome": "failed",
                        "reason": format!("{:?}", reason),
                    }))?;
                    std::process::exit(1);
                }
            }
        }
        Commands::Verdict { hash } => {
            let hash = ContentHash::from_hex(&hash);
            let verdict = client.verdict_by_hash(&hash).await?;
            print_json(&serde_json::json!({
                "hash": hash.as_str(),
                "verdict": verdict,
            }))?;
        }
        Commands::Submit { file } => {
            let content = std::fs::read(&file)
                .with_context(|| format!("Read file {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            client.submit(&name, content).await?;
            print_json(&serde_json::json!({ "submitted": name }))?;
        }
    }

    Ok(())
}
