use std::env;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use tonisynth::{ServerConfig, core::storage::BlobAudioStore, routes, state::AppState};

const USAGE: &str = "Usage: tonisynth [-c <config.yaml>] [serve | stats [--container NAME] | cleanup [--days N] [--delete] [--container NAME]]";

const DEFAULT_CLEANUP_DAYS: u32 = 7;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize crypto provider for TLS connections
    // This must be done before any TLS connections are attempted
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("Failed to install default crypto provider"))?;

    let mut args = env::args().skip(1).peekable();
    let mut config_path: Option<PathBuf> = None;
    if matches!(args.peek().map(String::as_str), Some("-c" | "--config")) {
        args.next();
        let path = args.next().ok_or_else(|| anyhow!("--config requires a file path"))?;
        config_path = Some(PathBuf::from(path));
    }

    let config = match &config_path {
        Some(path) => ServerConfig::from_file(path),
        None => ServerConfig::from_env(),
    }
    .map_err(|e| anyhow!(e.to_string()))?;

    match args.next().as_deref() {
        None | Some("serve") => {
            if let Some(extra) = args.next() {
                anyhow::bail!("Unexpected argument '{extra}' after 'serve'");
            }
            serve(config).await
        }
        Some("stats") => {
            let container = parse_container_only(args)?;
            let store = open_store(&config, container)?;
            let stats = store.storage_stats().await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        Some("cleanup") => {
            let mut days = DEFAULT_CLEANUP_DAYS;
            let mut delete = false;
            let mut container = None;
            while let Some(arg) = args.next() {
                match arg.as_str() {
                    "--days" => {
                        let value = args.next().ok_or_else(|| anyhow!("--days requires a value"))?;
                        days = value
                            .parse()
                            .with_context(|| format!("Invalid --days value '{value}'"))?;
                    }
                    "--delete" => delete = true,
                    "--container" => {
                        container =
                            Some(args.next().ok_or_else(|| anyhow!("--container requires a name"))?);
                    }
                    other => anyhow::bail!("Unknown option '{other}'. {USAGE}"),
                }
            }

            let store = open_store(&config, container)?;
            let report = store.cleanup_older_than(days, !delete).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.dry_run {
                println!("Dry run only. Pass --delete to remove these blobs.");
            }
            Ok(())
        }
        Some(other) => anyhow::bail!("Unknown command '{other}'. {USAGE}"),
    }
}

fn parse_container_only(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<String>> {
    let mut container = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--container" => {
                container = Some(args.next().ok_or_else(|| anyhow!("--container requires a name"))?);
            }
            other => anyhow::bail!("Unknown option '{other}'. {USAGE}"),
        }
    }
    Ok(container)
}

fn open_store(config: &ServerConfig, container: Option<String>) -> anyhow::Result<BlobAudioStore> {
    let mut credentials = config.storage_credentials().map_err(|e| anyhow!(e))?;
    if let Some(container) = container {
        credentials.container = container;
    }
    Ok(BlobAudioStore::azure(&credentials)?)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let address = config.address();
    tracing::info!(address = %address, "Starting server");

    let app_state = AppState::new(config)?;
    let app = routes::create_app(app_state);

    let listener = TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
