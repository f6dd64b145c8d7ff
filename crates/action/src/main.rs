//! prsync - one-shot pull request to issue tracker reconciliation.
//!
//! Loads configuration, reads the triggering pull request event payload,
//! wires the collaborator adapters and runs the reconciliation engine once.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prsync_core::{
    load_config, load_config_from_env, validate_config, GithubRepoHost, HttpNotifier, JiraTracker,
    Notifier, PullRequestEvent, Reconciler, RepoHost, SyncOutcome, Tracker,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("prsync {}", VERSION);

    // Determine config path; a missing file is fine when the environment
    // provides everything (the CI-native path).
    let config_path = std::env::var("PRSYNC_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("prsync.toml"));

    let config = if config_path.exists() {
        info!("Loading configuration from {:?}", config_path);
        load_config(&config_path)
            .with_context(|| format!("Failed to load config from {:?}", config_path))?
    } else {
        info!(
            "No config file at {:?}, reading configuration from environment",
            config_path
        );
        load_config_from_env().context("Failed to load config from environment")?
    };

    validate_config(&config).context("Configuration validation failed")?;

    info!("Tracker host: {}", config.tracker.host);
    info!("Repository: {}", config.repo_host.repository);

    // Read the triggering event
    let raw_event = std::fs::read_to_string(&config.event_path)
        .with_context(|| format!("Failed to read event payload from {:?}", config.event_path))?;
    let event =
        PullRequestEvent::from_event_json(&raw_event).context("Failed to parse event payload")?;
    info!(
        number = event.number,
        merged = event.merged,
        branch = %event.head_branch,
        "Loaded pull request event"
    );

    // Wire the collaborators
    let repo_host: Arc<dyn RepoHost> = Arc::new(GithubRepoHost::new(config.repo_host.clone()));
    let tracker: Option<Arc<dyn Tracker>> =
        config.tracker.credentials.clone().map(|credentials| {
            Arc::new(JiraTracker::new(
                &config.tracker,
                credentials,
                config.project.key.clone(),
            )) as Arc<dyn Tracker>
        });
    if tracker.is_none() {
        info!("Tracker credentials not configured, tracker actions will be skipped");
    }
    let notifier: Arc<dyn Notifier> = Arc::new(HttpNotifier::new());

    // Run one reconciliation pass
    let reconciler = Reconciler::new(config, repo_host, tracker, notifier);
    match reconciler.run(&event).await? {
        SyncOutcome::Completed => info!("Reconciliation completed"),
        SyncOutcome::Skipped { reason } => info!(reason = %reason, "Reconciliation skipped"),
    }

    Ok(())
}
