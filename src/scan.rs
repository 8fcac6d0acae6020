//! `scan` command - discover everything and persist it

use crate::store::JsonlSink;
use accesslens_core::config::InspectorConfig;
use accesslens_core::{ProviderSchema, ResourceSink};
use accesslens_loader::ResourceFetcher;
use accesslens_provider::{LocalProvider, ProviderExecutor};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub async fn run(
    config: &InspectorConfig,
    provider_dir: PathBuf,
    command: Option<String>,
    output: Option<PathBuf>,
    task_limit: Option<usize>,
) -> anyhow::Result<()> {
    let provider = Arc::new(build_provider(config, provider_dir, command));

    let describe = provider.describe().await?;
    let schema = ProviderSchema::parse(&describe.schema)?;
    let tasks = schema.initial_tasks();

    info!(tasks = ?schema.loaders(), "loading resources");

    let mut fetcher = ResourceFetcher::new(provider);
    if let Some(limit) = task_limit.or(config.loader.task_limit) {
        fetcher = fetcher.with_task_limit(limit);
    }
    let resources = fetcher.load_resources(tasks).await?;

    let reports_dir = output
        .or_else(|| config.output.reports_dir.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("reports"));
    let sink = JsonlSink::new(reports_dir);
    sink.store(&resources).await?;

    info!(
        resources = resources.len(),
        location = %sink.location(),
        "scan complete"
    );
    Ok(())
}

pub fn build_provider(
    config: &InspectorConfig,
    provider_dir: PathBuf,
    command: Option<String>,
) -> LocalProvider {
    let mut provider = LocalProvider::new(provider_dir);
    if let Some(cmd) = command.or_else(|| config.provider.command.clone()) {
        provider = provider.with_command(cmd);
    }
    if let Some(secs) = config.provider.timeout_secs {
        provider = provider.with_timeout(Duration::from_secs(secs));
    }
    provider
}
