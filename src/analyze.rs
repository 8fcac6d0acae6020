//! `analyze` command - build the graph and report per-principal reachability

use accesslens_core::config::InspectorConfig;
use accesslens_core::ProviderSchema;
use accesslens_graph::{build_graph, compute_reachability, DEFAULT_PRINCIPAL_TYPE};
use accesslens_loader::ResourceFetcher;
use accesslens_provider::ProviderExecutor;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

pub async fn run(
    config: &InspectorConfig,
    provider_dir: PathBuf,
    command: Option<String>,
    dot: Option<PathBuf>,
    principal_type: Option<String>,
    task_limit: Option<usize>,
) -> anyhow::Result<()> {
    let provider = Arc::new(crate::scan::build_provider(config, provider_dir, command));

    let describe = provider.describe().await?;
    let schema = ProviderSchema::parse(&describe.schema)?;
    let tasks = schema.initial_tasks();

    info!(tasks = ?schema.loaders(), "loading resources");

    let mut fetcher = ResourceFetcher::new(provider);
    if let Some(limit) = task_limit.or(config.loader.task_limit) {
        fetcher = fetcher.with_task_limit(limit);
    }
    let resources = fetcher.load_resources(tasks).await?;

    let principal_type = principal_type
        .or_else(|| config.analysis.principal_type.clone())
        .unwrap_or_else(|| DEFAULT_PRINCIPAL_TYPE.to_string());

    let (graph, principals) = build_graph(&resources, &schema, &principal_type)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        principals = principals.len(),
        "graph built"
    );

    let reachability = compute_reachability(&graph, &principals);
    for (principal, reachable) in &reachability {
        println!("{} can reach {} resources:", principal, reachable.len());
        for key in reachable {
            println!("  {}", key);
        }
    }

    let dot_path = dot
        .or_else(|| config.output.graph_path.clone().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("report.dot"));
    tokio::fs::write(&dot_path, graph.to_dot()).await?;
    info!(path = %dot_path.display(), "wrote graph");

    Ok(())
}
