//! ResourceFetcher - JoinSet fan-out with single-owner deduplication

use accesslens_core::{Error, LoadResponse, Resource, ResourceKey, Result, Task};
use accesslens_provider::ProviderExecutor;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Fetches resources from a provider based on its schema's loader tasks.
///
/// Every task, initial or follow-up, runs as its own tokio task in a
/// dynamically growing pool. The driver loop is the single owner of the
/// deduplication map: batches are merged as responses arrive, so no lock is
/// held and a key collision resolves to whichever write lands last. The
/// first error cancels the whole pool.
pub struct ResourceFetcher {
    executor: Arc<dyn ProviderExecutor>,
    task_limit: Option<usize>,
}

impl ResourceFetcher {
    pub fn new(executor: Arc<dyn ProviderExecutor>) -> Self {
        Self {
            executor,
            task_limit: None,
        }
    }

    /// Cap the total number of tasks spawned in one run. A provider that
    /// keeps returning follow-up tasks would otherwise never terminate; the
    /// default stays unbounded to preserve observable provider semantics.
    pub fn with_task_limit(mut self, limit: usize) -> Self {
        self.task_limit = Some(limit);
        self
    }

    /// Invoke the provider for every task, transitively, and return the
    /// deduplicated resource set. Each call starts from an empty map.
    ///
    /// Fails fast: the first `Error` aborts all in-flight invocations and
    /// prevents scheduled-but-unstarted ones from launching. Already-merged
    /// resources are discarded with the failed run.
    pub async fn load_resources(
        &self,
        initial: Vec<Task>,
    ) -> Result<HashMap<ResourceKey, Resource>> {
        let mut resources: HashMap<ResourceKey, Resource> = HashMap::new();
        let mut pool: JoinSet<Result<LoadResponse>> = JoinSet::new();
        let cancel = CancellationToken::new();
        let mut spawned = 0usize;

        for task in initial {
            self.spawn_task(&mut pool, &cancel, &mut spawned, task)?;
        }

        while let Some(joined) = pool.join_next().await {
            let response = match joined {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    return Err(Self::fail(&mut pool, &cancel, e).await);
                }
                // Aborted siblings of an earlier failure; nothing to merge.
                Err(e) if e.is_cancelled() => continue,
                Err(e) => {
                    let e = Error::executor(format!("loader task panicked: {}", e));
                    return Err(Self::fail(&mut pool, &cancel, e).await);
                }
            };

            for resource in response.resources {
                info!(
                    resource_type = %resource.resource_type,
                    id = %resource.id,
                    name = %resource.name,
                    "found resource"
                );
                // last write wins on key collisions
                resources.insert(resource.key(), resource);
            }

            for task in response.tasks {
                if let Err(e) = self.spawn_task(&mut pool, &cancel, &mut spawned, task) {
                    return Err(Self::fail(&mut pool, &cancel, e).await);
                }
            }
        }

        debug!(tasks = spawned, resources = resources.len(), "run complete");
        Ok(resources)
    }

    fn spawn_task(
        &self,
        pool: &mut JoinSet<Result<LoadResponse>>,
        cancel: &CancellationToken,
        spawned: &mut usize,
        task: Task,
    ) -> Result<()> {
        if let Some(limit) = self.task_limit {
            if *spawned >= limit {
                return Err(Error::TaskLimitExceeded { limit });
            }
        }
        *spawned += 1;

        let executor = Arc::clone(&self.executor);
        let cancel = cancel.clone();
        pool.spawn(async move {
            // A sibling already failed; never launch this invocation.
            if cancel.is_cancelled() {
                return Ok(LoadResponse::default());
            }
            debug!(task = %task.name, "running task");
            executor.load_resources(task).await
        });
        Ok(())
    }

    /// Cancel and drain the pool, surfacing any provider diagnostics before
    /// handing the first error back to the caller.
    async fn fail(
        pool: &mut JoinSet<Result<LoadResponse>>,
        cancel: &CancellationToken,
        first: Error,
    ) -> Error {
        cancel.cancel();
        pool.abort_all();
        while pool.join_next().await.is_some() {}

        if let Some(stderr) = first.diagnostics() {
            error!(stderr = %stderr, "provider wrote diagnostic output");
        }
        first
    }
}
