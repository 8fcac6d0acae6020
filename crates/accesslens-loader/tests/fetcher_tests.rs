//! Tests for the ResourceFetcher: fan-out, dedup, fail-fast, task limits

use accesslens_core::{
    DescribeResponse, Error, LoadResponse, Resource, ResourceKey, Result, Task,
};
use accesslens_loader::ResourceFetcher;
use accesslens_provider::ProviderExecutor;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A provider with a canned response per task name. Unknown tasks yield an
/// empty response (terminating that branch).
struct ScriptedProvider {
    steps: HashMap<String, Step>,
}

enum Step {
    Respond(LoadResponse),
    Fail { message: String, stderr: String },
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            steps: HashMap::new(),
        }
    }

    fn respond(mut self, task: &str, resources: Vec<Resource>, tasks: Vec<&str>) -> Self {
        self.steps.insert(
            task.to_string(),
            Step::Respond(LoadResponse {
                resources,
                tasks: tasks.into_iter().map(Task::new).collect(),
            }),
        );
        self
    }

    fn fail(mut self, task: &str, message: &str, stderr: &str) -> Self {
        self.steps.insert(
            task.to_string(),
            Step::Fail {
                message: message.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }
}

#[async_trait::async_trait]
impl ProviderExecutor for ScriptedProvider {
    async fn describe(&self) -> Result<DescribeResponse> {
        Ok(DescribeResponse::default())
    }

    async fn load_resources(&self, task: Task) -> Result<LoadResponse> {
        match self.steps.get(&task.name) {
            Some(Step::Respond(response)) => Ok(response.clone()),
            Some(Step::Fail { message, stderr }) => {
                Err(Error::executor_with_stderr(message.clone(), stderr.clone()))
            }
            None => Ok(LoadResponse::default()),
        }
    }
}

fn fetcher(provider: ScriptedProvider) -> ResourceFetcher {
    ResourceFetcher::new(Arc::new(provider))
}

#[tokio::test]
async fn empty_branch_terminates_silently() {
    let resources = fetcher(ScriptedProvider::new())
        .load_resources(vec![Task::new("nothing")])
        .await
        .unwrap();
    assert!(resources.is_empty());
}

#[tokio::test]
async fn fan_out_collects_all_levels() {
    let provider = ScriptedProvider::new()
        .respond("root", vec![Resource::new("Account", "a0")], vec!["left", "right"])
        .respond("left", vec![Resource::new("User", "u1")], vec!["leaf"])
        .respond("right", vec![Resource::new("Role", "r1")], vec![])
        .respond("leaf", vec![Resource::new("Permission", "p1")], vec![]);

    let resources = fetcher(provider)
        .load_resources(vec![Task::new("root")])
        .await
        .unwrap();

    assert_eq!(resources.len(), 4);
    assert!(resources.contains_key(&ResourceKey::new("Account", "a0")));
    assert!(resources.contains_key(&ResourceKey::new("User", "u1")));
    assert!(resources.contains_key(&ResourceKey::new("Role", "r1")));
    assert!(resources.contains_key(&ResourceKey::new("Permission", "p1")));
}

#[tokio::test]
async fn concurrent_duplicates_dedup_to_one_entry() {
    let provider = ScriptedProvider::new()
        .respond("a", vec![Resource::new("Role", "r1").with_name("Admin")], vec![])
        .respond("b", vec![Resource::new("Role", "r1").with_name("Administrator")], vec![]);

    let resources = fetcher(provider)
        .load_resources(vec![Task::new("a"), Task::new("b")])
        .await
        .unwrap();

    assert_eq!(resources.len(), 1);
    let r = &resources[&ResourceKey::new("Role", "r1")];
    // last write wins; either name is acceptable, but there is exactly one
    assert!(r.name == "Admin" || r.name == "Administrator");
}

#[tokio::test]
async fn first_error_fails_the_run_with_diagnostics() {
    let provider = ScriptedProvider::new()
        .respond("ok1", vec![Resource::new("User", "u1")], vec![])
        .fail("bad", "provider exited with code 1", "boom")
        .respond("ok2", vec![Resource::new("User", "u2")], vec![]);

    let err = fetcher(provider)
        .load_resources(vec![Task::new("ok1"), Task::new("bad"), Task::new("ok2")])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("boom"), "got: {err}");
    assert_eq!(err.diagnostics(), Some("boom"));
}

/// A provider that records every invocation. "blocked" tasks park forever
/// once started; the "bad" task waits until both siblings are in flight and
/// then fails, so cancellation is observed with known work outstanding.
struct GatedProvider {
    invoked: Mutex<Vec<String>>,
    blocked_started: AtomicUsize,
}

impl GatedProvider {
    fn new() -> Self {
        Self {
            invoked: Mutex::new(Vec::new()),
            blocked_started: AtomicUsize::new(0),
        }
    }

    fn invocations(&self) -> Vec<String> {
        let mut names = self.invoked.lock().unwrap().clone();
        names.sort();
        names
    }
}

#[async_trait::async_trait]
impl ProviderExecutor for GatedProvider {
    async fn describe(&self) -> Result<DescribeResponse> {
        Ok(DescribeResponse::default())
    }

    async fn load_resources(&self, task: Task) -> Result<LoadResponse> {
        self.invoked.lock().unwrap().push(task.name.clone());
        match task.name.as_str() {
            "bad" => {
                while self.blocked_started.load(Ordering::SeqCst) < 2 {
                    tokio::time::sleep(Duration::from_millis(2)).await;
                }
                Err(Error::executor_with_stderr("provider exited with code 1", "boom"))
            }
            _ => {
                self.blocked_started.fetch_add(1, Ordering::SeqCst);
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

#[tokio::test]
async fn cancellation_stops_siblings_and_launches_nothing_more() {
    let provider = Arc::new(GatedProvider::new());

    let err = ResourceFetcher::new(provider.clone())
        .load_resources(vec![
            Task::new("blocked1"),
            Task::new("blocked2"),
            Task::new("bad"),
        ])
        .await
        .unwrap_err();

    assert_eq!(err.diagnostics(), Some("boom"));

    // the blocked siblings were in flight when the failure was observed and
    // got aborted mid-invocation; nothing else was ever launched
    let at_failure = provider.invocations();
    assert_eq!(at_failure, ["bad", "blocked1", "blocked2"]);

    // any scheduled-but-unstarted work that leaked past cancellation would
    // invoke the executor now
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    assert_eq!(provider.invocations(), at_failure);
}

#[tokio::test]
async fn error_in_follow_up_task_fails_the_run() {
    let provider = ScriptedProvider::new()
        .respond("root", vec![Resource::new("Account", "a0")], vec!["child"])
        .fail("child", "invoke failed", "no credentials");

    let err = fetcher(provider)
        .load_resources(vec![Task::new("root")])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Executor { .. }));
}

#[tokio::test]
async fn task_limit_stops_a_runaway_provider() {
    let provider = ScriptedProvider::new().respond(
        "loop",
        vec![Resource::new("User", "u1")],
        vec!["loop"],
    );

    let err = fetcher(provider)
        .with_task_limit(10)
        .load_resources(vec![Task::new("loop")])
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TaskLimitExceeded { limit: 10 }), "got: {err:?}");
}

#[tokio::test]
async fn each_call_starts_from_a_clean_map() {
    let provider = ScriptedProvider::new()
        .respond("a", vec![Resource::new("User", "u1")], vec![]);
    let fetcher = fetcher(provider);

    let first = fetcher.load_resources(vec![Task::new("a")]).await.unwrap();
    assert_eq!(first.len(), 1);

    // a run with no matching tasks sees none of the previous run's resources
    let second = fetcher.load_resources(vec![Task::new("other")]).await.unwrap();
    assert!(second.is_empty());
}
