//! Tests for LocalProvider against real shell subprocesses

use accesslens_core::{Error, ResourceKey, Task};
use accesslens_provider::{LocalProvider, ProviderExecutor};
use std::path::PathBuf;
use std::time::Duration;

fn test_dir() -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "accesslens-provider-test-{}-{}",
        std::process::id(),
        id
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &std::path::Path) {
    let _ = std::fs::remove_dir_all(dir);
}

fn write_provider(dir: &std::path::Path, script: &str) {
    std::fs::write(dir.join("provider.sh"), script).unwrap();
}

fn provider(dir: &std::path::Path) -> LocalProvider {
    LocalProvider::new(dir).with_command("sh provider.sh")
}

#[tokio::test]
async fn describe_round_trips_over_stdio() {
    let dir = test_dir();
    write_provider(
        &dir,
        r#"cat > request.json
echo '{"schema":{"resources":{"loaders":{"listUsers":{}},"types":{}}},"config":{"region":"us-west-2"}}'
"#,
    );

    let describe = provider(&dir).describe().await.unwrap();
    assert_eq!(describe.config["region"], "us-west-2");
    assert!(describe.schema["resources"]["loaders"]["listUsers"].is_object());

    // the request actually reached the provider's stdin
    let request = std::fs::read_to_string(dir.join("request.json")).unwrap();
    assert!(request.contains("\"op\":\"describe\""));

    cleanup(&dir);
}

#[tokio::test]
async fn load_resources_parses_the_response_batch() {
    let dir = test_dir();
    write_provider(
        &dir,
        r#"cat > request.json
echo '{"resources":[{"type":"User","id":"u1","name":"alice","data":{"role":"r1"}}],"tasks":[{"task":"listUsersPage","ctx":{"page":"2"}}]}'
"#,
    );

    let response = provider(&dir)
        .load_resources(Task::new("listUsers"))
        .await
        .unwrap();

    assert_eq!(response.resources.len(), 1);
    assert_eq!(response.resources[0].key(), ResourceKey::new("User", "u1"));
    assert_eq!(response.tasks.len(), 1);
    assert_eq!(response.tasks[0].name, "listUsersPage");

    let request = std::fs::read_to_string(dir.join("request.json")).unwrap();
    assert!(request.contains("\"op\":\"loadResources\""));
    assert!(request.contains("\"task\":\"listUsers\""));

    cleanup(&dir);
}

#[tokio::test]
async fn nonzero_exit_surfaces_captured_stderr() {
    let dir = test_dir();
    write_provider(
        &dir,
        r#"cat > /dev/null
echo "boom: no credentials" >&2
exit 1
"#,
    );

    let err = provider(&dir)
        .load_resources(Task::new("listUsers"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Executor { .. }), "got {err:?}");
    assert!(err.to_string().contains("exited with code 1"));
    assert_eq!(err.diagnostics(), Some("boom: no credentials"));

    cleanup(&dir);
}

#[tokio::test]
async fn garbage_stdout_is_an_executor_error() {
    let dir = test_dir();
    write_provider(
        &dir,
        r#"cat > /dev/null
echo 'not json'
"#,
    );

    let err = provider(&dir)
        .load_resources(Task::new("listUsers"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Executor { .. }));

    cleanup(&dir);
}

#[tokio::test]
async fn slow_provider_hits_the_timeout() {
    let dir = test_dir();
    write_provider(
        &dir,
        r#"cat > /dev/null
sleep 30
"#,
    );

    let err = provider(&dir)
        .with_timeout(Duration::from_millis(200))
        .load_resources(Task::new("listUsers"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("timed out"), "got {err}");

    cleanup(&dir);
}
