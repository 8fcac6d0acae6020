//! Tool config - serde structs for an optional accesslens.json
//!
//! Pure types and parsing only. Every field has a working default so the CLI
//! runs without a config file; flags override whatever the file provides.

use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub provider: ProviderConfig,
    pub output: OutputConfig,
    pub loader: LoaderConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Directory the provider command runs in.
    pub dir: Option<String>,
    /// Command launched per invocation (default "./provider").
    pub command: Option<String>,
    /// Kill a provider invocation after this many seconds.
    #[serde(rename = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Where the DOT serialization of the graph is written.
    #[serde(rename = "graphPath")]
    pub graph_path: Option<String>,
    /// Directory for persisted resource reports.
    #[serde(rename = "reportsDir")]
    pub reports_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Cap on total tasks spawned in one run. Default: unbounded.
    #[serde(rename = "taskLimit")]
    pub task_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Resource type treated as the reachability entry point (default "User").
    #[serde(rename = "principalType")]
    pub principal_type: Option<String>,
}

impl InspectorConfig {
    /// Load from a JSON file; a missing file is the default config.
    pub fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
