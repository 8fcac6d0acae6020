//! JSON-lines resource store
//!
//! One discovery run becomes one `reports/<timestamp>.jsonl` file, one
//! resource per line in key order. Downstream tooling can query it however it
//! likes; the core only guarantees a stable key and a flat attribute map.

use accesslens_core::{Resource, ResourceKey, ResourceSink, Result};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// A sink writing into `dir`, named by the current UTC time.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let filename = format!("{}.jsonl", Utc::now().format("%Y-%m-%dT%H-%M-%S"));
        Self {
            path: dir.as_ref().join(filename),
        }
    }
}

#[async_trait::async_trait]
impl ResourceSink for JsonlSink {
    async fn store(&self, resources: &HashMap<ResourceKey, Resource>) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        let ordered: BTreeMap<&ResourceKey, &Resource> = resources.iter().collect();
        let mut out = String::new();
        for resource in ordered.values() {
            out.push_str(&serde_json::to_string(resource)?);
            out.push('\n');
        }

        tokio::fs::write(&self.path, out).await?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
