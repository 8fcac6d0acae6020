//! Provider wire protocol - one JSON request/response pair per invocation
//!
//! Wire format:
//!
//! Core → Provider (stdin, single JSON object):
//!   { "op": "describe" }
//!   { "op": "loadResources", "task": "listUsers", "ctx": { "page": "2" } }
//!
//! Provider → Core (stdout, single JSON object):
//!   { "resources": [ { "type": "User", "id": "u1", "name": "alice", "data": {...} } ],
//!     "tasks": [ { "task": "listUsersPage", "ctx": { "page": "3" } } ] }
//!
//!   { "schema": { "resources": { "loaders": {...}, "types": {...} } },
//!     "config": { "region": "us-west-2" } }
//!
//! Diagnostics travel on the provider's stderr and are surfaced by the
//! executor on failure.

use crate::types::{Resource, Task};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Request written to the provider process.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ProviderRequest {
    Describe,
    LoadResources {
        task: String,
        #[serde(default)]
        ctx: BTreeMap<String, Value>,
    },
}

impl ProviderRequest {
    pub fn load(task: Task) -> Self {
        Self::LoadResources {
            task: task.name,
            ctx: task.ctx,
        }
    }
}

/// Response to a `loadResources` request: a batch of discovered resources
/// plus zero or more follow-up tasks to schedule.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LoadResponse {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Response to a `describe` request: the raw schema document (validated into
/// a typed model by [`crate::schema::ProviderSchema`]) plus provider config.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DescribeResponse {
    #[serde(default)]
    pub schema: Value,
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
}
