//! Resource persistence boundary
//!
//! The loader hands its deduplicated resource set to a sink for later
//! querying. The core only requires a stable key and a flat attribute map per
//! resource; what the backend does with them is its own concern.

use crate::error::Result;
use crate::types::{Resource, ResourceKey};
use std::collections::HashMap;

/// Pluggable persistence backend for a completed discovery run.
#[async_trait::async_trait]
pub trait ResourceSink: Send + Sync {
    /// Persist the full deduplicated resource set of one run.
    async fn store(&self, resources: &HashMap<ResourceKey, Resource>) -> Result<()>;

    /// Physical location of the stored run (for human inspection).
    fn location(&self) -> String;
}
