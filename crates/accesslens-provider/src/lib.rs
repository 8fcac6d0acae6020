//! Provider executors - the pluggable discovery backends
//!
//! A provider is whatever actually talks to the cloud: the core only sees the
//! [`ProviderExecutor`] trait. The shipped implementation,
//! [`LocalProvider`], runs the provider as a subprocess and exchanges one
//! JSON request/response pair per invocation over its standard streams.

mod local;

pub use local::LocalProvider;

use accesslens_core::{DescribeResponse, LoadResponse, Result, Task};

/// Executes discovery work on behalf of the core.
///
/// Implementations must be safe to invoke concurrently: the loader fans out
/// one invocation per task with no coordination beyond cancellation.
#[async_trait::async_trait]
pub trait ProviderExecutor: Send + Sync {
    /// Fetch the provider's schema and config document.
    async fn describe(&self) -> Result<DescribeResponse>;

    /// Run one discovery task, returning a resource batch and any follow-up
    /// tasks the provider wants scheduled.
    async fn load_resources(&self, task: Task) -> Result<LoadResponse>;
}
