//! Recursive concurrent resource loading
//!
//! The loader drives a provider executor over its whole task tree: every
//! response may carry follow-up tasks, each of which becomes its own
//! concurrent invocation, until no work remains or one branch fails.

mod fetcher;

pub use fetcher::ResourceFetcher;
