//! # Access Graph
//!
//! Relationship graph over discovered resources and per-principal
//! reachability analysis.
//!
//! ```text
//! HashMap<ResourceKey, Resource>
//!     │
//!     ├──> Graph Builder (schema-driven)
//!     │      ├─ One labeled vertex per discovered resource
//!     │      ├─ Synthetic vertices for referenced-but-undiscovered targets
//!     │      └─ One edge per schema-declared relation
//!     │
//!     ├──> Access Graph (petgraph)
//!     │      ├─ Vertices: ResourceKeys with display labels
//!     │      └─ Edges: "has relation to"
//!     │
//!     └──> Reachability Analyzer
//!            └─ BFS blast radius per principal
//! ```

mod builder;
mod graph;
mod reach;

pub use builder::{build_graph, DEFAULT_PRINCIPAL_TYPE};
pub use graph::{AccessGraph, VertexInsert};
pub use reach::compute_reachability;
