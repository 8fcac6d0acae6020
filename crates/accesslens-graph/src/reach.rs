//! Per-principal reachability analysis

use crate::graph::AccessGraph;
use accesslens_core::ResourceKey;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use tracing::info;

/// Compute the blast radius of each principal: every vertex reachable via
/// outgoing relation edges, excluding the principal itself.
///
/// Plain BFS with a visited set, so cycles terminate; adjacency comes back
/// in key order, so visitation (and any logging) is reproducible. A principal
/// missing from the graph gets an empty set.
pub fn compute_reachability(
    graph: &AccessGraph,
    principals: &[ResourceKey],
) -> BTreeMap<ResourceKey, BTreeSet<ResourceKey>> {
    let mut result = BTreeMap::new();

    for principal in principals {
        let mut reachable = BTreeSet::new();

        if let Some(start) = graph.index_of(principal) {
            let mut visited = HashSet::from([start]);
            let mut frontier = VecDeque::from([start]);

            while let Some(current) = frontier.pop_front() {
                for next in graph.neighbors_sorted(current) {
                    if visited.insert(next) {
                        reachable.insert(graph.key_of(next).clone());
                        frontier.push_back(next);
                    }
                }
            }
        }

        info!(principal = %principal, reachable = reachable.len(), "analyzed access");
        result.insert(principal.clone(), reachable);
    }

    result
}
