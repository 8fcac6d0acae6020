//! Schema-driven graph construction

use crate::graph::AccessGraph;
use accesslens_core::{Error, ProviderSchema, Resource, ResourceKey, Result};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Resource type whose vertices are reachability entry points.
pub const DEFAULT_PRINCIPAL_TYPE: &str = "User";

/// Build the relationship graph for a deduplicated resource set.
///
/// Returns the graph and the principal vertices (resources of
/// `principal_type`), both deterministic for a given input: resources and
/// their data fields are processed in sorted order.
///
/// Fail-closed: any schema shape violation, or a relation value that is not a
/// plain string identifier, aborts construction. A partial graph would
/// silently under-report relationships, which an access-governance report
/// cannot afford.
pub fn build_graph(
    resources: &HashMap<ResourceKey, Resource>,
    schema: &ProviderSchema,
    principal_type: &str,
) -> Result<(AccessGraph, Vec<ResourceKey>)> {
    let mut graph = AccessGraph::new();
    let mut principals = Vec::new();

    let ordered: BTreeMap<&ResourceKey, &Resource> = resources.iter().collect();

    for (key, resource) in ordered {
        debug!(key = %key, "adding vertex");

        // fail-closed before any field is inspected: a type the schema does
        // not know means its relations cannot be trusted
        if !schema.has_type(&resource.resource_type) {
            return Err(Error::schema(format!(
                "no schema for resource type {}",
                resource.resource_type
            )));
        }

        // The vertex may already exist as the unlabeled target of another
        // resource's relation; either way it gets its real label here.
        let idx = graph.ensure_vertex(key.clone()).index();
        graph.set_label(idx, resource.label());

        if resource.resource_type == principal_type {
            principals.push(key.clone());
        }

        for (field, value) in &resource.data {
            if value.is_null() {
                continue;
            }

            let target_type = match schema.relation_target(&resource.resource_type, field)? {
                Some(target) => target,
                None => continue,
            };

            let id = value.as_str().ok_or_else(|| {
                Error::schema(format!(
                    "relation field {}.{} must be a string identifier, got {}",
                    key, field, value
                ))
            })?;

            // Target may never be independently discovered; it still gets a
            // (synthetic, unlabeled) vertex.
            let target_key = ResourceKey::new(target_type, id);
            let target_idx = graph.ensure_vertex(target_key).index();
            graph.add_edge(idx, target_idx)?;
        }
    }

    principals.sort();
    Ok((graph, principals))
}
