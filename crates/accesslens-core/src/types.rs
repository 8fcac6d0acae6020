//! Core types: discovery tasks, resources, and resource identity

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A unit of discovery work dispatched to a provider executor.
///
/// `ctx` carries pagination/continuation state that is opaque to the core;
/// the provider round-trips it between responses and follow-up tasks.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Task {
    #[serde(rename = "task")]
    pub name: String,
    #[serde(default)]
    pub ctx: BTreeMap<String, Value>,
}

impl Task {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ctx: BTreeMap::new(),
        }
    }

    pub fn with_ctx(name: impl Into<String>, ctx: BTreeMap<String, Value>) -> Self {
        Self {
            name: name.into(),
            ctx,
        }
    }
}

/// A discovered resource. `data` holds arbitrary provider-defined attributes,
/// some of which the schema marks as relations to other resource types.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

impl Resource {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            name: String::new(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// The unique identity of this resource for the whole discovery run.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.resource_type, &self.id)
    }

    /// Display label for graph output: `type/name` when a name is known,
    /// `type/id` otherwise.
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            format!("{}/{}", self.resource_type, self.id)
        } else {
            format!("{}/{}", self.resource_type, self.name)
        }
    }
}

/// Unique `type/id` identity of a resource - cheaply cloneable, ordered so
/// reports and graph output are deterministic.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(resource_type: &str, id: &str) -> Self {
        Self(format!("{}/{}", resource_type, id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&Resource> for ResourceKey {
    fn from(r: &Resource) -> Self {
        r.key()
    }
}
