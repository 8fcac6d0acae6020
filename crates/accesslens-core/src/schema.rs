//! Typed provider schema - validated once at load time
//!
//! The provider's describe document is loosely-typed JSON. Rather than
//! inspecting its nesting at every field access, the whole document is
//! validated up front into [`ProviderSchema`]; later relation lookups can no
//! longer fail on shape.

use crate::error::{Error, Result};
use crate::types::Task;
use serde_json::Value;
use std::collections::HashMap;

/// Validated schema for one provider: which loader tasks it exposes and, per
/// resource type, which data fields denote a relation to another type.
#[derive(Clone, Debug)]
pub struct ProviderSchema {
    loaders: Vec<String>,
    types: HashMap<String, TypeSchema>,
}

#[derive(Clone, Debug, Default)]
struct TypeSchema {
    /// Field name → relation target type (None for plain attributes).
    fields: HashMap<String, Option<String>>,
}

impl ProviderSchema {
    /// Validate the `schema` value of a describe response.
    ///
    /// Expected shape:
    ///
    /// ```json
    /// { "resources": {
    ///     "loaders": { "listUsers": {} },
    ///     "types": {
    ///       "User": { "properties": { "data": { "role": { "relation": "Role" } } } }
    ///     } } }
    /// ```
    pub fn parse(doc: &Value) -> Result<Self> {
        let resources = doc
            .get("resources")
            .ok_or_else(|| Error::schema("describe document has no resources object"))?;
        let resources = as_object(resources, "resources")?;

        let mut loaders: Vec<String> = match resources.get("loaders") {
            Some(v) => as_object(v, "resources.loaders")?.keys().cloned().collect(),
            None => Vec::new(),
        };
        loaders.sort();

        let mut types = HashMap::new();
        if let Some(v) = resources.get("types") {
            for (type_name, type_doc) in as_object(v, "resources.types")? {
                types.insert(type_name.clone(), parse_type(type_name, type_doc)?);
            }
        }

        Ok(Self { loaders, types })
    }

    /// Loader task names declared by the provider, sorted.
    pub fn loaders(&self) -> &[String] {
        &self.loaders
    }

    /// One initial task (with empty context) per declared loader.
    pub fn initial_tasks(&self) -> Vec<Task> {
        self.loaders.iter().map(Task::new).collect()
    }

    pub fn has_type(&self, resource_type: &str) -> bool {
        self.types.contains_key(resource_type)
    }

    /// Relation target for a data field of a resource type.
    ///
    /// Returns `Ok(None)` for plain attributes and for fields the schema does
    /// not know (a field absent from the schema is never a relation). An
    /// unknown resource type is a schema error: relations for it cannot be
    /// trusted, and under-reporting is not acceptable here.
    pub fn relation_target(&self, resource_type: &str, field: &str) -> Result<Option<&str>> {
        let type_schema = self
            .types
            .get(resource_type)
            .ok_or_else(|| Error::schema(format!("no schema for resource type {}", resource_type)))?;
        Ok(type_schema
            .fields
            .get(field)
            .and_then(|relation| relation.as_deref()))
    }
}

fn parse_type(type_name: &str, doc: &Value) -> Result<TypeSchema> {
    let type_doc = as_object(doc, type_name)?;
    let properties = type_doc
        .get("properties")
        .ok_or_else(|| Error::schema(format!("type {} has no properties object", type_name)))?;
    let properties = as_object(properties, "properties")?;

    let mut fields = HashMap::new();
    if let Some(data) = properties.get("data") {
        for (field, field_doc) in as_object(data, "properties.data")? {
            let field_doc = as_object(field_doc, field)?;
            let relation = match field_doc.get("relation") {
                Some(Value::String(target)) => Some(target.clone()),
                Some(other) => {
                    return Err(Error::schema(format!(
                        "relation of {}.{} must be a type name, got {}",
                        type_name, field, other
                    )))
                }
                None => None,
            };
            fields.insert(field.clone(), relation);
        }
    }

    Ok(TypeSchema { fields })
}

fn as_object<'a>(
    value: &'a Value,
    context: &str,
) -> Result<&'a serde_json::Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::schema(format!("{} must be an object, got {}", context, value)))
}
