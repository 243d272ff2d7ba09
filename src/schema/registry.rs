//! Schema registry: the read-only `(schemaURI, attributeName) -> descriptor`
//! and `resourceName -> descriptor` lookup tables.
//!
//! A registry is built once, at startup, and is thereafter immutable —
//! every lookup is a plain `HashMap` read, safe to share across worker
//! threads without locking.

use super::{embedded, types::Schema};
use std::collections::HashMap;

/// Registry of SCIM resource schemas.
///
/// Resource names are looked up case-insensitively; schema URIs are
/// looked up case-sensitively, per §4.A. Both indexes are normalized at
/// construction time rather than at every lookup.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    by_resource_name: HashMap<String, Schema>,
    by_schema_uri: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Build a registry from an explicit list of schemas.
    pub fn new(schemas: Vec<Schema>) -> Self {
        let mut by_resource_name = HashMap::with_capacity(schemas.len());
        let mut by_schema_uri = HashMap::with_capacity(schemas.len());

        for schema in schemas {
            by_resource_name.insert(schema.name.to_ascii_lowercase(), schema.clone());
            by_schema_uri.insert(schema.id.clone(), schema);
        }

        Self {
            by_resource_name,
            by_schema_uri,
        }
    }

    /// Build a registry with the embedded core `User` and `Group` schemas.
    ///
    /// The common case needs no external schema files.
    pub fn with_embedded_schemas() -> crate::error::Result<Self> {
        let user = embedded::core_user_schema()?;
        let group = embedded::core_group_schema()?;
        Ok(Self::new(vec![user, group]))
    }

    /// `lookupResource(name) -> descriptor | NotFound`.
    pub fn lookup_resource(&self, name: &str) -> Option<&Schema> {
        self.by_resource_name.get(&name.to_ascii_lowercase())
    }

    /// `lookupAttribute(schemaURI, name) -> descriptor | NotFound`.
    ///
    /// The schema URI is matched exactly; the attribute name is matched
    /// case-insensitively.
    pub fn lookup_attribute(
        &self,
        schema_uri: &str,
        name: &str,
    ) -> Option<&super::types::AttributeDefinition> {
        self.by_schema_uri
            .get(schema_uri)?
            .attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    /// `lookupSubAttribute(parent, name) -> descriptor | NotFound`.
    pub fn lookup_sub_attribute<'a>(
        &self,
        parent: &'a super::types::AttributeDefinition,
        name: &str,
    ) -> Option<&'a super::types::AttributeDefinition> {
        parent.sub_attribute(name)
    }

    /// All registered schemas, in no particular order.
    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.by_schema_uri.values()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_embedded_schemas().expect("embedded schemas must parse")
    }
}
