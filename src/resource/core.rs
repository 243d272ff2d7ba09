//! The SCIM resource representation the mapping layer reads from and
//! writes to.
//!
//! A resource is a thin, schema-agnostic wrapper over a JSON object.
//! Schema-aware structure (which attributes exist, which are
//! multi-valued, which sub-attributes a complex value has) lives in the
//! [`crate::schema`] and [`crate::mapping`] modules, not here; this type's
//! job is attribute-path get/set over the underlying `Value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A generic SCIM resource: a type tag plus its JSON attribute map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// The resource type, e.g. `User` or `Group`.
    pub resource_type: String,
    /// The resource's attributes.
    pub data: Value,
}

impl Resource {
    /// Wrap a resource type and its attribute data.
    pub fn new(resource_type: impl Into<String>, data: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            data,
        }
    }

    /// Read a top-level simple attribute by name (case-sensitive — callers
    /// are expected to have already resolved the attribute's declared
    /// name via the schema registry).
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Read a sub-attribute of a top-level complex attribute.
    pub fn get_sub(&self, name: &str, sub_name: &str) -> Option<&Value> {
        self.data.get(name)?.get(sub_name)
    }

    /// Read a top-level multi-valued attribute as a slice of its entries.
    pub fn get_plural(&self, name: &str) -> &[Value] {
        self.data
            .get(name)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Set a top-level attribute, creating the object if necessary.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        if !self.data.is_object() {
            self.data = Value::Object(Map::new());
        }
        if let Some(obj) = self.data.as_object_mut() {
            obj.insert(name.into(), value);
        }
    }

    /// The resource's attribute map, if it is a JSON object.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.data.as_object()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_reads_top_level_attribute() {
        let resource = Resource::new("User", json!({"userName": "bjensen"}));
        assert_eq!(resource.get("userName").unwrap(), "bjensen");
        assert!(resource.get("missing").is_none());
    }

    #[test]
    fn get_sub_reads_nested_attribute() {
        let resource = Resource::new(
            "User",
            json!({"name": {"familyName": "Jensen", "givenName": "Barbara"}}),
        );
        assert_eq!(resource.get_sub("name", "familyName").unwrap(), "Jensen");
        assert!(resource.get_sub("name", "missing").is_none());
        assert!(resource.get_sub("missing", "familyName").is_none());
    }

    #[test]
    fn get_plural_returns_empty_slice_when_absent() {
        let resource = Resource::new("User", json!({"userName": "bjensen"}));
        assert!(resource.get_plural("emails").is_empty());
    }

    #[test]
    fn set_creates_and_overwrites_attributes() {
        let mut resource = Resource::new("User", json!({}));
        resource.set("userName", json!("bjensen"));
        assert_eq!(resource.get("userName").unwrap(), "bjensen");
        resource.set("userName", json!("bjensen2"));
        assert_eq!(resource.get("userName").unwrap(), "bjensen2");
    }
}
