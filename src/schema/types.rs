//! Core schema type definitions for SCIM resources and attributes.
//!
//! These mirror RFC 7643's schema model closely enough to describe real
//! SCIM resources, while carrying the one piece of information the mapping
//! layer actually needs beyond validation: the ordered list of recognized
//! *type tags* for a multi-valued attribute (`work`, `home`, `mobile`, …),
//! reusing the `canonicalValues` field for that purpose.

use serde::{Deserialize, Serialize};

/// A SCIM resource descriptor: a schema plus its metadata.
///
/// Doubles as both "resource descriptor" and "schema": a resource type
/// in this crate's scope is exactly one schema's worth of attributes,
/// since extension schemas are outside the mapping core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema identifier (URI), e.g.
    /// `urn:ietf:params:scim:schemas:core:2.0:User`.
    pub id: String,
    /// Human-readable resource type name, e.g. `User`.
    pub name: String,
    /// Schema description.
    pub description: String,
    /// List of attribute definitions.
    pub attributes: Vec<AttributeDefinition>,
}

/// Definition of a SCIM attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDefinition {
    /// Attribute name, compared case-insensitively by the registry.
    pub name: String,
    /// Data type of the attribute.
    #[serde(rename = "type")]
    pub data_type: AttributeType,
    /// Whether this attribute can have multiple values.
    #[serde(rename = "multiValued")]
    pub multi_valued: bool,
    /// Whether this attribute is required.
    #[serde(default)]
    pub required: bool,
    /// Whether string comparison is case-sensitive.
    #[serde(rename = "caseExact", default)]
    pub case_exact: bool,
    /// Ordered recognized type tags for a multi-valued attribute (`work`,
    /// `home`, `mobile`, …). Empty for single-valued attributes.
    #[serde(rename = "canonicalValues", default)]
    pub canonical_values: Vec<String>,
    /// Sub-attribute definitions; only populated for `Complex` attributes.
    #[serde(rename = "subAttributes", default)]
    pub sub_attributes: Vec<AttributeDefinition>,
}

impl AttributeDefinition {
    /// Look up a sub-attribute definition by case-insensitive name.
    pub fn sub_attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.sub_attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

impl Default for AttributeDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            data_type: AttributeType::String,
            multi_valued: false,
            required: false,
            case_exact: false,
            canonical_values: Vec::new(),
            sub_attributes: Vec::new(),
        }
    }
}

/// SCIM attribute data types relevant to the mapping core.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    /// String value.
    String,
    /// ISO-8601 date-time value.
    DateTime,
    /// Boolean value.
    Boolean,
    /// Integer value.
    Integer,
    /// Binary data, base64-encoded on the SCIM side.
    Binary,
    /// Complex attribute with sub-attributes.
    Complex,
}

impl Default for AttributeType {
    fn default() -> Self {
        Self::String
    }
}

impl AttributeType {
    /// The name used in error messages and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::DateTime => "datetime",
            AttributeType::Boolean => "boolean",
            AttributeType::Integer => "integer",
            AttributeType::Binary => "binary",
            AttributeType::Complex => "complex",
        }
    }
}
