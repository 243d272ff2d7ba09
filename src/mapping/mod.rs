//! Declarative resource/attribute mapping: binds SCIM attribute paths
//! to LDAP attribute types, and compiles SCIM filters against those
//! bindings.
//!
//! - [`config`] — the XML-persisted mapping configuration.
//! - [`builder`] — resolves configuration against a schema registry.
//! - [`attribute`] — the four attribute-mapper variants.
//! - [`resource`] — `ResourceMapping`, aggregating a resource's mappers.
//! - [`compiler`] — the filter-to-LDAP-filter compiler.

pub mod attribute;
pub mod builder;
pub mod compiler;
pub mod config;
pub mod resource;

pub use attribute::AttributeMapper;
pub use builder::build;
pub use config::{load_xml, ResourceMappingConfig};
pub use resource::ResourceMapping;
