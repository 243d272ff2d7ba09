//! # SCIM↔LDAP mapping and filter-compilation core
//!
//! This crate is the resource-mapping and filter-translation engine at
//! the heart of a SCIM (System for Cross-domain Identity Management)
//! gateway backed by an LDAP directory. It does not speak HTTP or LDAP
//! wire protocol itself — it translates between SCIM's nested, typed
//! resources and LDAP's flat, octet-string entries, and compiles SCIM
//! filter expressions into RFC 4515 LDAP filters.
//!
//! ## Layout
//!
//! - [`schema`] — the SCIM resource/attribute schema registry.
//! - [`transform`] — value transformations between SCIM and LDAP values.
//! - [`resource`] — the generic SCIM resource representation.
//! - [`ldap`] — the LDAP entry and compiled-filter data model.
//! - [`filter`] — the SCIM filter lexer, parser, and AST.
//! - [`mapping`] — declarative attribute/resource mapping and the filter
//!   compiler that ties everything together.
//! - [`error`] — the crate's single error type.
//!
//! ## Example
//!
//! ```
//! use scim_ldap_gateway::mapping::{self, ResourceMapping};
//! use scim_ldap_gateway::mapping::attribute::{AttributeMapper};
//! use scim_ldap_gateway::schema::AttributeType;
//! use scim_ldap_gateway::transform::Transformation;
//! use scim_ldap_gateway::resource::Resource;
//! use serde_json::json;
//!
//! let mapping = ResourceMapping::new(
//!     "User",
//!     vec!["inetOrgPerson".to_string()],
//!     "uid={uid},ou=people,dc=example,dc=com",
//!     vec![AttributeMapper::SingularSimple {
//!         scim_attr: "userName".to_string(),
//!         ldap_attribute: "uid".to_string(),
//!         transformation: Transformation::Default,
//!         data_type: AttributeType::String,
//!     }],
//! );
//!
//! let resource = Resource::new("User", json!({"userName": "bjensen"}));
//! let entry = mapping.to_ldap_attributes(&resource).unwrap();
//! assert_eq!(entry.dn, "uid=bjensen,ou=people,dc=example,dc=com");
//! let _ = mapping::load_xml;
//! ```

pub mod error;
pub mod filter;
pub mod ldap;
pub mod mapping;
pub mod resource;
pub mod schema;
pub mod transform;

pub use error::{GatewayError, Result};
pub use ldap::{Attribute as LdapAttribute, Entry as LdapEntry, LdapFilter};
pub use mapping::{AttributeMapper, ResourceMapping};
pub use resource::Resource;
pub use schema::{AttributeDefinition, AttributeType, Schema, SchemaRegistry};
