//! Mapping configuration: the XML document format a resource mapping is
//! loaded from, and the `load_xml` entry point.
//!
//! The wire format binds one resource name to a structural object class
//! set, a DN template, and an ordered list of attribute mappings. Each
//! attribute mapping is tagged with a `kind` attribute so the four
//! variants can share one element vocabulary:
//!
//! ```xml
//! <resourceMapping resourceName="User">
//!   <objectClass>inetOrgPerson</objectClass>
//!   <objectClass>organizationalPerson</objectClass>
//!   <dnTemplate>uid={uid},ou=people,dc=example,dc=com</dnTemplate>
//!   <attributeMapping kind="singularSimple" scimAttribute="userName"
//!                      ldapAttribute="uid" transformation="default"/>
//!   <attributeMapping kind="singularComplex" scimAttribute="name">
//!     <subAttribute name="familyName" ldapAttribute="sn" transformation="default"/>
//!     <subAttribute name="givenName" ldapAttribute="givenName" transformation="default"/>
//!   </attributeMapping>
//!   <attributeMapping kind="pluralSimple" scimAttribute="emails" defaultLdapAttribute="mail">
//!     <typeMapping type="work" ldapAttribute="mail"/>
//!     <typeMapping type="home" ldapAttribute="homeEmail"/>
//!   </attributeMapping>
//!   <attributeMapping kind="pluralComplex" scimAttribute="addresses">
//!     <canonicalGroup type="work">
//!       <subAttribute name="formatted" ldapAttribute="postalAddress" transformation="postalAddress"/>
//!     </canonicalGroup>
//!   </attributeMapping>
//! </resourceMapping>
//! ```

use crate::error::{GatewayError, Result};
use serde::Deserialize;

/// One `<subAttribute>` binding within a singular-complex mapping or a
/// plural-complex canonical value group.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAttributeConfig {
    #[serde(rename = "@name")]
    pub name: String,
    #[serde(rename = "@ldapAttribute")]
    pub ldap_attribute: String,
    #[serde(rename = "@transformation")]
    pub transformation: String,
}

/// One `<typeMapping>` within a plural-simple mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMappingConfig {
    #[serde(rename = "@type")]
    pub type_tag: String,
    #[serde(rename = "@ldapAttribute")]
    pub ldap_attribute: String,
}

/// One `<canonicalGroup>` within a plural-complex mapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalGroupConfig {
    #[serde(rename = "@type")]
    pub type_tag: String,
    #[serde(default, rename = "subAttribute")]
    pub sub_attributes: Vec<SubAttributeConfig>,
}

/// One `<attributeMapping>` element, tagged by its `kind` attribute.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "@kind", rename_all = "camelCase")]
pub enum AttributeMappingConfig {
    #[serde(rename_all = "camelCase")]
    SingularSimple {
        #[serde(rename = "@scimAttribute")]
        scim_attribute: String,
        #[serde(rename = "@ldapAttribute")]
        ldap_attribute: String,
        #[serde(rename = "@transformation")]
        transformation: String,
    },
    #[serde(rename_all = "camelCase")]
    SingularComplex {
        #[serde(rename = "@scimAttribute")]
        scim_attribute: String,
        #[serde(default, rename = "subAttribute")]
        sub_attributes: Vec<SubAttributeConfig>,
    },
    #[serde(rename_all = "camelCase")]
    PluralSimple {
        #[serde(rename = "@scimAttribute")]
        scim_attribute: String,
        #[serde(rename = "@defaultLdapAttribute")]
        default_ldap_attribute: Option<String>,
        #[serde(rename = "@transformation")]
        transformation: Option<String>,
        #[serde(default, rename = "typeMapping")]
        type_mappings: Vec<TypeMappingConfig>,
    },
    #[serde(rename_all = "camelCase")]
    PluralComplex {
        #[serde(rename = "@scimAttribute")]
        scim_attribute: String,
        #[serde(default, rename = "canonicalGroup")]
        canonical_groups: Vec<CanonicalGroupConfig>,
    },
}

impl AttributeMappingConfig {
    /// The SCIM attribute name this mapping binds, regardless of kind.
    pub fn scim_attribute(&self) -> &str {
        match self {
            AttributeMappingConfig::SingularSimple { scim_attribute, .. }
            | AttributeMappingConfig::SingularComplex { scim_attribute, .. }
            | AttributeMappingConfig::PluralSimple { scim_attribute, .. }
            | AttributeMappingConfig::PluralComplex { scim_attribute, .. } => scim_attribute,
        }
    }
}

/// The full configuration for one resource type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMappingConfig {
    #[serde(rename = "@resourceName")]
    pub resource_name: String,
    #[serde(default, rename = "objectClass")]
    pub object_classes: Vec<String>,
    pub dn_template: String,
    #[serde(default, rename = "attributeMapping")]
    pub attribute_mappings: Vec<AttributeMappingConfig>,
}

/// Parse a resource mapping configuration document.
///
/// Unknown transformation identifiers are not rejected here — they
/// surface as a `Config` error when [`super::attribute::AttributeMapper`]
/// construction resolves the transformation name, so the error carries
/// the context of which mapping referenced it.
pub fn load_xml(xml: &str) -> Result<ResourceMappingConfig> {
    quick_xml::de::from_str(xml)
        .map_err(|e| GatewayError::config(format!("mapping configuration: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
<resourceMapping resourceName="User">
  <objectClass>inetOrgPerson</objectClass>
  <objectClass>organizationalPerson</objectClass>
  <dnTemplate>uid={uid},ou=people,dc=example,dc=com</dnTemplate>
  <attributeMapping kind="singularSimple" scimAttribute="userName" ldapAttribute="uid" transformation="default"/>
  <attributeMapping kind="pluralSimple" scimAttribute="emails" defaultLdapAttribute="mail">
    <typeMapping type="work" ldapAttribute="mail"/>
    <typeMapping type="home" ldapAttribute="homeEmail"/>
  </attributeMapping>
</resourceMapping>
"#;

    #[test]
    fn parses_resource_name_and_object_classes() {
        let config = load_xml(SAMPLE).unwrap();
        assert_eq!(config.resource_name, "User");
        assert_eq!(
            config.object_classes,
            vec!["inetOrgPerson", "organizationalPerson"]
        );
        assert_eq!(config.dn_template, "uid={uid},ou=people,dc=example,dc=com");
    }

    #[test]
    fn parses_attribute_mappings_in_declared_order() {
        let config = load_xml(SAMPLE).unwrap();
        assert_eq!(config.attribute_mappings.len(), 2);
        assert_eq!(config.attribute_mappings[0].scim_attribute(), "userName");
        assert_eq!(config.attribute_mappings[1].scim_attribute(), "emails");
        match &config.attribute_mappings[1] {
            AttributeMappingConfig::PluralSimple { type_mappings, .. } => {
                assert_eq!(type_mappings.len(), 2);
            }
            other => panic!("expected PluralSimple, got {other:?}"),
        }
    }

    #[test]
    fn malformed_xml_is_a_config_error() {
        let err = load_xml("<resourceMapping><unterminated>").unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }
}
