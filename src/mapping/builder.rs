//! Resolves a parsed [`super::config::ResourceMappingConfig`] against a
//! [`crate::schema::SchemaRegistry`] into a live [`super::resource::ResourceMapping`].
//!
//! This is the one place transformation identifiers and SCIM data types
//! are resolved from strings, so configuration errors are reported here
//! with the context of which mapping referenced the bad identifier.

use super::attribute::{AttributeMapper, CanonicalGroup, SubAttributeBinding, TypeBinding};
use super::config::{AttributeMappingConfig, ResourceMappingConfig};
use super::resource::ResourceMapping;
use crate::error::{GatewayError, Result};
use crate::schema::SchemaRegistry;
use crate::transform::Transformation;

/// Build a [`ResourceMapping`] from its XML-sourced configuration and the
/// schema registry it should validate attribute names against.
pub fn build(config: &ResourceMappingConfig, registry: &SchemaRegistry) -> Result<ResourceMapping> {
    let schema = registry.lookup_resource(&config.resource_name).ok_or_else(|| {
        GatewayError::config(format!(
            "resourceMapping references unknown resource '{}'",
            config.resource_name
        ))
    })?;

    let mut mappers = Vec::with_capacity(config.attribute_mappings.len());
    for mapping in &config.attribute_mappings {
        let attr_def = schema.attributes.iter().find(|a| {
            a.name.eq_ignore_ascii_case(mapping.scim_attribute())
        });
        let Some(attr_def) = attr_def else {
            return Err(GatewayError::config(format!(
                "attributeMapping references unknown attribute '{}' on resource '{}'",
                mapping.scim_attribute(),
                config.resource_name
            )));
        };

        let mapper = match mapping {
            AttributeMappingConfig::SingularSimple {
                scim_attribute,
                ldap_attribute,
                transformation,
            } => AttributeMapper::SingularSimple {
                scim_attr: scim_attribute.clone(),
                ldap_attribute: ldap_attribute.clone(),
                transformation: resolve_transformation(transformation)?,
                data_type: attr_def.data_type,
            },
            AttributeMappingConfig::SingularComplex {
                scim_attribute,
                sub_attributes,
            } => {
                let mut bindings = Vec::with_capacity(sub_attributes.len());
                for sub in sub_attributes {
                    let sub_def = attr_def.sub_attribute(&sub.name).ok_or_else(|| {
                        GatewayError::config(format!(
                            "attributeMapping '{scim_attribute}' references unknown sub-attribute '{}'",
                            sub.name
                        ))
                    })?;
                    bindings.push(SubAttributeBinding {
                        sub_attr_name: sub.name.clone(),
                        ldap_attribute: sub.ldap_attribute.clone(),
                        transformation: resolve_transformation(&sub.transformation)?,
                        data_type: sub_def.data_type,
                    });
                }
                AttributeMapper::SingularComplex {
                    scim_attr: scim_attribute.clone(),
                    sub_attributes: bindings,
                }
            }
            AttributeMappingConfig::PluralSimple {
                scim_attribute,
                default_ldap_attribute,
                transformation,
                type_mappings,
            } => {
                let value_def = attr_def.sub_attribute("value").unwrap_or(attr_def);
                let transformation = match transformation {
                    Some(name) => resolve_transformation(name)?,
                    None => Transformation::Default,
                };
                AttributeMapper::PluralSimple {
                    scim_attr: scim_attribute.clone(),
                    value_data_type: value_def.data_type,
                    transformation,
                    type_mappings: type_mappings
                        .iter()
                        .map(|t| TypeBinding {
                            type_tag: t.type_tag.clone(),
                            ldap_attribute: t.ldap_attribute.clone(),
                        })
                        .collect(),
                    default_ldap_attribute: default_ldap_attribute.clone(),
                }
            }
            AttributeMappingConfig::PluralComplex {
                scim_attribute,
                canonical_groups,
            } => {
                let mut groups = Vec::with_capacity(canonical_groups.len());
                for group in canonical_groups {
                    let mut bindings = Vec::with_capacity(group.sub_attributes.len());
                    for sub in &group.sub_attributes {
                        let sub_def = attr_def.sub_attribute(&sub.name).ok_or_else(|| {
                            GatewayError::config(format!(
                                "attributeMapping '{scim_attribute}' canonicalGroup '{}' references unknown sub-attribute '{}'",
                                group.type_tag, sub.name
                            ))
                        })?;
                        bindings.push(SubAttributeBinding {
                            sub_attr_name: sub.name.clone(),
                            ldap_attribute: sub.ldap_attribute.clone(),
                            transformation: resolve_transformation(&sub.transformation)?,
                            data_type: sub_def.data_type,
                        });
                    }
                    groups.push(CanonicalGroup {
                        type_tag: group.type_tag.clone(),
                        sub_attributes: bindings,
                    });
                }
                AttributeMapper::PluralComplex {
                    scim_attr: scim_attribute.clone(),
                    canonical_groups: groups,
                }
            }
        };
        mappers.push(mapper);
    }

    assert_no_overlapping_ldap_attributes(&config.resource_name, &mappers)?;

    Ok(ResourceMapping::new(
        config.resource_name.clone(),
        config.object_classes.clone(),
        config.dn_template.clone(),
        mappers,
    ))
}

fn resolve_transformation(name: &str) -> Result<Transformation> {
    match name.to_ascii_lowercase().as_str() {
        "default" => Ok(Transformation::Default),
        "generalizedtime" => Ok(Transformation::GeneralizedTime),
        "postaladdress" => Ok(Transformation::PostalAddress),
        "telephonenumber" => Ok(Transformation::TelephoneNumber),
        _ => Err(GatewayError::config(format!("unknown transformation '{name}'"))),
    }
}

/// Every LDAP attribute declared in any mapping must be owned by exactly
/// one attribute mapping within a resource mapping. A single mapper is
/// allowed to name the same LDAP attribute more than once internally
/// (a `PluralSimple`'s `defaultLdapAttribute` commonly coincides with one
/// of its own `typeMapping` attributes), so attributes are deduped per
/// mapper before the cross-mapper uniqueness test.
fn assert_no_overlapping_ldap_attributes(resource_name: &str, mappers: &[AttributeMapper]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for mapper in mappers {
        let mut owned_by_this_mapper = std::collections::HashSet::new();
        for ldap_attr in mapper.ldap_attribute_types() {
            let key = ldap_attr.to_ascii_lowercase();
            if !owned_by_this_mapper.insert(key.clone()) {
                continue;
            }
            if !seen.insert(key) {
                return Err(GatewayError::config(format!(
                    "LDAP attribute '{ldap_attr}' is bound by more than one attribute mapping on resource '{resource_name}'"
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::config::load_xml;
    use crate::schema::SchemaRegistry;

    const USER_MAPPING_XML: &str = r#"
<resourceMapping resourceName="User">
  <objectClass>inetOrgPerson</objectClass>
  <dnTemplate>uid={uid},ou=people,dc=example,dc=com</dnTemplate>
  <attributeMapping kind="singularSimple" scimAttribute="userName" ldapAttribute="uid" transformation="default"/>
  <attributeMapping kind="pluralSimple" scimAttribute="emails">
    <typeMapping type="work" ldapAttribute="mail"/>
    <typeMapping type="home" ldapAttribute="homeEmail"/>
  </attributeMapping>
</resourceMapping>
"#;

    #[test]
    fn builds_resource_mapping_from_config() {
        let config = load_xml(USER_MAPPING_XML).unwrap();
        let registry = SchemaRegistry::with_embedded_schemas().unwrap();
        let mapping = build(&config, &registry).unwrap();
        assert_eq!(mapping.resource_name(), "User");
        assert!(mapping.mapper_for("userName").is_some());
        assert!(mapping.mapper_for("emails").is_some());
    }

    #[test]
    fn rejects_unknown_resource_name() {
        let config = ResourceMappingConfig {
            resource_name: "Widget".to_string(),
            object_classes: vec![],
            dn_template: "cn={cn}".to_string(),
            attribute_mappings: vec![],
        };
        let registry = SchemaRegistry::with_embedded_schemas().unwrap();
        let err = build(&config, &registry).unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn rejects_unknown_transformation_identifier() {
        let xml = r#"
<resourceMapping resourceName="User">
  <dnTemplate>uid={uid}</dnTemplate>
  <attributeMapping kind="singularSimple" scimAttribute="userName" ldapAttribute="uid" transformation="bogus"/>
</resourceMapping>
"#;
        let config = load_xml(xml).unwrap();
        let registry = SchemaRegistry::with_embedded_schemas().unwrap();
        let err = build(&config, &registry).unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn rejects_overlapping_ldap_attribute_ownership() {
        let xml = r#"
<resourceMapping resourceName="User">
  <dnTemplate>uid={uid}</dnTemplate>
  <attributeMapping kind="singularSimple" scimAttribute="userName" ldapAttribute="uid" transformation="default"/>
  <attributeMapping kind="singularSimple" scimAttribute="displayName" ldapAttribute="uid" transformation="default"/>
</resourceMapping>
"#;
        let config = load_xml(xml).unwrap();
        let registry = SchemaRegistry::with_embedded_schemas().unwrap();
        let err = build(&config, &registry).unwrap_err();
        assert!(matches!(err, GatewayError::Config { .. }));
    }

    #[test]
    fn allows_a_plural_simple_default_that_coincides_with_one_of_its_own_type_mappings() {
        let xml = r#"
<resourceMapping resourceName="User">
  <dnTemplate>uid={uid}</dnTemplate>
  <attributeMapping kind="pluralSimple" scimAttribute="emails" defaultLdapAttribute="mail">
    <typeMapping type="work" ldapAttribute="mail"/>
    <typeMapping type="home" ldapAttribute="homeEmail"/>
  </attributeMapping>
</resourceMapping>
"#;
        let config = load_xml(xml).unwrap();
        let registry = SchemaRegistry::with_embedded_schemas().unwrap();
        let mapping = build(&config, &registry).unwrap();
        assert!(mapping.mapper_for("emails").is_some());
    }
}
