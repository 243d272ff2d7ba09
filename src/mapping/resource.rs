//! Resource mapper: aggregates the attribute mappers for a single SCIM
//! resource type.

use super::attribute::AttributeMapper;
use crate::error::Result;
use crate::filter::Filter;
use crate::ldap::{Entry, LdapFilter};
use crate::resource::Resource;
use log::{debug, warn};
use std::collections::HashSet;

/// Binds one SCIM resource type to its object classes, DN template, and
/// ordered attribute mappers.
#[derive(Debug, Clone)]
pub struct ResourceMapping {
    resource_name: String,
    object_classes: Vec<String>,
    dn_template: String,
    attribute_mappers: Vec<AttributeMapper>,
}

impl ResourceMapping {
    /// Build a mapping from its resolved parts. Construction happens once
    /// at startup, typically via [`super::compiler::compile`].
    pub fn new(
        resource_name: impl Into<String>,
        object_classes: Vec<String>,
        dn_template: impl Into<String>,
        attribute_mappers: Vec<AttributeMapper>,
    ) -> Self {
        Self {
            resource_name: resource_name.into(),
            object_classes,
            dn_template: dn_template.into(),
            attribute_mappers,
        }
    }

    /// The SCIM resource type this mapping serves.
    pub fn resource_name(&self) -> &str {
        &self.resource_name
    }

    /// Look up the mapper owning a given SCIM attribute name.
    pub fn mapper_for(&self, scim_attr: &str) -> Option<&AttributeMapper> {
        self.attribute_mappers
            .iter()
            .find(|m| m.scim_attribute().eq_ignore_ascii_case(scim_attr))
    }

    /// `toLDAPAttributes(resource) -> [ldap-attr]`: concatenate every
    /// mapper's output, then add the configured object classes.
    pub fn to_ldap_attributes(&self, resource: &Resource) -> Result<Entry> {
        let dn = self.construct_dn(resource)?;
        let mut entry = Entry::new(dn);
        for mapper in &self.attribute_mappers {
            mapper.to_ldap_attributes(resource, &mut entry)?;
        }
        if !self.object_classes.is_empty() {
            entry.set_values(
                "objectClass",
                self.object_classes
                    .iter()
                    .map(|c| c.clone().into_bytes())
                    .collect(),
            );
        }
        Ok(entry)
    }

    /// `toSCIMAttributes(resourceName, entry, projection) -> [scim-attr]`.
    ///
    /// An empty projection requests every mapped attribute.
    pub fn to_scim_attributes(&self, entry: &Entry, projection: &HashSet<String>) -> Result<Resource> {
        let mut data = serde_json::Map::new();
        for mapper in &self.attribute_mappers {
            if !projection.is_empty()
                && !projection
                    .iter()
                    .any(|p| p.eq_ignore_ascii_case(mapper.scim_attribute()))
            {
                continue;
            }
            if let Some((name, value)) = mapper.to_scim_attribute(entry)? {
                data.insert(name, value);
            } else {
                debug!(
                    "attribute '{}' absent from entry '{}'",
                    mapper.scim_attribute(),
                    entry.dn
                );
            }
        }
        Ok(Resource::new(self.resource_name.clone(), serde_json::Value::Object(data)))
    }

    /// `toLDAPFilter(scimFilter)`: delegates to the filter compiler.
    pub fn to_ldap_filter(&self, filter: &Filter) -> Result<LdapFilter> {
        super::compiler::compile(self, filter)
    }

    /// `toLDAPSortKey()`: the LDAP attribute a SCIM `sortBy` attribute name
    /// resolves to, or `None` if the attribute has no mapper or the mapper
    /// has no single attribute that can stand in for sort order (complex
    /// and plural-complex mappers).
    pub fn sort_key_for(&self, scim_attr: &str) -> Option<String> {
        self.mapper_for(scim_attr)?.to_ldap_sort_key()
    }

    /// `constructDN(resource)`: resolve `{attrName}` placeholders in the
    /// DN template against the resource's mapped attributes, using each
    /// attribute's first LDAP value. Unresolvable placeholders (the
    /// mapper is missing, or the attribute is absent on this resource)
    /// log a warning and are left as an empty string — a missing DN
    /// component is a data problem for the caller to reject, not a
    /// reason for this call itself to fail.
    pub fn construct_dn(&self, resource: &Resource) -> Result<String> {
        let mut dn = String::with_capacity(self.dn_template.len());
        let mut rest = self.dn_template.as_str();
        while let Some(start) = rest.find('{') {
            dn.push_str(&rest[..start]);
            let Some(end) = rest[start..].find('}') else {
                dn.push_str(&rest[start..]);
                rest = "";
                break;
            };
            let placeholder = &rest[start + 1..start + end];
            dn.push_str(&self.resolve_dn_placeholder(placeholder, resource));
            rest = &rest[start + end + 1..];
        }
        dn.push_str(rest);
        Ok(dn)
    }

    fn resolve_dn_placeholder(&self, ldap_attr: &str, resource: &Resource) -> String {
        let mut scratch = Entry::new("");
        for mapper in &self.attribute_mappers {
            if mapper
                .ldap_attribute_types()
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ldap_attr))
            {
                if let Err(e) = mapper.to_ldap_attributes(resource, &mut scratch) {
                    warn!("DN placeholder '{{{ldap_attr}}}' failed to resolve: {e}");
                    return String::new();
                }
            }
        }
        match scratch.attribute(ldap_attr).and_then(|a| a.first()) {
            Some(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            None => {
                warn!("DN placeholder '{{{ldap_attr}}}' has no value for this resource");
                String::new()
            }
        }
    }
}
