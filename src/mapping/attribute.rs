//! Attribute mappers: the four closed variants binding one SCIM
//! attribute to one or more LDAP attributes.
//!
//! Implemented as a tagged sum with one dispatching `impl` block, not a
//! trait-object hierarchy, since the set of variants is closed and each
//! variant's read/write/filter logic differs enough that a shared trait
//! would mostly be boilerplate.

use crate::error::Result;
use crate::filter::{CompareOp, FilterValue};
use crate::ldap::{Entry, LdapFilter};
use crate::resource::Resource;
use crate::schema::AttributeType;
use crate::transform::{SimpleValue, Transformation};
use serde_json::Value;

/// One `(typeTag -> ldapAttribute)` binding in a plural-simple mapping.
#[derive(Debug, Clone)]
pub struct TypeBinding {
    pub type_tag: String,
    pub ldap_attribute: String,
}

/// One `(subAttrName -> ldapAttribute)` binding, shared by singular-complex
/// mappings and the per-group bindings of a plural-complex mapping.
#[derive(Debug, Clone)]
pub struct SubAttributeBinding {
    pub sub_attr_name: String,
    pub ldap_attribute: String,
    pub transformation: Transformation,
    pub data_type: AttributeType,
}

impl SubAttributeBinding {
    fn matches(&self, name: &str) -> bool {
        self.sub_attr_name.eq_ignore_ascii_case(name)
    }
}

/// One canonical value group in a plural-complex mapping: a type tag
/// plus the sub-attribute bindings that apply when a value carries it.
#[derive(Debug, Clone)]
pub struct CanonicalGroup {
    pub type_tag: String,
    pub sub_attributes: Vec<SubAttributeBinding>,
}

/// One of the four attribute-mapper variants.
#[derive(Debug, Clone)]
pub enum AttributeMapper {
    SingularSimple {
        scim_attr: String,
        ldap_attribute: String,
        transformation: Transformation,
        data_type: AttributeType,
    },
    SingularComplex {
        scim_attr: String,
        sub_attributes: Vec<SubAttributeBinding>,
    },
    PluralSimple {
        scim_attr: String,
        value_data_type: AttributeType,
        transformation: Transformation,
        type_mappings: Vec<TypeBinding>,
        default_ldap_attribute: Option<String>,
    },
    PluralComplex {
        scim_attr: String,
        canonical_groups: Vec<CanonicalGroup>,
    },
}

impl AttributeMapper {
    /// The SCIM attribute this mapper binds, regardless of variant.
    pub fn scim_attribute(&self) -> &str {
        match self {
            AttributeMapper::SingularSimple { scim_attr, .. }
            | AttributeMapper::SingularComplex { scim_attr, .. }
            | AttributeMapper::PluralSimple { scim_attr, .. }
            | AttributeMapper::PluralComplex { scim_attr, .. } => scim_attr,
        }
    }

    /// `ldapAttributeTypes() -> set<string>`: every LDAP attribute this
    /// mapper reads or writes, deduplicated — a `PluralSimple`'s default
    /// attribute commonly coincides with one of its own `type_mappings`
    /// attributes, and this is a set, not a multiset.
    pub fn ldap_attribute_types(&self) -> Vec<String> {
        match self {
            AttributeMapper::SingularSimple { ldap_attribute, .. } => vec![ldap_attribute.clone()],
            AttributeMapper::SingularComplex { sub_attributes, .. } => sub_attributes
                .iter()
                .map(|s| s.ldap_attribute.clone())
                .collect(),
            AttributeMapper::PluralSimple {
                type_mappings,
                default_ldap_attribute,
                ..
            } => {
                let mut types: Vec<String> =
                    type_mappings.iter().map(|t| t.ldap_attribute.clone()).collect();
                if let Some(d) = default_ldap_attribute {
                    if !types.iter().any(|t| t.eq_ignore_ascii_case(d)) {
                        types.push(d.clone());
                    }
                }
                types
            }
            AttributeMapper::PluralComplex { canonical_groups, .. } => canonical_groups
                .iter()
                .flat_map(|g| g.sub_attributes.iter().map(|s| s.ldap_attribute.clone()))
                .collect(),
        }
    }

    /// `toLDAPAttributes(resource, out)`.
    pub fn to_ldap_attributes(&self, resource: &Resource, out: &mut Entry) -> Result<()> {
        match self {
            AttributeMapper::SingularSimple {
                scim_attr,
                ldap_attribute,
                transformation,
                data_type,
            } => {
                if let Some(value) = resource.get(scim_attr).filter(|v| !v.is_null()) {
                    if let Some(simple) = json_to_simple_value(value, *data_type) {
                        let bytes = transformation.to_ldap_value(*data_type, &simple)?;
                        out.add_value(ldap_attribute, bytes);
                    }
                }
            }
            AttributeMapper::SingularComplex {
                scim_attr,
                sub_attributes,
            } => {
                for sub in sub_attributes {
                    if let Some(value) = resource.get_sub(scim_attr, &sub.sub_attr_name) {
                        if let Some(simple) = json_to_simple_value(value, sub.data_type) {
                            let bytes = sub.transformation.to_ldap_value(sub.data_type, &simple)?;
                            out.add_value(&sub.ldap_attribute, bytes);
                        }
                    }
                }
            }
            AttributeMapper::PluralSimple {
                scim_attr,
                value_data_type,
                transformation,
                type_mappings,
                default_ldap_attribute,
            } => {
                for item in resource.get_plural(scim_attr) {
                    let Some(value) = item.get("value").filter(|v| !v.is_null()) else {
                        continue;
                    };
                    let type_tag = item.get("type").and_then(Value::as_str);
                    let target = type_tag
                        .and_then(|tag| {
                            type_mappings
                                .iter()
                                .find(|t| t.type_tag.eq_ignore_ascii_case(tag))
                        })
                        .map(|t| &t.ldap_attribute)
                        .or(default_ldap_attribute.as_ref());
                    let Some(target) = target else { continue };
                    if let Some(simple) = json_to_simple_value(value, *value_data_type) {
                        let bytes = transformation.to_ldap_value(*value_data_type, &simple)?;
                        out.add_value(target, bytes);
                    }
                }
            }
            AttributeMapper::PluralComplex {
                scim_attr,
                canonical_groups,
            } => {
                for item in resource.get_plural(scim_attr) {
                    let Some(tag) = item.get("type").and_then(Value::as_str) else {
                        continue;
                    };
                    let Some(group) = canonical_groups
                        .iter()
                        .find(|g| g.type_tag.eq_ignore_ascii_case(tag))
                    else {
                        continue;
                    };
                    for sub in &group.sub_attributes {
                        if let Some(value) = item.get(&sub.sub_attr_name).filter(|v| !v.is_null()) {
                            if let Some(simple) = json_to_simple_value(value, sub.data_type) {
                                let bytes = sub.transformation.to_ldap_value(sub.data_type, &simple)?;
                                out.add_value(&sub.ldap_attribute, bytes);
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// `toSCIMAttribute(entry) -> SCIMAttribute | null`.
    pub fn to_scim_attribute(&self, entry: &Entry) -> Result<Option<(String, Value)>> {
        match self {
            AttributeMapper::SingularSimple {
                scim_attr,
                ldap_attribute,
                transformation,
                data_type,
            } => {
                let Some(bytes) = entry.attribute(ldap_attribute).and_then(|a| a.first()) else {
                    return Ok(None);
                };
                let simple = transformation.to_scim_value(*data_type, bytes)?;
                Ok(Some((scim_attr.clone(), simple_value_to_json(simple))))
            }
            AttributeMapper::SingularComplex {
                scim_attr,
                sub_attributes,
            } => {
                let mut obj = serde_json::Map::new();
                for sub in sub_attributes {
                    if let Some(bytes) = entry.attribute(&sub.ldap_attribute).and_then(|a| a.first()) {
                        let simple = sub.transformation.to_scim_value(sub.data_type, bytes)?;
                        obj.insert(sub.sub_attr_name.clone(), simple_value_to_json(simple));
                    }
                }
                if obj.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some((scim_attr.clone(), Value::Object(obj))))
                }
            }
            AttributeMapper::PluralSimple {
                scim_attr,
                value_data_type,
                transformation,
                type_mappings,
                ..
            } => {
                let mut entries = Vec::new();
                for binding in type_mappings {
                    let Some(attr) = entry.attribute(&binding.ldap_attribute) else {
                        continue;
                    };
                    for bytes in &attr.values {
                        let simple = transformation.to_scim_value(*value_data_type, bytes)?;
                        let mut obj = serde_json::Map::new();
                        obj.insert("value".to_string(), simple_value_to_json(simple));
                        obj.insert("type".to_string(), Value::String(binding.type_tag.clone()));
                        entries.push(Value::Object(obj));
                    }
                }
                if let Some(first) = entries.first_mut() {
                    if let Value::Object(obj) = first {
                        obj.insert("primary".to_string(), Value::Bool(true));
                    }
                }
                if entries.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some((scim_attr.clone(), Value::Array(entries))))
                }
            }
            AttributeMapper::PluralComplex {
                scim_attr,
                canonical_groups,
            } => {
                let mut entries = Vec::new();
                for group in canonical_groups {
                    let present = group
                        .sub_attributes
                        .iter()
                        .any(|s| entry.attribute(&s.ldap_attribute).is_some());
                    if !present {
                        continue;
                    }
                    let mut obj = serde_json::Map::new();
                    for sub in &group.sub_attributes {
                        if let Some(bytes) = entry.attribute(&sub.ldap_attribute).and_then(|a| a.first()) {
                            let simple = sub.transformation.to_scim_value(sub.data_type, bytes)?;
                            obj.insert(sub.sub_attr_name.clone(), simple_value_to_json(simple));
                        }
                    }
                    obj.insert("type".to_string(), Value::String(group.type_tag.clone()));
                    entries.push(Value::Object(obj));
                }
                if let Some(first) = entries.first_mut() {
                    if let Value::Object(obj) = first {
                        obj.insert("primary".to_string(), Value::Bool(true));
                    }
                }
                if entries.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some((scim_attr.clone(), Value::Array(entries))))
                }
            }
        }
    }

    /// `toLDAPFilter(scimFilter) -> ldapFilter`, given the leaf predicate's
    /// operator, optional sub-attribute name, and optional value.
    pub fn to_ldap_filter(
        &self,
        op: CompareOp,
        sub_attr: Option<&str>,
        value: Option<&FilterValue>,
    ) -> LdapFilter {
        match self {
            AttributeMapper::SingularSimple {
                ldap_attribute,
                transformation,
                ..
            } => {
                if sub_attr.is_some() {
                    return LdapFilter::always_false();
                }
                compile_simple_op(op, ldap_attribute, value, *transformation)
            }
            AttributeMapper::SingularComplex { sub_attributes, .. } => {
                let Some(sub_name) = sub_attr else {
                    return LdapFilter::always_false();
                };
                match sub_attributes.iter().find(|s| s.matches(sub_name)) {
                    Some(binding) => {
                        compile_simple_op(op, &binding.ldap_attribute, value, binding.transformation)
                    }
                    None => LdapFilter::always_false(),
                }
            }
            AttributeMapper::PluralSimple {
                transformation,
                type_mappings,
                default_ldap_attribute,
                ..
            } => match sub_attr {
                None => {
                    let filters = plural_simple_filter_attrs(type_mappings, default_ldap_attribute)
                        .map(|attr| compile_simple_op(op, attr, value, *transformation))
                        .collect();
                    LdapFilter::Or(filters)
                }
                Some(s) if s.eq_ignore_ascii_case("value") => {
                    let filters = plural_simple_filter_attrs(type_mappings, default_ldap_attribute)
                        .map(|attr| compile_simple_op(op, attr, value, *transformation))
                        .collect();
                    LdapFilter::Or(filters)
                }
                Some(s) if s.eq_ignore_ascii_case("type") => {
                    if op != CompareOp::Eq {
                        return LdapFilter::always_false();
                    }
                    let text = value.map(FilterValue::as_filter_text).unwrap_or_default();
                    match type_mappings.iter().find(|t| t.type_tag.eq_ignore_ascii_case(&text)) {
                        Some(t) => LdapFilter::Present {
                            attr: t.ldap_attribute.clone(),
                        },
                        None => LdapFilter::always_false(),
                    }
                }
                Some(_) => LdapFilter::always_false(),
            },
            AttributeMapper::PluralComplex { canonical_groups, .. } => match sub_attr {
                Some(s) if s.eq_ignore_ascii_case("type") => {
                    if op != CompareOp::Eq {
                        return LdapFilter::always_false();
                    }
                    let text = value.map(FilterValue::as_filter_text).unwrap_or_default();
                    let filters: Vec<LdapFilter> = canonical_groups
                        .iter()
                        .filter(|g| g.type_tag.eq_ignore_ascii_case(&text))
                        .flat_map(|g| g.sub_attributes.iter())
                        .map(|s| LdapFilter::Present {
                            attr: s.ldap_attribute.clone(),
                        })
                        .collect();
                    LdapFilter::Or(filters)
                }
                Some(sub_name) => {
                    let filters: Vec<LdapFilter> = canonical_groups
                        .iter()
                        .flat_map(|g| g.sub_attributes.iter())
                        .filter(|s| s.matches(sub_name))
                        .map(|s| compile_simple_op(op, &s.ldap_attribute, value, s.transformation))
                        .collect();
                    if filters.is_empty() {
                        LdapFilter::always_false()
                    } else {
                        LdapFilter::Or(filters)
                    }
                }
                None => {
                    let filters: Vec<LdapFilter> = canonical_groups
                        .iter()
                        .flat_map(|g| g.sub_attributes.iter())
                        .map(|s| compile_simple_op(op, &s.ldap_attribute, value, s.transformation))
                        .collect();
                    LdapFilter::Or(filters)
                }
            },
        }
    }

    /// `toLDAPSortKey() -> ldap-attr | null`.
    pub fn to_ldap_sort_key(&self) -> Option<String> {
        match self {
            AttributeMapper::SingularSimple { ldap_attribute, .. } => Some(ldap_attribute.clone()),
            AttributeMapper::SingularComplex { .. } => None,
            AttributeMapper::PluralSimple { type_mappings, .. } => {
                type_mappings.first().map(|t| t.ldap_attribute.clone())
            }
            AttributeMapper::PluralComplex { .. } => None,
        }
    }
}

/// Every LDAP attribute a `PluralSimple` mapper's top-level-value filter
/// must OR across: every declared type mapping, plus the default
/// attribute when one is declared and not already among them — the same
/// set `to_ldap_attributes` can route an untyped value into.
fn plural_simple_filter_attrs<'a>(
    type_mappings: &'a [TypeBinding],
    default_ldap_attribute: &'a Option<String>,
) -> impl Iterator<Item = &'a str> {
    type_mappings.iter().map(|t| t.ldap_attribute.as_str()).chain(
        default_ldap_attribute
            .iter()
            .map(String::as_str)
            .filter(|d| !type_mappings.iter().any(|t| t.ldap_attribute.eq_ignore_ascii_case(d))),
    )
}

/// Dispatch a simple comparison operator to an LDAP filter node. Total:
/// every [`CompareOp`] variant is handled, so this never needs to raise
/// `InternalError`.
fn compile_simple_op(
    op: CompareOp,
    ldap_attribute: &str,
    value: Option<&FilterValue>,
    transformation: Transformation,
) -> LdapFilter {
    if op == CompareOp::Pr {
        return LdapFilter::Present {
            attr: ldap_attribute.to_string(),
        };
    }
    let text = value.map(FilterValue::as_filter_text).unwrap_or_default();
    let filtered = transformation.to_ldap_filter_value(&text).into_bytes();
    match op {
        CompareOp::Eq => LdapFilter::Equality {
            attr: ldap_attribute.to_string(),
            value: filtered,
        },
        CompareOp::Co => LdapFilter::contains(ldap_attribute, filtered),
        CompareOp::Sw => LdapFilter::starts_with(ldap_attribute, filtered),
        CompareOp::Gt | CompareOp::Ge => LdapFilter::GreaterOrEqual {
            attr: ldap_attribute.to_string(),
            value: filtered,
        },
        CompareOp::Lt | CompareOp::Le => LdapFilter::LessOrEqual {
            attr: ldap_attribute.to_string(),
            value: filtered,
        },
        CompareOp::Pr => unreachable!("handled above"),
    }
}

fn json_to_simple_value(value: &Value, data_type: AttributeType) -> Option<SimpleValue> {
    match data_type {
        AttributeType::Boolean => value.as_bool().map(SimpleValue::Bool),
        AttributeType::Integer => value.as_i64().map(SimpleValue::Int),
        AttributeType::String | AttributeType::DateTime | AttributeType::Binary => {
            value.as_str().map(|s| SimpleValue::Str(s.to_string()))
        }
        AttributeType::Complex => None,
    }
}

fn simple_value_to_json(value: SimpleValue) -> Value {
    match value {
        SimpleValue::Str(s) => Value::String(s),
        SimpleValue::Bool(b) => Value::Bool(b),
        SimpleValue::Int(i) => Value::Number(i.into()),
    }
}
