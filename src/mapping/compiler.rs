//! Filter compiler: walks the SCIM filter AST and produces an LDAP
//! filter tree, delegating per-attribute translation to the resource
//! mapping's attribute mappers.

use super::resource::ResourceMapping;
use crate::error::Result;
use crate::filter::Filter;
use crate::ldap::LdapFilter;
use log::debug;

/// Compile a parsed SCIM filter into an LDAP filter against `mapping`.
///
/// Compilation is total: a leaf referencing an attribute with no mapper
/// compiles to the always-false filter rather than raising, so that a
/// broader conjunction can still match.
pub fn compile(mapping: &ResourceMapping, filter: &Filter) -> Result<LdapFilter> {
    Ok(match filter {
        Filter::And(children) => {
            let compiled: Result<Vec<LdapFilter>> =
                children.iter().map(|c| compile(mapping, c)).collect();
            LdapFilter::And(compiled?)
        }
        Filter::Or(children) => {
            let compiled: Result<Vec<LdapFilter>> =
                children.iter().map(|c| compile(mapping, c)).collect();
            LdapFilter::Or(compiled?)
        }
        Filter::Compare { op, attr, value } => match mapping.mapper_for(&attr.attr_name) {
            Some(mapper) => mapper.to_ldap_filter(*op, attr.sub_attr_name.as_deref(), value.as_ref()),
            None => {
                debug!(
                    "filter attribute '{}' has no mapper in resource mapping '{}'; compiling to always-false",
                    attr.attr_name,
                    mapping.resource_name()
                );
                LdapFilter::always_false()
            }
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::attribute::{AttributeMapper, TypeBinding};
    use crate::schema::AttributeType;
    use crate::transform::Transformation;

    fn user_mapping() -> ResourceMapping {
        ResourceMapping::new(
            "User",
            vec!["inetOrgPerson".to_string()],
            "uid={uid},ou=people,dc=example,dc=com",
            vec![
                AttributeMapper::SingularSimple {
                    scim_attr: "userName".to_string(),
                    ldap_attribute: "uid".to_string(),
                    transformation: Transformation::Default,
                    data_type: AttributeType::String,
                },
                AttributeMapper::SingularComplex {
                    scim_attr: "name".to_string(),
                    sub_attributes: vec![crate::mapping::attribute::SubAttributeBinding {
                        sub_attr_name: "familyName".to_string(),
                        ldap_attribute: "sn".to_string(),
                        transformation: Transformation::Default,
                        data_type: AttributeType::String,
                    }],
                },
                AttributeMapper::PluralSimple {
                    scim_attr: "emails".to_string(),
                    value_data_type: AttributeType::String,
                    transformation: Transformation::Default,
                    type_mappings: vec![
                        TypeBinding {
                            type_tag: "work".to_string(),
                            ldap_attribute: "mail".to_string(),
                        },
                        TypeBinding {
                            type_tag: "home".to_string(),
                            ldap_attribute: "homeEmail".to_string(),
                        },
                    ],
                    default_ldap_attribute: None,
                },
            ],
        )
    }

    // userName eq "bjensen" -> (uid=bjensen)
    #[test]
    fn f1_filter_simple() {
        let filter = crate::filter::parse("userName eq 'bjensen'").unwrap();
        let compiled = compile(&user_mapping(), &filter).unwrap();
        assert_eq!(compiled.to_string(), "(uid=bjensen)");
    }

    // F2: (name.familyName sw "Jen" and emails.value co "@x") ->
    // (&(sn=Jen*)(|(mail=*@x*)(homeEmail=*@x*)))
    #[test]
    fn f2_filter_compound() {
        let filter = crate::filter::parse("name.familyName sw 'Jen' and emails.value co '@x'").unwrap();
        let compiled = compile(&user_mapping(), &filter).unwrap();
        assert_eq!(
            compiled.to_string(),
            "(&(sn=Jen*)(|(mail=*@x*)(homeEmail=*@x*)))"
        );
    }

    // F3: emails pr -> (|(mail=*)(homeEmail=*))
    #[test]
    fn f3_filter_presence_on_plural_sub_attr() {
        let filter = crate::filter::parse("emails pr").unwrap();
        let compiled = compile(&user_mapping(), &filter).unwrap();
        assert_eq!(compiled.to_string(), "(|(mail=*)(homeEmail=*))");
    }

    // F4: nonexistent eq "foo" -> (|)
    #[test]
    fn f4_filter_unsupported_attribute_compiles_to_always_false() {
        let filter = crate::filter::parse("nonexistent eq 'foo'").unwrap();
        let compiled = compile(&user_mapping(), &filter).unwrap();
        assert_eq!(compiled.to_string(), "(|)");
    }
}
