//! End-to-end scenarios: U1-U3 exercise the resource mapper, F1-F4
//! exercise the filter compiler, all driven through a single
//! hand-assembled `User` resource mapping.

use scim_ldap_gateway::filter;
use scim_ldap_gateway::mapping::attribute::{
    AttributeMapper, CanonicalGroup, SubAttributeBinding, TypeBinding,
};
use scim_ldap_gateway::mapping::{self, ResourceMapping};
use scim_ldap_gateway::resource::Resource;
use scim_ldap_gateway::schema::AttributeType;
use scim_ldap_gateway::transform::Transformation;
use serde_json::json;
use std::collections::HashSet;

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
                sub_attributes: vec![
                    SubAttributeBinding {
                        sub_attr_name: "familyName".to_string(),
                        ldap_attribute: "sn".to_string(),
                        transformation: Transformation::Default,
                        data_type: AttributeType::String,
                    },
                    SubAttributeBinding {
                        sub_attr_name: "givenName".to_string(),
                        ldap_attribute: "givenName".to_string(),
                        transformation: Transformation::Default,
                        data_type: AttributeType::String,
                    },
                ],
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
            AttributeMapper::PluralComplex {
                scim_attr: "addresses".to_string(),
                canonical_groups: vec![CanonicalGroup {
                    type_tag: "work".to_string(),
                    sub_attributes: vec![SubAttributeBinding {
                        sub_attr_name: "formatted".to_string(),
                        ldap_attribute: "postalAddress".to_string(),
                        transformation: Transformation::PostalAddress,
                        data_type: AttributeType::String,
                    }],
                }],
            },
        ],
    )
}

// U1: simple user.
#[test]
fn u1_simple_user_round_trips() {
    let mapping = user_mapping();
    let resource = Resource::new(
        "User",
        json!({"userName": "bjensen", "name": {"familyName": "Jensen", "givenName": "Barbara"}}),
    );

    let entry = mapping.to_ldap_attributes(&resource).unwrap();
    assert_eq!(entry.attribute("uid").unwrap().first().unwrap(), b"bjensen");
    assert_eq!(entry.attribute("sn").unwrap().first().unwrap(), b"Jensen");
    assert_eq!(entry.attribute("givenName").unwrap().first().unwrap(), b"Barbara");

    let back = mapping.to_scim_attributes(&entry, &HashSet::new()).unwrap();
    assert_eq!(back.get("userName").unwrap(), "bjensen");
    assert_eq!(
        back.get("name").unwrap(),
        &json!({"familyName": "Jensen", "givenName": "Barbara"})
    );
}

// U2: plural emails, with primary landing on the declared-first tag.
#[test]
fn u2_plural_emails_round_trip_with_primary_on_first_declared_tag() {
    let mapping = user_mapping();
    let resource = Resource::new(
        "User",
        json!({"emails": [
            {"value": "a@x", "type": "work", "primary": true},
            {"value": "b@y", "type": "home"}
        ]}),
    );

    let entry = mapping.to_ldap_attributes(&resource).unwrap();
    assert_eq!(entry.attribute("mail").unwrap().first().unwrap(), b"a@x");
    assert_eq!(entry.attribute("homeEmail").unwrap().first().unwrap(), b"b@y");

    let back = mapping.to_scim_attributes(&entry, &HashSet::new()).unwrap();
    assert_eq!(
        back.get("emails").unwrap(),
        &json!([
            {"value": "a@x", "type": "work", "primary": true},
            {"value": "b@y", "type": "home"}
        ])
    );
}

// U3: postal address, round-tripping the newline/`$` separator.
#[test]
fn u3_postal_address_round_trips_through_dollar_separator() {
    let mapping = user_mapping();
    let resource = Resource::new(
        "User",
        json!({"addresses": [{"formatted": "100 Main St\nCity, ST 00000", "type": "work"}]}),
    );

    let entry = mapping.to_ldap_attributes(&resource).unwrap();
    assert_eq!(
        entry.attribute("postalAddress").unwrap().first().unwrap(),
        b"100 Main St$City, ST 00000"
    );

    let back = mapping.to_scim_attributes(&entry, &HashSet::new()).unwrap();
    assert_eq!(
        back.get("addresses").unwrap(),
        &json!([{"formatted": "100 Main St\nCity, ST 00000", "type": "work", "primary": true}])
    );
}

// F1: simple filter.
#[test]
fn f1_filter_simple() {
    let mapping = user_mapping();
    let filter = filter::parse("userName eq 'bjensen'").unwrap();
    let compiled = mapping::compiler::compile(&mapping, &filter).unwrap();
    assert_eq!(compiled.to_string(), "(uid=bjensen)");
}

// F2: compound filter.
#[test]
fn f2_filter_compound() {
    let mapping = user_mapping();
    let filter = filter::parse("name.familyName sw 'Jen' and emails.value co '@x'").unwrap();
    let compiled = mapping::compiler::compile(&mapping, &filter).unwrap();
    assert_eq!(
        compiled.to_string(),
        "(&(sn=Jen*)(|(mail=*@x*)(homeEmail=*@x*)))"
    );
}

// F3: presence on a plural sub-attribute.
#[test]
fn f3_filter_presence_on_plural_sub_attr() {
    let mapping = user_mapping();
    let filter = filter::parse("emails pr").unwrap();
    let compiled = mapping::compiler::compile(&mapping, &filter).unwrap();
    assert_eq!(compiled.to_string(), "(|(mail=*)(homeEmail=*))");
}

// F4: unsupported/unmapped attribute compiles to always-false.
#[test]
fn f4_filter_unsupported_attribute() {
    let mapping = user_mapping();
    let filter = filter::parse("nonexistent eq 'foo'").unwrap();
    let compiled = mapping::compiler::compile(&mapping, &filter).unwrap();
    assert_eq!(compiled.to_string(), "(|)");
}
