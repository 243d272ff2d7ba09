//! Property tests for the mapping and filter round-trip invariants.

use proptest::prelude::*;
use scim_ldap_gateway::filter::ast::{AttributePath, CompareOp, Filter, FilterValue};
use scim_ldap_gateway::filter::parse;
use scim_ldap_gateway::mapping::attribute::AttributeMapper;
use scim_ldap_gateway::resource::Resource;
use scim_ldap_gateway::schema::AttributeType;
use scim_ldap_gateway::transform::{SimpleValue, Transformation};
use serde_json::json;

fn ascii_no_control() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,24}"
}

proptest! {
    // Invariant 5: toLDAP(toSCIM(toLDAP(v))) == toLDAP(toSCIM(v)).
    #[test]
    fn transformation_idempotence(s in ascii_no_control()) {
        let t = Transformation::Default;
        let v = SimpleValue::Str(s);
        let ldap1 = t.to_ldap_value(AttributeType::String, &v).unwrap();
        let scim1 = t.to_scim_value(AttributeType::String, &ldap1).unwrap();
        let ldap2 = t.to_ldap_value(AttributeType::String, &scim1).unwrap();
        let scim2 = t.to_scim_value(AttributeType::String, &ldap2).unwrap();
        let ldap3 = t.to_ldap_value(AttributeType::String, &scim2).unwrap();
        prop_assert_eq!(ldap2, ldap3);
    }

    // Invariant 6: every `$`/`\` in the SCIM string appears escaped in the
    // LDAP string, and decoding recovers the original.
    #[test]
    fn postal_address_escaping_round_trips(s in "[a-zA-Z0-9 $\\\\\n]{0,40}") {
        let t = Transformation::PostalAddress;
        let v = SimpleValue::Str(s.clone());
        let ldap = t.to_ldap_value(AttributeType::String, &v).unwrap();
        let ldap_str = String::from_utf8(ldap.clone()).unwrap();
        prop_assert!(!ldap_str.contains('\n'));
        let back = t.to_scim_value(AttributeType::String, &ldap).unwrap();
        prop_assert_eq!(back, SimpleValue::Str(s));
    }

    // Invariant 1 (restricted to a singular-simple mapper, the case this
    // core actually guarantees round-trip for): toSCIMAttributes(
    // toLDAPAttributes(r)) == r for the mapped attribute.
    #[test]
    fn singular_simple_attribute_round_trip(s in ascii_no_control()) {
        prop_assume!(!s.is_empty());
        let mapper = AttributeMapper::SingularSimple {
            scim_attr: "userName".to_string(),
            ldap_attribute: "uid".to_string(),
            transformation: Transformation::Default,
            data_type: AttributeType::String,
        };
        let resource = Resource::new("User", json!({"userName": s.clone()}));
        let mut entry = scim_ldap_gateway::ldap::Entry::new("dc=example,dc=com");
        mapper.to_ldap_attributes(&resource, &mut entry).unwrap();
        let (name, value) = mapper.to_scim_attribute(&entry).unwrap().unwrap();
        prop_assert_eq!(name, "userName");
        prop_assert_eq!(value, json!(s));
    }

    // Invariant 3: parse(pretty(parse(s))) == parse(s), for a generated
    // subset of the grammar (predicates combined with and/or, optionally
    // carrying a sub-attribute path).
    #[test]
    fn filter_parser_round_trip(filter in arb_filter()) {
        let rendered = filter.pretty();
        let reparsed = parse(&rendered).unwrap();
        let rerendered = reparsed.pretty();
        let reparsed_again = parse(&rerendered).unwrap();
        prop_assert_eq!(reparsed, reparsed_again);
    }
}

fn arb_attr_name() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z0-9]{0,9}"
}

fn arb_compare_op() -> impl Strategy<Value = CompareOp> {
    prop_oneof![
        Just(CompareOp::Eq),
        Just(CompareOp::Co),
        Just(CompareOp::Sw),
        Just(CompareOp::Pr),
        Just(CompareOp::Gt),
        Just(CompareOp::Ge),
        Just(CompareOp::Lt),
        Just(CompareOp::Le),
    ]
}

fn arb_predicate() -> impl Strategy<Value = Filter> {
    (
        arb_attr_name(),
        proptest::option::of(arb_attr_name()),
        arb_compare_op(),
        "[a-zA-Z0-9]{1,8}",
    )
        .prop_map(|(attr_name, sub_attr_name, op, literal)| {
            let value = if op == CompareOp::Pr {
                None
            } else {
                Some(FilterValue::Str(literal))
            };
            Filter::Compare {
                op,
                attr: AttributePath {
                    schema_uri: None,
                    attr_name,
                    sub_attr_name,
                },
                value,
            }
        })
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    let leaf = arb_predicate();
    leaf.prop_recursive(3, 16, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 2..4).prop_map(Filter::And),
            proptest::collection::vec(inner, 2..4).prop_map(Filter::Or),
        ]
    })
}
