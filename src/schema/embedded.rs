//! Embedded core SCIM schemas, so a registry can be built without
//! reading any external schema files. Trimmed to the attributes the
//! mapping core actually binds mappings against.

use super::types::Schema;
use crate::error::{GatewayError, Result};

/// The core `User` schema (RFC 7643 §4.1), parsed from its embedded JSON.
pub fn core_user_schema() -> Result<Schema> {
    parse(USER_SCHEMA_JSON)
}

/// The core `Group` schema (RFC 7643 §4.2), parsed from its embedded JSON.
pub fn core_group_schema() -> Result<Schema> {
    parse(GROUP_SCHEMA_JSON)
}

fn parse(json: &str) -> Result<Schema> {
    serde_json::from_str(json)
        .map_err(|e| GatewayError::config(format!("embedded schema failed to parse: {e}")))
}

const USER_SCHEMA_JSON: &str = r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:User",
  "name": "User",
  "description": "User Account",
  "attributes": [
    { "name": "id", "type": "string", "multiValued": false, "caseExact": true },
    { "name": "userName", "type": "string", "multiValued": false, "required": true },
    { "name": "externalId", "type": "string", "multiValued": false, "caseExact": true },
    { "name": "displayName", "type": "string", "multiValued": false },
    { "name": "nickName", "type": "string", "multiValued": false },
    { "name": "title", "type": "string", "multiValued": false },
    { "name": "userType", "type": "string", "multiValued": false },
    { "name": "preferredLanguage", "type": "string", "multiValued": false },
    { "name": "locale", "type": "string", "multiValued": false },
    { "name": "timezone", "type": "string", "multiValued": false },
    { "name": "active", "type": "boolean", "multiValued": false },
    {
      "name": "name",
      "type": "complex",
      "multiValued": false,
      "subAttributes": [
        { "name": "formatted", "type": "string", "multiValued": false },
        { "name": "familyName", "type": "string", "multiValued": false },
        { "name": "givenName", "type": "string", "multiValued": false },
        { "name": "middleName", "type": "string", "multiValued": false },
        { "name": "honorificPrefix", "type": "string", "multiValued": false },
        { "name": "honorificSuffix", "type": "string", "multiValued": false }
      ]
    },
    {
      "name": "emails",
      "type": "complex",
      "multiValued": true,
      "canonicalValues": ["work", "home", "other"],
      "subAttributes": [
        { "name": "value", "type": "string", "multiValued": false, "required": true },
        { "name": "type", "type": "string", "multiValued": false, "canonicalValues": ["work", "home", "other"] },
        { "name": "primary", "type": "boolean", "multiValued": false },
        { "name": "display", "type": "string", "multiValued": false }
      ]
    },
    {
      "name": "phoneNumbers",
      "type": "complex",
      "multiValued": true,
      "canonicalValues": ["work", "home", "mobile", "fax", "pager", "other"],
      "subAttributes": [
        { "name": "value", "type": "string", "multiValued": false, "required": true },
        { "name": "type", "type": "string", "multiValued": false, "canonicalValues": ["work", "home", "mobile", "fax", "pager", "other"] },
        { "name": "primary", "type": "boolean", "multiValued": false },
        { "name": "display", "type": "string", "multiValued": false }
      ]
    },
    {
      "name": "addresses",
      "type": "complex",
      "multiValued": true,
      "canonicalValues": ["work", "home", "other"],
      "subAttributes": [
        { "name": "formatted", "type": "string", "multiValued": false },
        { "name": "streetAddress", "type": "string", "multiValued": false },
        { "name": "locality", "type": "string", "multiValued": false },
        { "name": "region", "type": "string", "multiValued": false },
        { "name": "postalCode", "type": "string", "multiValued": false },
        { "name": "country", "type": "string", "multiValued": false },
        { "name": "type", "type": "string", "multiValued": false, "canonicalValues": ["work", "home", "other"] },
        { "name": "primary", "type": "boolean", "multiValued": false }
      ]
    },
    {
      "name": "meta",
      "type": "complex",
      "multiValued": false,
      "subAttributes": [
        { "name": "resourceType", "type": "string", "multiValued": false, "caseExact": true },
        { "name": "created", "type": "dateTime", "multiValued": false },
        { "name": "lastModified", "type": "dateTime", "multiValued": false },
        { "name": "location", "type": "string", "multiValued": false },
        { "name": "version", "type": "string", "multiValued": false, "caseExact": true }
      ]
    }
  ]
}"#;

const GROUP_SCHEMA_JSON: &str = r#"{
  "id": "urn:ietf:params:scim:schemas:core:2.0:Group",
  "name": "Group",
  "description": "Group",
  "attributes": [
    { "name": "id", "type": "string", "multiValued": false, "caseExact": true },
    { "name": "externalId", "type": "string", "multiValued": false },
    { "name": "displayName", "type": "string", "multiValued": false },
    {
      "name": "meta",
      "type": "complex",
      "multiValued": false,
      "subAttributes": [
        { "name": "resourceType", "type": "string", "multiValued": false },
        { "name": "created", "type": "dateTime", "multiValued": false },
        { "name": "lastModified", "type": "dateTime", "multiValued": false },
        { "name": "location", "type": "string", "multiValued": false },
        { "name": "version", "type": "string", "multiValued": false }
      ]
    },
    {
      "name": "members",
      "type": "complex",
      "multiValued": true,
      "canonicalValues": ["User", "Group"],
      "subAttributes": [
        { "name": "value", "type": "string", "multiValued": false },
        { "name": "$ref", "type": "string", "multiValued": false },
        { "name": "type", "type": "string", "multiValued": false, "canonicalValues": ["User", "Group"] },
        { "name": "display", "type": "string", "multiValued": false }
      ]
    }
  ]
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_schema_parses_with_expected_id() {
        let schema = core_user_schema().unwrap();
        assert_eq!(schema.id, "urn:ietf:params:scim:schemas:core:2.0:User");
        assert_eq!(schema.name, "User");
        assert!(schema.attributes.iter().any(|a| a.name == "emails"));
    }

    #[test]
    fn group_schema_parses_with_expected_id() {
        let schema = core_group_schema().unwrap();
        assert_eq!(schema.id, "urn:ietf:params:scim:schemas:core:2.0:Group");
        let members = schema
            .attributes
            .iter()
            .find(|a| a.name == "members")
            .unwrap();
        assert_eq!(members.canonical_values, vec!["User", "Group"]);
    }
}
