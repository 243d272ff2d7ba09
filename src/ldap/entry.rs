//! The LDAP flat-entry data model: a distinguished name plus an
//! ordered, case-insensitively-keyed collection of attributes, each an
//! ordered list of octet-string values.

use std::collections::HashMap;

/// A single LDAP attribute: a type name plus its ordered values.
///
/// Values are octet strings (`Vec<u8>`), not `String` — LDAP attribute
/// syntaxes include binary data, and the value transformations in
/// [`crate::transform`] are the only place that interprets the bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute's type name, e.g. `cn` or `mail`.
    pub name: String,
    /// The attribute's values, in the order they were added.
    pub values: Vec<Vec<u8>>,
}

impl Attribute {
    /// A new attribute with a single value.
    pub fn single(name: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            values: vec![value],
        }
    }

    /// A new attribute with no values, ready for values to be pushed.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
        }
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&[u8]> {
        self.values.first().map(Vec::as_slice)
    }
}

/// An LDAP entry: a distinguished name plus its attributes.
///
/// Attribute lookups are case-insensitive on the attribute name, per
/// RFC 4512's description of attribute type names, but insertion order
/// is preserved for round-tripping and for deterministic output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// The entry's distinguished name.
    pub dn: String,
    /// Attributes, in insertion order.
    attributes: Vec<Attribute>,
    /// Maps a lowercased attribute name to its index in `attributes`.
    index: HashMap<String, usize>,
}

impl Entry {
    /// A new entry with the given DN and no attributes.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Look up an attribute by case-insensitive name.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.attributes[i])
    }

    /// Append a value to an attribute, creating it if it does not yet
    /// exist (preserving the name's first-seen casing).
    pub fn add_value(&mut self, name: &str, value: Vec<u8>) {
        let key = name.to_ascii_lowercase();
        if let Some(&i) = self.index.get(&key) {
            self.attributes[i].values.push(value);
        } else {
            self.index.insert(key, self.attributes.len());
            self.attributes.push(Attribute::single(name, value));
        }
    }

    /// Replace an attribute's values wholesale, creating it if absent.
    pub fn set_values(&mut self, name: &str, values: Vec<Vec<u8>>) {
        let key = name.to_ascii_lowercase();
        if let Some(&i) = self.index.get(&key) {
            self.attributes[i].values = values;
        } else {
            self.index.insert(key, self.attributes.len());
            self.attributes.push(Attribute {
                name: name.to_string(),
                values,
            });
        }
    }

    /// All attributes, in insertion order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}
