//! The compiled LDAP filter AST and its RFC 4515 string form.
//!
//! This is the *target* of filter compilation, distinct from
//! [`crate::filter::ast::Filter`], which is the *source* SCIM filter
//! AST the parser produces. Keeping them as separate types means the
//! compiler is the only place that needs to know both.

use std::fmt;

/// A compiled LDAP search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LdapFilter {
    /// `(&(...)(...))`. An empty list is always true.
    And(Vec<LdapFilter>),
    /// `(|(...)(...))`. An empty list is always false.
    Or(Vec<LdapFilter>),
    /// `(!(...))`.
    Not(Box<LdapFilter>),
    /// `(attr=value)`.
    Equality { attr: String, value: Vec<u8> },
    /// `(attr=*value*)`, with optional leading/trailing fixed parts.
    Substring {
        attr: String,
        initial: Option<Vec<u8>>,
        any: Vec<Vec<u8>>,
        final_: Option<Vec<u8>>,
    },
    /// `(attr=*)`.
    Present { attr: String },
    /// `(attr>=value)`.
    GreaterOrEqual { attr: String, value: Vec<u8> },
    /// `(attr<=value)`.
    LessOrEqual { attr: String, value: Vec<u8> },
}

impl LdapFilter {
    /// The empty OR: matches nothing. Used for unmapped attributes and
    /// unsatisfiable sub-attribute filters.
    pub fn always_false() -> Self {
        LdapFilter::Or(Vec::new())
    }

    /// The empty AND: matches everything.
    pub fn always_true() -> Self {
        LdapFilter::And(Vec::new())
    }

    /// Build a substring filter with only a `contains` component.
    pub fn contains(attr: impl Into<String>, substr: Vec<u8>) -> Self {
        LdapFilter::Substring {
            attr: attr.into(),
            initial: None,
            any: vec![substr],
            final_: None,
        }
    }

    /// Build a substring filter with only a `startsWith` component.
    pub fn starts_with(attr: impl Into<String>, prefix: Vec<u8>) -> Self {
        LdapFilter::Substring {
            attr: attr.into(),
            initial: Some(prefix),
            any: Vec::new(),
            final_: None,
        }
    }

    /// Build a substring filter with only an `endsWith` component.
    pub fn ends_with(attr: impl Into<String>, suffix: Vec<u8>) -> Self {
        LdapFilter::Substring {
            attr: attr.into(),
            initial: None,
            any: Vec::new(),
            final_: Some(suffix),
        }
    }
}

/// Escape an octet string per RFC 4515: `*`, `(`, `)`, `\`, and NUL
/// become `\XX` hex escapes; all other bytes pass through unchanged.
fn escape_filter_value(value: &[u8]) -> String {
    let mut out = String::with_capacity(value.len());
    for &b in value {
        match b {
            b'*' | b'(' | b')' | b'\\' | 0 => out.push_str(&format!("\\{b:02x}")),
            _ => out.push(b as char),
        }
    }
    out
}

impl fmt::Display for LdapFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LdapFilter::And(parts) => {
                if parts.is_empty() {
                    return write!(f, "(&)");
                }
                write!(f, "(&")?;
                for p in parts {
                    write!(f, "{p}")?;
                }
                write!(f, ")")
            }
            LdapFilter::Or(parts) => {
                if parts.is_empty() {
                    return write!(f, "(|)");
                }
                write!(f, "(|")?;
                for p in parts {
                    write!(f, "{p}")?;
                }
                write!(f, ")")
            }
            LdapFilter::Not(inner) => write!(f, "(!{inner})"),
            LdapFilter::Equality { attr, value } => {
                write!(f, "({attr}={})", escape_filter_value(value))
            }
            LdapFilter::Substring {
                attr,
                initial,
                any,
                final_,
            } => {
                write!(f, "({attr}=")?;
                if let Some(i) = initial {
                    write!(f, "{}", escape_filter_value(i))?;
                }
                write!(f, "*")?;
                for a in any {
                    write!(f, "{}*", escape_filter_value(a))?;
                }
                if let Some(fi) = final_ {
                    write!(f, "{}", escape_filter_value(fi))?;
                }
                write!(f, ")")
            }
            LdapFilter::Present { attr } => write!(f, "({attr}=*)"),
            LdapFilter::GreaterOrEqual { attr, value } => {
                write!(f, "({attr}>={})", escape_filter_value(value))
            }
            LdapFilter::LessOrEqual { attr, value } => {
                write!(f, "({attr}<={})", escape_filter_value(value))
            }
        }
    }
}
