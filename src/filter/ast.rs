//! The SCIM filter AST: immutable once parsed.

/// A path to an attribute or sub-attribute, optionally schema-qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributePath {
    /// Schema URI prefix, when the filter qualified the attribute with one.
    pub schema_uri: Option<String>,
    /// Top-level attribute name.
    pub attr_name: String,
    /// Sub-attribute name, for paths like `name.familyName`.
    pub sub_attr_name: Option<String>,
}

impl AttributePath {
    /// A bare, unqualified top-level attribute path.
    pub fn simple(attr_name: impl Into<String>) -> Self {
        Self {
            schema_uri: None,
            attr_name: attr_name.into(),
            sub_attr_name: None,
        }
    }
}

/// A comparison operator recognized by the filter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Co,
    Sw,
    Pr,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// The lowercase keyword this operator parses from and prints as.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Co => "co",
            CompareOp::Sw => "sw",
            CompareOp::Pr => "pr",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
        }
    }

    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "eq" => Some(CompareOp::Eq),
            "co" => Some(CompareOp::Co),
            "sw" => Some(CompareOp::Sw),
            "pr" => Some(CompareOp::Pr),
            "gt" => Some(CompareOp::Gt),
            "ge" => Some(CompareOp::Ge),
            "lt" => Some(CompareOp::Lt),
            "le" => Some(CompareOp::Le),
            _ => None,
        }
    }

    pub(crate) fn parse_keyword(keyword: &str) -> Option<Self> {
        Self::from_keyword(keyword)
    }
}

/// A literal filter value: a quoted string, `true`/`false`, or an integer.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Str(String),
    Bool(bool),
    Int(i64),
}

impl FilterValue {
    /// The literal text a filter value compiles from, before
    /// [`crate::transform::Transformation::to_ldap_filter_value`] is applied.
    pub fn as_filter_text(&self) -> String {
        match self {
            FilterValue::Str(s) => s.clone(),
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Int(i) => i.to_string(),
        }
    }
}

/// The SCIM filter AST, as produced by [`crate::filter::parser::parse`].
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    And(Vec<Filter>),
    Or(Vec<Filter>),
    Compare {
        op: CompareOp,
        attr: AttributePath,
        /// Absent only for `Pr` (presence has no comparison value).
        value: Option<FilterValue>,
    },
}

impl Filter {
    /// Render back to the filter grammar, such that re-parsing the
    /// output yields an equal AST.
    pub fn pretty(&self) -> String {
        match self {
            Filter::And(children) => join_logical(children, "and"),
            Filter::Or(children) => join_logical(children, "or"),
            Filter::Compare { op, attr, value } => {
                let path = pretty_path(attr);
                match value {
                    None => format!("{path} {}", op.as_str()),
                    Some(FilterValue::Str(s)) => {
                        format!("{path} {} {}", op.as_str(), pretty_quoted(s))
                    }
                    Some(FilterValue::Bool(b)) => format!("{path} {} {b}", op.as_str()),
                    Some(FilterValue::Int(i)) => format!("{path} {} {i}", op.as_str()),
                }
            }
        }
    }
}

fn join_logical(children: &[Filter], keyword: &str) -> String {
    children
        .iter()
        .map(|c| match c {
            Filter::And(_) | Filter::Or(_) => format!("({})", c.pretty()),
            Filter::Compare { .. } => c.pretty(),
        })
        .collect::<Vec<_>>()
        .join(&format!(" {keyword} "))
}

fn pretty_path(attr: &AttributePath) -> String {
    let mut s = String::new();
    if let Some(uri) = &attr.schema_uri {
        s.push_str(uri);
        s.push(':');
    }
    s.push_str(&attr.attr_name);
    if let Some(sub) = &attr.sub_attr_name {
        s.push('.');
        s.push_str(sub);
    }
    s
}

fn pretty_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('\'');
    out
}
