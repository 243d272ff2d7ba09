//! Value transformations: pure functions between SCIM simple values and
//! LDAP octet strings.
//!
//! Implemented as a closed, tagged enum with one dispatching `impl`
//! block rather than a trait-object hierarchy, since the set of
//! transformations is closed.

use crate::error::{GatewayError, Result};
use crate::schema::AttributeType;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, SecondsFormat, Utc};

/// A SCIM simple value, as passed to and returned from a transformation.
///
/// Complex and multi-valued attributes never reach a transformation
/// directly — the attribute mappers in [`crate::mapping::attribute`]
/// decompose them into simple values first.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleValue {
    /// A string, date-time, or base64-encoded binary value.
    Str(String),
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
}

impl SimpleValue {
    /// Render as the string this value would carry on either side of a
    /// transformation that treats it as opaque text.
    fn as_text(&self) -> String {
        match self {
            SimpleValue::Str(s) => s.clone(),
            SimpleValue::Bool(b) => b.to_string(),
            SimpleValue::Int(i) => i.to_string(),
        }
    }
}

/// One of the four transformations a mapper may apply to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transformation {
    /// Identity on strings/booleans/integers; base64 <-> raw bytes for
    /// binary attributes.
    Default,
    /// ISO-8601 millisecond-precision datetime <-> LDAP generalized time.
    GeneralizedTime,
    /// SCIM formatted address (newline-separated) <-> RFC 4517 postal
    /// address (`$`-separated, with `\`/`$` escaped).
    PostalAddress,
    /// Identity, except filter values are canonicalized by stripping
    /// spaces and dashes.
    TelephoneNumber,
}

impl Transformation {
    fn name(&self) -> &'static str {
        match self {
            Transformation::Default => "default",
            Transformation::GeneralizedTime => "generalizedTime",
            Transformation::PostalAddress => "postalAddress",
            Transformation::TelephoneNumber => "telephoneNumber",
        }
    }

    fn check_supported(&self, data_type: AttributeType) -> Result<()> {
        let supported = match self {
            Transformation::Default => matches!(
                data_type,
                AttributeType::String
                    | AttributeType::Boolean
                    | AttributeType::Integer
                    | AttributeType::Binary
            ),
            Transformation::GeneralizedTime => data_type == AttributeType::DateTime,
            Transformation::PostalAddress => data_type == AttributeType::String,
            Transformation::TelephoneNumber => data_type == AttributeType::String,
        };
        if supported {
            Ok(())
        } else {
            Err(GatewayError::unsupported_conversion(
                self.name(),
                data_type.as_str(),
            ))
        }
    }

    /// `toLDAPValue(descriptor, SimpleValue) -> octetString`.
    pub fn to_ldap_value(&self, data_type: AttributeType, value: &SimpleValue) -> Result<Vec<u8>> {
        self.check_supported(data_type)?;
        match self {
            Transformation::Default => {
                if data_type == AttributeType::Binary {
                    let SimpleValue::Str(b64) = value else {
                        return Err(GatewayError::unsupported_conversion(
                            self.name(),
                            "non-string binary value",
                        ));
                    };
                    BASE64.decode(b64).map_err(|e| {
                        GatewayError::unsupported_conversion(self.name(), format!("base64: {e}"))
                    })
                } else {
                    Ok(value.as_text().into_bytes())
                }
            }
            Transformation::GeneralizedTime => {
                let SimpleValue::Str(scim) = value else {
                    return Err(GatewayError::unsupported_conversion(
                        self.name(),
                        "non-string datetime value",
                    ));
                };
                Ok(scim_datetime_to_generalized_time(scim)?.into_bytes())
            }
            Transformation::PostalAddress => Ok(postal_address_to_ldap(&value.as_text()).into_bytes()),
            Transformation::TelephoneNumber => Ok(value.as_text().into_bytes()),
        }
    }

    /// `toSCIMValue(descriptor, octetString) -> SimpleValue`.
    pub fn to_scim_value(&self, data_type: AttributeType, octets: &[u8]) -> Result<SimpleValue> {
        self.check_supported(data_type)?;
        let text = || {
            String::from_utf8(octets.to_vec())
                .map_err(|e| GatewayError::unsupported_conversion(self.name(), format!("utf8: {e}")))
        };
        match self {
            Transformation::Default => match data_type {
                AttributeType::Binary => Ok(SimpleValue::Str(BASE64.encode(octets))),
                AttributeType::Boolean => {
                    let t = text()?;
                    Ok(SimpleValue::Bool(t.eq_ignore_ascii_case("true") || t == "1"))
                }
                AttributeType::Integer => {
                    let t = text()?;
                    t.parse::<i64>()
                        .map(SimpleValue::Int)
                        .map_err(|e| GatewayError::unsupported_conversion(self.name(), format!("integer: {e}")))
                }
                _ => Ok(SimpleValue::Str(text()?)),
            },
            Transformation::GeneralizedTime => {
                Ok(SimpleValue::Str(generalized_time_to_scim_datetime(&text()?)?))
            }
            Transformation::PostalAddress => Ok(SimpleValue::Str(postal_address_to_scim(&text()?))),
            Transformation::TelephoneNumber => Ok(SimpleValue::Str(text()?)),
        }
    }

    /// `toLDAPFilterValue(string) -> string`, used by filter compilation.
    pub fn to_ldap_filter_value(&self, value: &str) -> String {
        match self {
            Transformation::TelephoneNumber => {
                value.chars().filter(|c| *c != ' ' && *c != '-').collect()
            }
            _ => value.to_string(),
        }
    }
}

/// `YYYYMMDDHHMMSS.sssZ`, RFC 4517's generalized-time syntax.
fn scim_datetime_to_generalized_time(scim: &str) -> Result<String> {
    let dt: DateTime<Utc> = DateTime::parse_from_rfc3339(scim)
        .map_err(|e| GatewayError::unsupported_conversion("generalizedTime", format!("datetime: {e}")))?
        .with_timezone(&Utc);
    Ok(format!(
        "{}{:03}Z",
        dt.format("%Y%m%d%H%M%S."),
        dt.timestamp_subsec_millis()
    ))
}

fn generalized_time_to_scim_datetime(ldap: &str) -> Result<String> {
    let bad = || GatewayError::unsupported_conversion("generalizedTime", format!("LDAP generalized time: {ldap}"));

    let body = ldap.strip_suffix('Z').ok_or_else(bad)?;
    let (digits, millis) = match body.split_once('.') {
        Some((d, m)) => (d, m),
        None => (body, "0"),
    };
    if digits.len() != 14 {
        return Err(bad());
    }
    let year: i32 = digits[0..4].parse().map_err(|_| bad())?;
    let month: u32 = digits[4..6].parse().map_err(|_| bad())?;
    let day: u32 = digits[6..8].parse().map_err(|_| bad())?;
    let hour: u32 = digits[8..10].parse().map_err(|_| bad())?;
    let minute: u32 = digits[10..12].parse().map_err(|_| bad())?;
    let second: u32 = digits[12..14].parse().map_err(|_| bad())?;
    let millis: u32 = format!("{millis:0<3}")[0..3].parse().map_err(|_| bad())?;

    let naive = chrono::NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_milli_opt(hour, minute, second, millis))
        .ok_or_else(bad)?;
    let dt = DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc);
    Ok(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// RFC 4517: `\` -> `\5C`, `$` -> `\24`, then line breaks -> `$`.
fn postal_address_to_ldap(scim: &str) -> String {
    let mut escaped = String::with_capacity(scim.len());
    for c in scim.chars() {
        match c {
            '\\' => escaped.push_str("\\5C"),
            '$' => escaped.push_str("\\24"),
            other => escaped.push(other),
        }
    }
    escaped.replace('\n', "$")
}

/// Inverse of [`postal_address_to_ldap`]. Unknown `\xx` sequences pass
/// through unchanged rather than erroring, per §4.B.
fn postal_address_to_scim(ldap: &str) -> String {
    let chars: Vec<char> = ldap.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '$' => {
                out.push('\n');
                i += 1;
            }
            '\\' if i + 2 < chars.len() => {
                let hex: String = chars[i + 1..i + 3].iter().collect();
                match hex.to_ascii_uppercase().as_str() {
                    "5C" => {
                        out.push('\\');
                        i += 3;
                    }
                    "24" => {
                        out.push('$');
                        i += 3;
                    }
                    _ => {
                        out.push('\\');
                        i += 1;
                    }
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    out
}
