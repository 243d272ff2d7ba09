//! Error types for the SCIM↔LDAP mapping and filter-compilation core.
//!
//! The taxonomy is small and closed by design: the parser raises
//! `InvalidFilter`, transformations raise `UnsupportedConversion`,
//! configuration loading raises `Config`, and anything else that should be
//! unreachable raises `Internal`. Unknown attributes are never an error —
//! on write they are silently dropped, on filter compilation they compile
//! to an always-false filter. Both are logged at `debug!`/`warn!` instead.

/// The single error type threaded through schema lookup, value
/// transformation, attribute/resource mapping, and filter parsing.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The filter parser could not make sense of the input.
    #[error("invalid filter at position {position}: {message}")]
    InvalidFilter {
        /// Byte offset into the filter string where parsing failed.
        position: usize,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A transformation was asked to convert a value whose SCIM data type
    /// it does not support.
    #[error("transformation '{transformation}' does not support data type '{data_type}'")]
    UnsupportedConversion {
        /// Name of the transformation that rejected the value.
        transformation: &'static str,
        /// The SCIM data type that was rejected.
        data_type: String,
    },

    /// Mapping configuration failed to load.
    #[error("invalid mapping configuration{}: {message}", line.map(|l| format!(" (line {l})")).unwrap_or_default())]
    Config {
        /// Line number in the source document, when known.
        line: Option<usize>,
        /// Human-readable description of the problem.
        message: String,
    },

    /// A condition the implementation believes cannot occur. Surfacing
    /// this to a caller indicates a bug in this crate, not bad input.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Build an [`GatewayError::InvalidFilter`].
    pub fn invalid_filter(position: usize, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            position,
            message: message.into(),
        }
    }

    /// Build an [`GatewayError::UnsupportedConversion`].
    pub fn unsupported_conversion(
        transformation: &'static str,
        data_type: impl Into<String>,
    ) -> Self {
        Self::UnsupportedConversion {
            transformation,
            data_type: data_type.into(),
        }
    }

    /// Build a [`GatewayError::Config`] with no line information.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            line: None,
            message: message.into(),
        }
    }

    /// Build a [`GatewayError::Config`] annotated with a source line.
    pub fn config_at_line(line: usize, message: impl Into<String>) -> Self {
        Self::Config {
            line: Some(line),
            message: message.into(),
        }
    }
}

/// Result alias used throughout `schema`, `transform`, `filter`, and
/// `mapping`.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_filter_message_includes_position() {
        let err = GatewayError::invalid_filter(7, "unexpected token");
        assert!(err.to_string().contains("position 7"));
        assert!(err.to_string().contains("unexpected token"));
    }

    #[test]
    fn config_error_includes_line_when_present() {
        let err = GatewayError::config_at_line(12, "unknown transformation 'bogus'");
        assert!(err.to_string().contains("line 12"));

        let err_no_line = GatewayError::config("missing resourceMapping");
        assert!(!err_no_line.to_string().contains("line"));
    }
}
