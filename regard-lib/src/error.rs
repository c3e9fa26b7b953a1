//! Error handling for registry lookups and configuration.
//!
//! Summary creation itself never fails. These errors come from the network
//! collaborators, the configuration layer and the date helpers, and are either
//! folded into a failed `QueryResult` or reported by the CLI.

use std::fmt;

/// Main error type for regard operations.
#[derive(Debug, Clone)]
pub enum RegardError {
    /// Query string that cannot be looked up
    InvalidQuery {
        query: String,
        reason: String,
    },

    /// Network-related errors (connection, DNS, TLS)
    NetworkError {
        message: String,
        source: Option<String>,
    },

    /// RDAP protocol specific errors
    RdapError {
        query: String,
        message: String,
        status_code: Option<u16>,
    },

    /// WHOIS protocol specific errors
    WhoisError {
        query: String,
        message: String,
    },

    /// Unparsable payloads or field values (JSON, dates)
    ParseError {
        message: String,
        content: Option<String>,
    },

    /// Configuration errors (invalid settings, bad TOML)
    ConfigError {
        message: String,
    },

    /// File I/O errors when reading configuration
    FileError {
        path: String,
        message: String,
    },

    /// Timeout errors when a lookup takes too long
    Timeout {
        operation: String,
        duration: std::time::Duration,
    },

    /// I/O failures outside configuration loading
    Internal {
        message: String,
    },
}

impl RegardError {
    /// Create a new invalid query error.
    pub fn invalid_query<Q: Into<String>, R: Into<String>>(query: Q, reason: R) -> Self {
        Self::InvalidQuery {
            query: query.into(),
            reason: reason.into(),
        }
    }

    /// Create a new network error with source information.
    pub fn network_with_source<M: Into<String>, S: Into<String>>(message: M, source: S) -> Self {
        Self::NetworkError {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a new RDAP error.
    pub fn rdap<Q: Into<String>, M: Into<String>>(query: Q, message: M) -> Self {
        Self::RdapError {
            query: query.into(),
            message: message.into(),
            status_code: None,
        }
    }

    /// Create a new RDAP error with HTTP status code.
    pub fn rdap_with_status<Q: Into<String>, M: Into<String>>(
        query: Q,
        message: M,
        status_code: u16,
    ) -> Self {
        Self::RdapError {
            query: query.into(),
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// Create a new WHOIS error.
    pub fn whois<Q: Into<String>, M: Into<String>>(query: Q, message: M) -> Self {
        Self::WhoisError {
            query: query.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse<M: Into<String>>(message: M) -> Self {
        Self::ParseError {
            message: message.into(),
            content: None,
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: std::time::Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a new file error.
    pub fn file_error<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::FileError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RegardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidQuery { query, reason } => {
                write!(f, "Invalid query '{}': {}", query, reason)
            }
            Self::NetworkError { message, source } => {
                if let Some(source) = source {
                    write!(f, "Network error: {} (source: {})", message, source)
                } else {
                    write!(f, "Network error: {}", message)
                }
            }
            Self::RdapError {
                query,
                message,
                status_code,
            } => {
                if let Some(code) = status_code {
                    write!(f, "RDAP error for '{}' (HTTP {}): {}", query, code, message)
                } else {
                    write!(f, "RDAP error for '{}': {}", query, message)
                }
            }
            Self::WhoisError { query, message } => {
                write!(f, "WHOIS error for '{}': {}", query, message)
            }
            Self::ParseError { message, content: _ } => {
                write!(f, "Parse error: {}", message)
            }
            Self::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::FileError { path, message } => {
                write!(f, "File error at '{}': {}", path, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for RegardError {}

impl From<reqwest::Error> for RegardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::timeout("HTTP request", std::time::Duration::from_secs(10))
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err.to_string())
        } else {
            Self::network_with_source("HTTP request failed", err.to_string())
        }
    }
}

impl From<serde_json::Error> for RegardError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: format!("JSON parsing failed: {}", err),
            content: None,
        }
    }
}

impl From<std::io::Error> for RegardError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal {
            message: format!("I/O error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status_code() {
        let err = RegardError::rdap_with_status("example.com", "object not found", 404);
        assert_eq!(
            err.to_string(),
            "RDAP error for 'example.com' (HTTP 404): object not found"
        );
    }

    #[test]
    fn test_parse_error_display() {
        let err = RegardError::parse("unable to parse date: soon");
        assert_eq!(err.to_string(), "Parse error: unable to parse date: soon");
    }

    #[test]
    fn test_conversions() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RegardError::from(json_err);
        assert!(matches!(err, RegardError::ParseError { .. }));
        assert!(err.to_string().starts_with("Parse error: JSON parsing failed"));

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "whois");
        assert_eq!(RegardError::from(io_err).to_string(), "Internal error: I/O error: whois");
    }
}
