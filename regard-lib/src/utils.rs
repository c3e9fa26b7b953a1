//! Utility functions for query classification and name handling.
//!
//! These are string-shape heuristics only: nothing here resolves names or
//! validates them against a registry.

use crate::error::RegardError;
use crate::types::QueryType;

/// Classify a query string as a domain, IP address or AS number.
///
/// Total over all strings. Anything not recognized as an address or AS
/// number, including the empty string, is a domain.
///
/// ```
/// use regard_lib::{detect_query_type, QueryType};
///
/// assert_eq!(detect_query_type("8.8.8.8"), QueryType::Ip);
/// assert_eq!(detect_query_type("2001:db8::1"), QueryType::Ip);
/// assert_eq!(detect_query_type("AS15169"), QueryType::Asn);
/// assert_eq!(detect_query_type("example.com"), QueryType::Domain);
/// ```
pub fn detect_query_type(query: &str) -> QueryType {
    if query.contains(':') {
        return QueryType::Ip;
    }

    if query.contains('.') {
        if query.matches('.').count() == 3 {
            // A segment longer than 3 chars is a label, not an octet
            if query.split('.').all(|part| part.len() <= 3) {
                return QueryType::Ip;
            }
        }
        return QueryType::Domain;
    }

    if query.len() > 2 && has_as_prefix(query) {
        return QueryType::Asn;
    }

    QueryType::Domain
}

/// Extract the TLD used for lifecycle policy lookups.
///
/// Two trailing labels are joined when both are at most three characters long,
/// which approximates compound suffixes like `co.uk` and `com.au`. This also
/// turns `a.b.c` into `b.c`; the heuristic is kept as is.
pub fn extract_tld(domain: &str) -> String {
    let parts: Vec<&str> = domain.split('.').collect();

    match parts.as_slice() {
        [.., second, last] if parts.len() >= 3 && second.len() <= 3 && last.len() <= 3 => {
            format!("{}.{}", second, last)
        }
        [_, .., last] => last.to_string(),
        _ => domain.to_string(),
    }
}

/// Reject query strings that cannot be sent to any registry.
pub fn validate_query(query: &str) -> Result<(), RegardError> {
    let query = query.trim();

    if query.is_empty() {
        return Err(RegardError::invalid_query(query, "Query cannot be empty"));
    }

    if query.chars().any(char::is_whitespace) {
        return Err(RegardError::invalid_query(
            query,
            "Query cannot contain whitespace",
        ));
    }

    Ok(())
}

/// Numeric part of an AS identifier ("AS15169" -> "15169").
pub(crate) fn asn_digits(query: &str) -> &str {
    if query.len() > 2 && has_as_prefix(query) {
        &query[2..]
    } else {
        query
    }
}

fn has_as_prefix(query: &str) -> bool {
    query
        .get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("as"))
}
