//! Core data types for registry lookups and summaries.
//!
//! `QueryResult` is what the network collaborators hand to the core; `Summary`
//! is the protocol-independent view the core hands to presentation. Both are
//! plain values: built once, never mutated after they are returned.

use crate::protocols::whois::WhoisRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of object a query string refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Domain,
    Ip,
    Asn,
}

/// Protocol that produced a query result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[serde(rename = "RDAP")]
    Rdap,
    #[serde(rename = "WHOIS")]
    Whois,
}

/// Structured payload of a successful query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QueryData {
    /// Line-parsed WHOIS response
    Whois(WhoisRecord),

    /// RDAP response document as received
    Rdap(serde_json::Value),
}

/// Outcome of one network attempt against a registry.
///
/// Produced once per attempt by an RDAP or WHOIS client and read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// The query string as entered (e.g., "example.com", "AS15169")
    pub query: String,

    /// Classified kind of the query
    #[serde(rename = "type")]
    pub query_type: QueryType,

    /// Protocol used for this attempt
    pub protocol: Protocol,

    /// When the attempt was made
    pub timestamp: DateTime<Utc>,

    /// Whether the registry answered with data
    pub success: bool,

    /// Structured payload, present on success
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<QueryData>,

    /// Response text as received from the registry
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub raw_data: String,

    /// Failure description, empty on success
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl QueryResult {
    /// Build a successful result.
    pub fn success<Q: Into<String>>(
        query: Q,
        query_type: QueryType,
        protocol: Protocol,
        data: QueryData,
        raw_data: String,
    ) -> Self {
        Self {
            query: query.into(),
            query_type,
            protocol,
            timestamp: Utc::now(),
            success: true,
            data: Some(data),
            raw_data,
            error: String::new(),
        }
    }

    /// Build a failed result carrying only the error text.
    pub fn failure<Q: Into<String>, E: fmt::Display>(
        query: Q,
        query_type: QueryType,
        protocol: Protocol,
        error: E,
    ) -> Self {
        Self {
            query: query.into(),
            query_type,
            protocol,
            timestamp: Utc::now(),
            success: false,
            data: None,
            raw_data: String::new(),
            error: error.to_string(),
        }
    }
}

/// Overall registration state shown for a query.
///
/// Domains always land on one of the first three variants. ASN queries may
/// carry the registry's own status string instead.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SummaryStatus {
    Available,
    Active,
    #[default]
    Unknown,
    Registry(String),
}

impl SummaryStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SummaryStatus::Available => "available",
            SummaryStatus::Active => "active",
            SummaryStatus::Unknown => "unknown",
            SummaryStatus::Registry(status) => status,
        }
    }
}

impl From<String> for SummaryStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "available" => SummaryStatus::Available,
            "active" => SummaryStatus::Active,
            "unknown" => SummaryStatus::Unknown,
            _ => SummaryStatus::Registry(value),
        }
    }
}

impl From<SummaryStatus> for String {
    fn from(value: SummaryStatus) -> Self {
        match value {
            SummaryStatus::Registry(status) => status,
            other => other.as_str().to_string(),
        }
    }
}

/// Protocol-independent summary of one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// Domain, address or AS identifier that was queried
    pub domain: String,

    /// Overall registration state
    pub status: SummaryStatus,

    /// Raw status tokens reported by the registry
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub status_details: Vec<String>,

    /// Protocol the data came from
    pub protocol: Protocol,

    /// Kind of query
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_type: Option<QueryType>,

    /// Registration lifecycle events
    pub timeline: Timeline,

    /// Nameserver hostnames in encounter order, without duplicates
    pub nameservers: Vec<String>,

    /// DNSSEC delegation state
    pub dnssec: DnssecInfo,

    /// Sponsoring registrar
    pub registrar: RegistrarInfo,

    /// Acquisition guidance for domains at or past expiry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_expiration: Option<ExpirationInfo>,

    /// Autonomous system details, ASN queries only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<AsnInfo>,
}

impl Summary {
    /// Empty summary shell for a query.
    pub fn new<D: Into<String>>(domain: D, protocol: Protocol, query_type: QueryType) -> Self {
        Self {
            domain: domain.into(),
            status: SummaryStatus::Unknown,
            status_details: Vec::new(),
            protocol,
            query_type: Some(query_type),
            timeline: Timeline::default(),
            nameservers: Vec::new(),
            dnssec: DnssecInfo::default(),
            registrar: RegistrarInfo::default(),
            post_expiration: None,
            asn: None,
        }
    }
}

/// Important dates in a registration's lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration: Option<TimelineEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<TimelineEvent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<TimelineEvent>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.registration.is_none() && self.last_updated.is_none() && self.expiration.is_none()
    }
}

/// A single timeline entry.
///
/// `human_readable` is a snapshot taken when the summary was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: DateTime<Utc>,
    pub human_readable: String,
}

/// DNSSEC status information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnssecInfo {
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Registrar information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrarInfo {
    /// Registrar display name, empty when unknown
    pub name: String,

    /// Registry-assigned registrar ID (IANA ID or RDAP handle)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Guidance for domains that have expired or are about to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationInfo {
    /// Whole days since expiry; 0 while the domain has not yet expired
    pub days_expired: i64,

    /// Estimated date the name becomes registrable again
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_date: Option<DateTime<Utc>>,

    pub guidance_message: String,
}

/// Autonomous System details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AsnInfo {
    pub number: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,

    pub organization: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub abuse_contact: String,

    /// Peer AS identifiers in first-seen order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<String>,
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryType::Domain => write!(f, "domain"),
            QueryType::Ip => write!(f, "ip"),
            QueryType::Asn => write!(f, "asn"),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Rdap => write!(f, "RDAP"),
            Protocol::Whois => write!(f, "WHOIS"),
        }
    }
}

impl fmt::Display for SummaryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_as_plain_string() {
        let json = serde_json::to_string(&SummaryStatus::Available).unwrap();
        assert_eq!(json, "\"available\"");

        let registry = SummaryStatus::Registry("ASSIGNED".to_string());
        assert_eq!(serde_json::to_string(&registry).unwrap(), "\"ASSIGNED\"");

        let parsed: SummaryStatus = serde_json::from_str("\"active\"").unwrap();
        assert_eq!(parsed, SummaryStatus::Active);
    }

    #[test]
    fn test_summary_omits_empty_optional_fields() {
        let summary = Summary::new("example.com", Protocol::Whois, QueryType::Domain);
        let value = serde_json::to_value(&summary).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["domain"], "example.com");
        assert_eq!(object["protocol"], "WHOIS");
        assert_eq!(object["query_type"], "domain");
        assert_eq!(object["nameservers"], serde_json::json!([]));
        assert_eq!(object["timeline"], serde_json::json!({}));
        assert!(!object.contains_key("status_details"));
        assert!(!object.contains_key("post_expiration"));
        assert!(!object.contains_key("asn"));
        assert!(!object["registrar"].as_object().unwrap().contains_key("id"));
    }

    #[test]
    fn test_failure_result_has_no_data() {
        let result = QueryResult::failure("example.com", QueryType::Domain, Protocol::Rdap, "boom");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error, "boom");

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["type"], "domain");
        assert!(value.get("raw_data").is_none());
    }
}
