//! RDAP (Registration Data Access Protocol) transport and response schema.
//!
//! The client returns the response document untouched. `RdapObject` is the
//! typed view the summary layer reads; it decodes leniently so that registry
//! quirks (a string where an array belongs, a malformed event) cost only the
//! affected field.

use crate::error::RegardError;
use crate::protocols::registry::rdap_url_for;
use crate::types::{Protocol, QueryData, QueryResult, QueryType};
use reqwest::StatusCode;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// RDAP client for domain, IP and autnum lookups.
#[derive(Clone, Debug)]
pub struct RdapClient {
    /// HTTP client for making RDAP requests
    http_client: reqwest::Client,
    /// Timeout for one RDAP request, redirects included
    timeout: Duration,
}

impl RdapClient {
    /// Create a new RDAP client with the default 10 second timeout.
    pub fn new() -> Result<Self, RegardError> {
        Self::with_timeout(Duration::from_secs(10))
    }

    /// Create a new RDAP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, RegardError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("regard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                RegardError::network_with_source("Failed to create RDAP HTTP client", e.to_string())
            })?;

        Ok(Self {
            http_client,
            timeout,
        })
    }

    /// Query RDAP for a classified query string.
    ///
    /// Never fails: HTTP errors, timeouts and undecodable bodies come back as a
    /// failed `QueryResult`.
    pub async fn query(&self, query: &str, query_type: QueryType) -> QueryResult {
        let url = rdap_url_for(query, query_type);
        debug!(query, %url, "sending RDAP request");

        match tokio::time::timeout(self.timeout, self.make_rdap_request(&url, query)).await {
            Ok(Ok((document, body))) => {
                QueryResult::success(query, query_type, Protocol::Rdap, QueryData::Rdap(document), body)
            }
            Ok(Err(e)) => {
                debug!(query, error = %e, "RDAP request failed");
                QueryResult::failure(query, query_type, Protocol::Rdap, e)
            }
            Err(_) => {
                let e = RegardError::timeout("RDAP request", self.timeout);
                debug!(query, error = %e, "RDAP request timed out");
                QueryResult::failure(query, query_type, Protocol::Rdap, e)
            }
        }
    }

    async fn make_rdap_request(
        &self,
        url: &str,
        query: &str,
    ) -> Result<(Value, String), RegardError> {
        let response = self
            .http_client
            .get(url)
            .header("Accept", "application/rdap+json, application/json")
            .send()
            .await
            .map_err(|e| RegardError::rdap(query, format!("Request failed: {}", e)))?;

        let status = response.status();
        debug!(query, status = status.as_u16(), "RDAP response received");

        match status {
            StatusCode::OK => {
                let body = response
                    .text()
                    .await
                    .map_err(|e| RegardError::rdap(query, format!("Failed to read body: {}", e)))?;
                let document = serde_json::from_str::<Value>(&body)
                    .map_err(|e| RegardError::rdap(query, format!("Failed to parse JSON: {}", e)))?;
                Ok((document, body))
            }
            StatusCode::NOT_FOUND => Err(RegardError::rdap_with_status(
                query,
                "object not found",
                status.as_u16(),
            )),
            code => Err(RegardError::rdap_with_status(
                query,
                format!("RDAP server returned error: {}", code),
                code.as_u16(),
            )),
        }
    }
}

/// Typed view of an RDAP domain, IP network or autnum object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RdapObject {
    #[serde(deserialize_with = "lenient")]
    pub handle: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub ldh_name: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub country: Option<String>,

    #[serde(deserialize_with = "lenient_seq")]
    pub status: Vec<String>,

    #[serde(deserialize_with = "lenient_seq")]
    pub nameservers: Vec<RdapNameserver>,

    #[serde(rename = "secureDNS", deserialize_with = "lenient")]
    pub secure_dns: Option<SecureDns>,

    #[serde(deserialize_with = "lenient_seq")]
    pub events: Vec<RdapEvent>,

    #[serde(deserialize_with = "lenient_seq")]
    pub entities: Vec<RdapEntity>,

    #[serde(deserialize_with = "lenient")]
    pub start_autnum: Option<u64>,
}

impl RdapObject {
    /// Decode a response document; anything that is not an object is empty.
    pub fn from_value(document: &Value) -> Self {
        Self::deserialize(document).unwrap_or_default()
    }

    /// First top-level entity with the registrar role.
    pub fn registrar(&self) -> Option<&RdapEntity> {
        self.entities.iter().find(|entity| entity.has_role("registrar"))
    }

    /// First entity with `role`, searching nested entities depth-first.
    pub fn find_entity(&self, role: &str) -> Option<&RdapEntity> {
        self.entities.iter().find_map(|entity| entity.find(role))
    }

    pub fn delegation_signed(&self) -> bool {
        self.secure_dns
            .as_ref()
            .is_some_and(|dns| dns.delegation_signed)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RdapNameserver {
    #[serde(deserialize_with = "lenient")]
    pub ldh_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecureDns {
    #[serde(deserialize_with = "lenient")]
    pub delegation_signed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RdapEvent {
    #[serde(deserialize_with = "lenient")]
    pub event_action: String,

    #[serde(deserialize_with = "lenient")]
    pub event_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RdapEntity {
    #[serde(deserialize_with = "lenient")]
    pub handle: Option<String>,

    #[serde(deserialize_with = "lenient_seq")]
    pub roles: Vec<String>,

    pub vcard_array: VCard,

    #[serde(deserialize_with = "lenient_seq")]
    pub entities: Vec<RdapEntity>,
}

impl RdapEntity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Display name from the vCard `fn` property.
    pub fn full_name(&self) -> Option<&str> {
        self.vcard_array.get("fn")
    }

    pub fn email(&self) -> Option<&str> {
        self.vcard_array.get("email")
    }

    fn find(&self, role: &str) -> Option<&RdapEntity> {
        if self.has_role(role) {
            return Some(self);
        }
        self.entities.iter().find_map(|entity| entity.find(role))
    }
}

/// jCard contact data: `["vcard", [[name, params, type, value], ...]]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VCard {
    pub properties: Vec<VCardProperty>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VCardProperty {
    /// Lowercased property name
    pub name: String,
    pub value: Value,
}

impl VCard {
    /// Value of the first property called `name` that holds a string.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .filter(|property| property.name == name)
            .find_map(|property| property.value.as_str())
    }

    fn from_value(value: &Value) -> Self {
        let properties = value
            .as_array()
            .and_then(|card| card.get(1))
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let item = item.as_array()?;
                        let name = item.first()?.as_str()?;
                        let value = item.get(3)?;
                        Some(VCardProperty {
                            name: name.to_lowercase(),
                            value: value.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { properties }
    }
}

impl<'de> Deserialize<'de> for VCard {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(VCard::from_value(&value))
    }
}

/// Decode a field, falling back to its empty value on a shape mismatch.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Decode an array, skipping elements that do not fit.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(items)
}
