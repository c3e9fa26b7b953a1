//! WHOIS transport and line-level response parsing.
//!
//! The client shells out to the system `whois` command, which already knows
//! how to follow registry referrals. Responses are tokenized into
//! `WhoisRecord`s; interpreting the fields is left to the summary layer.

use crate::error::RegardError;
use crate::types::{Protocol, QueryData, QueryResult, QueryType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

/// WHOIS client using the system's whois command.
#[derive(Clone, Debug)]
pub struct WhoisClient {
    /// Timeout for the whole command run
    timeout: Duration,
}

impl WhoisClient {
    /// Create a new WHOIS client with the default 10 second timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(10))
    }

    /// Create a new WHOIS client with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Query WHOIS for a domain, address or AS number.
    ///
    /// Never fails: command errors, timeouts and empty output come back as a
    /// failed `QueryResult`.
    pub async fn query(&self, query: &str, query_type: QueryType) -> QueryResult {
        match tokio::time::timeout(self.timeout, self.execute_whois_command(query)).await {
            Ok(Ok(raw)) => {
                let record = WhoisRecord::parse(&raw);
                QueryResult::success(query, query_type, Protocol::Whois, QueryData::Whois(record), raw)
            }
            Ok(Err(e)) => {
                debug!(query, error = %e, "whois command failed");
                QueryResult::failure(query, query_type, Protocol::Whois, e)
            }
            Err(_) => {
                let e = RegardError::timeout("WHOIS query", self.timeout);
                debug!(query, error = %e, "whois command timed out");
                QueryResult::failure(query, query_type, Protocol::Whois, e)
            }
        }
    }

    async fn execute_whois_command(&self, query: &str) -> Result<String, RegardError> {
        let output = Command::new("whois")
            .arg(query)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                RegardError::whois(
                    query,
                    format!(
                        "Failed to execute whois command: {}. Make sure 'whois' is installed.",
                        e
                    ),
                )
            })?;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(query, status = %output.status, bytes = text.len(), "whois command finished");

        if text.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = match stderr.trim() {
                "" => "empty response".to_string(),
                detail => format!("empty response: {}", detail),
            };
            return Err(RegardError::whois(query, message));
        }

        Ok(text)
    }
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A WHOIS response split into normalized `key: value` entries.
///
/// `entries` keeps every occurrence in response order; `parsed_fields` is the
/// flat view where the last occurrence of a key wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WhoisRecordWire", into = "WhoisRecordWire")]
pub struct WhoisRecord {
    pub entries: Vec<(String, String)>,
    pub parsed_fields: BTreeMap<String, String>,
    pub raw_response: String,
}

#[derive(Serialize, Deserialize)]
struct WhoisRecordWire {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    parsed_fields: BTreeMap<String, String>,
    raw_response: String,
}

impl From<WhoisRecordWire> for WhoisRecord {
    fn from(wire: WhoisRecordWire) -> Self {
        // Entries are not serialized; rebuild them from the raw text.
        WhoisRecord::parse(&wire.raw_response)
    }
}

impl From<WhoisRecord> for WhoisRecordWire {
    fn from(record: WhoisRecord) -> Self {
        Self {
            parsed_fields: record.parsed_fields,
            raw_response: record.raw_response,
        }
    }
}

impl WhoisRecord {
    /// Tokenize a raw WHOIS response.
    ///
    /// Comment lines (`%`, `#`), the `>>> ... <<<` footer, lines without a
    /// colon and lines with an empty value are skipped. Keys are lowercased with spaces turned into `_`.
    pub fn parse(raw: &str) -> Self {
        let mut entries = Vec::new();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty()
                || line.starts_with('%')
                || line.starts_with('#')
                || line.starts_with(">>>")
            {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            let key = key.trim().to_lowercase().replace(' ', "_");
            entries.push((key, value.to_string()));
        }

        let parsed_fields = entries.iter().cloned().collect();

        Self {
            entries,
            parsed_fields,
            raw_response: raw.to_string(),
        }
    }

    /// Flat lookup; the last occurrence of `key` wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.parsed_fields.get(key).map(String::as_str)
    }

    /// First key in `keys` that has a value.
    pub fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.get(key))
    }

    /// EPP status codes from `domain_status` and `status` lines.
    ///
    /// Trailing ICANN explanation URLs are dropped.
    pub fn status_tokens(&self) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();

        let values = self
            .entries
            .iter()
            .filter(|(key, _)| key == "domain_status" || key == "status")
            .map(|(_, value)| value);

        for value in values {
            for part in value.split_whitespace() {
                if part.starts_with("http") || !is_status_code(part) {
                    continue;
                }
                if !tokens.iter().any(|existing| existing == part) {
                    tokens.push(part.to_string());
                }
            }
        }

        tokens
    }

    /// Nameserver hostnames in encounter order without duplicates.
    pub fn nameservers(&self) -> Vec<String> {
        let mut nameservers: Vec<String> = Vec::new();

        for (key, value) in &self.entries {
            if !(key.contains("name_server") || key.contains("nameserver")) {
                continue;
            }
            if !nameservers.iter().any(|existing| existing == value) {
                nameservers.push(value.clone());
            }
        }

        nameservers
    }
}

fn is_status_code(part: &str) -> bool {
    let lower = part.to_lowercase();
    lower == "ok"
        || lower.contains("rohibited")
        || lower.contains("ctive")
        || lower.contains("ransfer")
        || lower.contains("client")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
% IANA WHOIS server
# for more information see https://www.iana.org/whois
   Domain Name: EXAMPLE.COM
   Registry Domain ID: 2336799_DOMAIN_COM-VRSN
   Registrar: RESERVED-Internet Assigned Numbers Authority
   Registrar IANA ID: 376
   Updated Date: 2024-08-14T07:01:34Z
   Domain Status: clientDeleteProhibited https://icann.org/epp#clientDeleteProhibited
   Domain Status: clientTransferProhibited https://icann.org/epp#clientTransferProhibited
   Name Server: A.IANA-SERVERS.NET
   Name Server: B.IANA-SERVERS.NET
   Name Server: A.IANA-SERVERS.NET
   DNSSEC: signedDelegation
   URL of the ICANN Whois Inaccuracy Complaint Form: https://www.icann.org/wicf/
   Registrant Name:
>>> Last update of whois database: 2025-01-01T00:00:00Z <<<
";

    #[test]
    fn test_parse_fields() {
        let record = WhoisRecord::parse(SAMPLE);

        assert_eq!(record.get("domain_name"), Some("EXAMPLE.COM"));
        assert_eq!(record.get("registrar_iana_id"), Some("376"));
        assert_eq!(record.get("dnssec"), Some("signedDelegation"));
        assert_eq!(
            record.get("url_of_the_icann_whois_inaccuracy_complaint_form"),
            Some("https://www.icann.org/wicf/")
        );
        assert!(record.get("registrant_name").is_none());
        assert!(record.parsed_fields.keys().all(|k| !k.contains("iana_whois")));
        assert_eq!(record.raw_response, SAMPLE);
    }

    #[test]
    fn test_footer_line_is_not_a_field() {
        let record = WhoisRecord::parse(SAMPLE);
        assert!(record.parsed_fields.keys().all(|k| !k.starts_with(">>>")));
        assert!(record.get("last_update_of_whois_database").is_none());
        assert!(record.raw_response.contains(">>> Last update of whois database"));
    }

    #[test]
    fn test_last_occurrence_wins_in_flat_view() {
        let record = WhoisRecord::parse(SAMPLE);
        assert_eq!(record.get("domain_status").map(|s| s.starts_with("clientTransfer")), Some(true));
        let statuses = record.entries.iter().filter(|(k, _)| k == "domain_status");
        assert_eq!(statuses.count(), 2);
    }

    #[test]
    fn test_status_tokens_drop_urls() {
        let record = WhoisRecord::parse(SAMPLE);
        assert_eq!(
            record.status_tokens(),
            vec!["clientDeleteProhibited", "clientTransferProhibited"]
        );

        let ok = WhoisRecord::parse("Domain Status: ok https://icann.org/epp#ok\n");
        assert_eq!(ok.status_tokens(), vec!["ok"]);
    }

    #[test]
    fn test_nameservers_deduplicated_in_order() {
        let record = WhoisRecord::parse(SAMPLE);
        assert_eq!(
            record.nameservers(),
            vec!["A.IANA-SERVERS.NET", "B.IANA-SERVERS.NET"]
        );
    }

    #[test]
    fn test_serialized_shape() {
        let record = WhoisRecord::parse("Domain Name: EXAMPLE.COM\n");
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["parsed_fields"]["domain_name"], "EXAMPLE.COM");
        assert_eq!(value["raw_response"], "Domain Name: EXAMPLE.COM\n");
        assert!(value.get("entries").is_none());

        let empty = serde_json::to_value(WhoisRecord::parse("% nothing here")).unwrap();
        assert!(empty.get("parsed_fields").is_none());

        let back: WhoisRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = WhoisClient::with_timeout(Duration::from_secs(3));
        assert_eq!(client.timeout, Duration::from_secs(3));
    }
}
