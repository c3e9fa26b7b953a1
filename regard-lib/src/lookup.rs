//! Protocol selection over the RDAP and WHOIS clients.

use crate::error::RegardError;
use crate::protocols::{RdapClient, WhoisClient};
use crate::types::QueryResult;
use crate::utils::{detect_query_type, validate_query};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Which protocols a lookup may use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolPreference {
    /// RDAP first, WHOIS when RDAP fails
    #[default]
    Auto,
    /// RDAP only, never fall back
    #[serde(alias = "rdap-only")]
    Rdap,
    /// WHOIS only
    #[serde(alias = "whois-only")]
    Whois,
}

impl FromStr for ProtocolPreference {
    type Err = RegardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "rdap" | "rdap-only" => Ok(Self::Rdap),
            "whois" | "whois-only" => Ok(Self::Whois),
            other => Err(RegardError::config(format!(
                "Invalid protocol '{}'. Expected auto, rdap or whois",
                other
            ))),
        }
    }
}

impl fmt::Display for ProtocolPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Rdap => write!(f, "rdap"),
            Self::Whois => write!(f, "whois"),
        }
    }
}

/// Settings for a `Lookup`.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupConfig {
    pub preference: ProtocolPreference,

    /// Timeout for one RDAP request
    pub rdap_timeout: Duration,

    /// Timeout for one whois command run
    pub whois_timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            preference: ProtocolPreference::Auto,
            rdap_timeout: Duration::from_secs(10),
            whois_timeout: Duration::from_secs(10),
        }
    }
}

impl LookupConfig {
    pub fn with_preference(mut self, preference: ProtocolPreference) -> Self {
        self.preference = preference;
        self
    }

    /// Set both protocol timeouts.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.rdap_timeout = timeout;
        self.whois_timeout = timeout;
        self
    }
}

/// Runs one query against the registries according to a `LookupConfig`.
///
/// ```rust,no_run
/// use regard_lib::{create_summary, Lookup, LookupConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let lookup = Lookup::new(LookupConfig::default())?;
///     let result = lookup.query("example.com").await?;
///     let summary = create_summary(&result);
///     println!("{}: {}", summary.domain, summary.status);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Lookup {
    config: LookupConfig,
    rdap_client: RdapClient,
    whois_client: WhoisClient,
}

impl Lookup {
    pub fn new(config: LookupConfig) -> Result<Self, RegardError> {
        let rdap_client = RdapClient::with_timeout(config.rdap_timeout)?;
        let whois_client = WhoisClient::with_timeout(config.whois_timeout);

        Ok(Self {
            config,
            rdap_client,
            whois_client,
        })
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Look up a domain, IP address or AS number.
    ///
    /// Only an invalid query string is an error. Registry failures come back as
    /// a `QueryResult` with `success == false`; in `Auto` mode that is the
    /// WHOIS attempt after RDAP failed.
    pub async fn query(&self, query: &str) -> Result<QueryResult, RegardError> {
        validate_query(query)?;
        let query = query.trim();
        let query_type = detect_query_type(query);
        debug!(query, %query_type, preference = %self.config.preference, "starting lookup");

        let result = match self.config.preference {
            ProtocolPreference::Whois => self.whois_client.query(query, query_type).await,
            ProtocolPreference::Rdap => self.rdap_client.query(query, query_type).await,
            ProtocolPreference::Auto => {
                let rdap = self.rdap_client.query(query, query_type).await;
                if rdap.success {
                    rdap
                } else {
                    info!(query, error = %rdap.error, "RDAP failed, falling back to WHOIS");
                    self.whois_client.query(query, query_type).await
                }
            }
        };

        debug!(
            query,
            protocol = %result.protocol,
            success = result.success,
            "lookup finished"
        );
        Ok(result)
    }
}
