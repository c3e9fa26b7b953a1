//! # Regard Library
//!
//! Normalizes RDAP and WHOIS registry responses for domains, IP addresses and
//! AS numbers into one protocol-independent `Summary`, and derives status,
//! DNSSEC, timeline and post-expiration guidance from it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use regard_lib::{create_summary, Lookup, LookupConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let lookup = Lookup::new(LookupConfig::default())?;
//!     let result = lookup.query("example.com").await?;
//!
//!     let summary = create_summary(&result);
//!     println!("{} is {} ({})", summary.domain, summary.status, summary.protocol);
//!     Ok(())
//! }
//! ```
//!
//! Summaries can also be built from responses obtained elsewhere; the
//! summary layer never touches the network:
//!
//! ```rust
//! use regard_lib::{create_summary, Protocol, QueryData, QueryResult, QueryType, WhoisRecord};
//!
//! let raw = "Domain Name: EXAMPLE.COM\nDomain Status: clientTransferProhibited\n";
//! let result = QueryResult::success(
//!     "example.com",
//!     QueryType::Domain,
//!     Protocol::Whois,
//!     QueryData::Whois(WhoisRecord::parse(raw)),
//!     raw.to_string(),
//! );
//!
//! let summary = create_summary(&result);
//! assert_eq!(summary.status.as_str(), "active");
//! ```

pub use asn::parse_asn_info;
pub use config::{
    load_env_config, load_env_config_from, parse_timeout_string, ConfigManager, DefaultsConfig,
    EnvConfig, FileConfig,
};
pub use error::RegardError;
pub use lifecycle::{generate_post_expiration_guidance, human_readable_time, parse_whois_date};
pub use lookup::{Lookup, LookupConfig, ProtocolPreference};
pub use protocols::{rdap_url_for, RdapClient, RdapObject, WhoisClient, WhoisRecord};
pub use status::interpret_status;
pub use summary::{create_summary, create_summary_at};
pub use types::{
    AsnInfo, DnssecInfo, ExpirationInfo, Protocol, QueryData, QueryResult, QueryType,
    RegistrarInfo, Summary, SummaryStatus, Timeline, TimelineEvent,
};
pub use utils::{detect_query_type, extract_tld, validate_query};

pub mod protocols;

mod asn;
mod config;
mod error;
mod lifecycle;
mod lookup;
mod status;
mod summary;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, RegardError>;
