//! Protocol transports and their response representations.
//!
//! Both clients turn every outcome into a `QueryResult`; nothing in here
//! interprets registration data.

/// RDAP transport and typed response schema
pub mod rdap;

/// WHOIS transport and line tokenizer
pub mod whois;

/// RDAP endpoint selection
pub mod registry;

pub use rdap::{RdapClient, RdapEntity, RdapObject};
pub use registry::{rdap_registry_map, rdap_url_for};
pub use whois::{WhoisClient, WhoisRecord};
