//! RDAP endpoint selection.
//!
//! Domains go to their registry's RDAP server when it is in the built-in map
//! and to the rdap.org redirector otherwise. Addresses and AS numbers always
//! go through rdap.org, which redirects to the responsible RIR.

use crate::types::QueryType;
use crate::utils::asn_digits;
use std::collections::HashMap;

/// Redirector base used when no registry-specific endpoint is known.
pub const RDAP_FALLBACK_BASE: &str = "https://rdap.org";

/// Get the built-in RDAP registry mappings.
///
/// Keys are single-label TLDs; values are base URLs the domain name is appended to.
pub fn rdap_registry_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        // Popular gTLDs
        ("com", "https://rdap.verisign.com/com/v1/domain/"),
        ("net", "https://rdap.verisign.com/net/v1/domain/"),
        (
            "org",
            "https://rdap.publicinterestregistry.org/rdap/domain/",
        ),
        ("info", "https://rdap.identitydigital.services/rdap/domain/"),
        ("biz", "https://rdap.nic.biz/domain/"),
        // Google registry
        ("app", "https://pubapi.registry.google/rdap/domain/"),
        ("dev", "https://pubapi.registry.google/rdap/domain/"),
        ("page", "https://pubapi.registry.google/rdap/domain/"),
        // CentralNic
        ("xyz", "https://rdap.centralnic.com/xyz/domain/"),
        ("tech", "https://rdap.centralnic.com/tech/domain/"),
        ("online", "https://rdap.centralnic.com/online/domain/"),
        ("site", "https://rdap.centralnic.com/site/domain/"),
        // Identity Digital
        ("ai", "https://rdap.identitydigital.services/rdap/domain/"),
        ("io", "https://rdap.identitydigital.services/rdap/domain/"),
        ("me", "https://rdap.identitydigital.services/rdap/domain/"),
        // ccTLDs
        ("us", "https://rdap.nic.us/domain/"),
        ("uk", "https://rdap.nominet.uk/domain/"),
        ("de", "https://rdap.denic.de/domain/"),
        ("ca", "https://rdap.ca.fury.ca/rdap/domain/"),
        ("au", "https://rdap.cctld.au/rdap/domain/"),
        ("fr", "https://rdap.nic.fr/domain/"),
        ("nl", "https://rdap.sidn.nl/domain/"),
        ("br", "https://rdap.registro.br/domain/"),
        ("tv", "https://rdap.nic.tv/domain/"),
        ("cc", "https://tld-rdap.verisign.com/cc/v1/domain/"),
    ])
}

/// Registry endpoint for the last label of `domain`, if one is built in.
pub fn rdap_endpoint_for(domain: &str) -> Option<&'static str> {
    let tld = domain.rsplit('.').next()?.to_lowercase();
    rdap_registry_map().get(tld.as_str()).copied()
}

/// Full RDAP URL for a classified query.
pub fn rdap_url_for(query: &str, query_type: QueryType) -> String {
    match query_type {
        QueryType::Domain => {
            let domain = query.trim_end_matches('.');
            match rdap_endpoint_for(domain) {
                Some(endpoint) => format!("{}{}", endpoint, domain),
                None => format!("{}/domain/{}", RDAP_FALLBACK_BASE, domain),
            }
        }
        QueryType::Ip => format!("{}/ip/{}", RDAP_FALLBACK_BASE, query),
        QueryType::Asn => format!("{}/autnum/{}", RDAP_FALLBACK_BASE, asn_digits(query)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_map_contains_common_tlds() {
        let registry = rdap_registry_map();
        for tld in ["com", "net", "org", "uk", "de"] {
            assert!(registry.contains_key(tld), "{}", tld);
        }
    }

    #[test]
    fn test_all_endpoints_are_valid_https_urls() {
        for (tld, endpoint) in rdap_registry_map() {
            assert!(endpoint.starts_with("https://"), "{}: {}", tld, endpoint);
            assert!(endpoint.ends_with('/'), "{}: {}", tld, endpoint);
        }
    }

    #[test]
    fn test_domain_urls() {
        assert_eq!(
            rdap_url_for("example.com", QueryType::Domain),
            "https://rdap.verisign.com/com/v1/domain/example.com"
        );
        assert_eq!(
            rdap_url_for("example.co.uk", QueryType::Domain),
            "https://rdap.nominet.uk/domain/example.co.uk"
        );
        assert_eq!(
            rdap_url_for("example.museum", QueryType::Domain),
            "https://rdap.org/domain/example.museum"
        );
        assert_eq!(
            rdap_url_for("EXAMPLE.COM", QueryType::Domain),
            "https://rdap.verisign.com/com/v1/domain/EXAMPLE.COM"
        );
    }

    #[test]
    fn test_ip_and_asn_urls() {
        assert_eq!(
            rdap_url_for("8.8.8.8", QueryType::Ip),
            "https://rdap.org/ip/8.8.8.8"
        );
        assert_eq!(
            rdap_url_for("AS15169", QueryType::Asn),
            "https://rdap.org/autnum/15169"
        );
        assert_eq!(
            rdap_url_for("as13335", QueryType::Asn),
            "https://rdap.org/autnum/13335"
        );
    }
}
