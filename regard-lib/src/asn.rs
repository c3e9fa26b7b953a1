//! Autonomous system metadata from RIR records.
//!
//! RIPE, ARIN, APNIC and friends all answer AS queries with RPSL-ish
//! `key: value` text, differing mostly in key names. The text scan handles
//! those dialects; RDAP autnum objects fill whatever the scan left empty.

use crate::protocols::rdap::{RdapEntity, RdapObject};
use crate::types::AsnInfo;

/// Scan an AS registry response and apply the record fallbacks.
///
/// Returns `None` for an empty response. The AS number defaults to `query`
/// until an `aut-num` line says otherwise.
pub fn parse_asn_info(query: &str, raw: &str) -> Option<AsnInfo> {
    let mut info = scan_asn_text(query, raw)?;
    finalize(&mut info);
    Some(info)
}

/// Line scan of the raw record without the post-scan fallbacks.
pub fn scan_asn_text(query: &str, raw: &str) -> Option<AsnInfo> {
    if raw.is_empty() {
        return None;
    }

    let mut info = AsnInfo {
        number: query.to_string(),
        ..AsnInfo::default()
    };

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // RIPE: "% Abuse contact for 'AS9009' is 'abuse@m247.ro'"
        if line.starts_with('%') {
            if line.to_lowercase().contains("abuse contact for") {
                if let Some(email) = last_quoted_email(line) {
                    info.abuse_contact = email.to_string();
                }
            }
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if value.is_empty() {
            continue;
        }

        match key.as_str() {
            "aut-num" | "asnumber" => info.number = value.to_string(),
            "as-name" | "asname" => info.name = value.to_string(),
            "descr" | "description" => {
                if info.description.is_empty() {
                    info.description = value.to_string();
                }
            }
            "country" => info.country = value.to_string(),
            "org-name" | "orgname" => info.organization = value.to_string(),
            "status" => info.status = value.to_string(),
            "abuse-mailbox" | "orgabuseemail" | "orgabuse-email" => {
                info.abuse_contact = value.to_string()
            }
            _ => {}
        }

        if (key.starts_with("import") || key.starts_with("export")) && value.contains("AS") {
            collect_peers(&mut info, value);
        }
    }

    Some(info)
}

/// Fill empty fields from an RDAP autnum object.
///
/// A number still equal to the raw `query` is replaced by the canonical
/// `AS<startAutnum>` form.
pub fn fill_from_rdap(info: &mut AsnInfo, query: &str, object: &RdapObject) {
    if info.number.is_empty() || info.number == query {
        if let Some(start) = object.start_autnum {
            info.number = format!("AS{}", start);
        } else if let Some(handle) = object.handle.as_deref().filter(|h| !h.is_empty()) {
            info.number = handle.to_string();
        }
    }

    fill(&mut info.name, object.name.as_deref());
    fill(&mut info.country, object.country.as_deref());
    fill(&mut info.status, object.status.first().map(String::as_str));
    fill(
        &mut info.organization,
        object.find_entity("registrant").and_then(RdapEntity::full_name),
    );
    fill(
        &mut info.abuse_contact,
        object.find_entity("abuse").and_then(RdapEntity::email),
    );
}

/// Organization falls back to the description; a record with identifying
/// data but no explicit status is treated as active.
pub fn finalize(info: &mut AsnInfo) {
    if info.organization.is_empty() && !info.description.is_empty() {
        info.organization = info.description.clone();
    }

    if info.status.is_empty() && (!info.name.is_empty() || !info.organization.is_empty()) {
        info.status = "active".to_string();
    }
}

fn fill(field: &mut String, value: Option<&str>) {
    if field.is_empty() {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            *field = value.to_string();
        }
    }
}

/// Quoted segments sit at odd positions when splitting on `'`.
fn last_quoted_email(line: &str) -> Option<&str> {
    line.split('\'')
        .skip(1)
        .step_by(2)
        .filter(|segment| segment.contains('@'))
        .last()
}

fn collect_peers(info: &mut AsnInfo, value: &str) {
    for word in value.split_whitespace() {
        if !(word.starts_with("AS") && word.len() > 2) {
            continue;
        }

        let peer = word.trim_end_matches([',', ';', ':']);
        if peer.len() <= 2 || peer == info.number {
            continue;
        }

        if !info.peers.iter().any(|existing| existing == peer) {
            info.peers.push(peer.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const RIPE_RECORD: &str = "\
% This is the RIPE Database query service.
% Abuse contact for 'AS9009' is 'abuse@example.ro'

aut-num:        AS9009
as-name:        M247
descr:          M247 Ltd
descr:          Second description line
import:         from AS701, accept ANY
import:         from AS174; accept ANY
export:         to AS701 announce AS-M247
export:         to AS9009 announce AS-M247
org:            ORG-MA1
status:         ASSIGNED
country:        RO

organisation:   ORG-MA1
org-name:       M247 Europe SRL
";

    #[test]
    fn test_parse_ripe_record() {
        let info = parse_asn_info("AS9009", RIPE_RECORD).unwrap();

        assert_eq!(info.number, "AS9009");
        assert_eq!(info.name, "M247");
        assert_eq!(info.description, "M247 Ltd");
        assert_eq!(info.organization, "M247 Europe SRL");
        assert_eq!(info.country, "RO");
        assert_eq!(info.status, "ASSIGNED");
        assert_eq!(info.abuse_contact, "abuse@example.ro");
        assert_eq!(info.peers, vec!["AS701", "AS174", "AS-M247"]);
    }

    #[test]
    fn test_query_used_as_default_number() {
        let info = parse_asn_info("AS64500", "ASName: EXAMPLE-NET\n").unwrap();
        assert_eq!(info.number, "AS64500");
        assert_eq!(info.name, "EXAMPLE-NET");
    }

    #[test]
    fn test_empty_response_has_no_info() {
        assert!(parse_asn_info("AS1", "").is_none());
    }

    #[test]
    fn test_arin_fallbacks() {
        let raw = "\
ASNumber:       15169
ASName:         GOOGLE
OrgAbuseEmail:  network-abuse@google.com
";
        let info = parse_asn_info("AS15169", raw).unwrap();
        assert_eq!(info.number, "15169");
        assert_eq!(info.abuse_contact, "network-abuse@google.com");
        assert_eq!(info.status, "active");
        assert!(info.organization.is_empty());
    }

    #[test]
    fn test_description_becomes_organization() {
        let info = parse_asn_info("AS1", "descr: Level 3 Parent\n").unwrap();
        assert_eq!(info.organization, "Level 3 Parent");
        assert_eq!(info.status, "active");
    }

    #[test]
    fn test_no_identifying_data_keeps_status_empty() {
        let info = parse_asn_info("AS1", "% nothing useful\n").unwrap();
        assert!(info.status.is_empty());
    }

    #[test]
    fn test_fill_from_rdap_autnum() {
        let object = RdapObject::from_value(&json!({
            "objectClassName": "autnum",
            "handle": "AS15169",
            "startAutnum": 15169,
            "name": "GOOGLE",
            "country": "US",
            "status": ["active"],
            "entities": [{
                "roles": ["registrant"],
                "vcardArray": ["vcard", [["fn", {}, "text", "Google LLC"]]],
                "entities": [{
                    "roles": ["abuse"],
                    "vcardArray": ["vcard", [["email", {}, "text", "network-abuse@google.com"]]]
                }]
            }]
        }));

        let mut info = scan_asn_text("as15169", "{}").unwrap();
        fill_from_rdap(&mut info, "as15169", &object);
        finalize(&mut info);

        assert_eq!(info.number, "AS15169");
        assert_eq!(info.name, "GOOGLE");
        assert_eq!(info.country, "US");
        assert_eq!(info.status, "active");
        assert_eq!(info.organization, "Google LLC");
        assert_eq!(info.abuse_contact, "network-abuse@google.com");
    }

    #[test]
    fn test_fill_keeps_scanned_values() {
        let object = RdapObject::from_value(&json!({"name": "OTHER", "startAutnum": 9009}));
        let mut info = scan_asn_text("AS9009", RIPE_RECORD).unwrap();
        fill_from_rdap(&mut info, "AS9009", &object);

        assert_eq!(info.name, "M247");
        assert_eq!(info.number, "AS9009");
    }
}
