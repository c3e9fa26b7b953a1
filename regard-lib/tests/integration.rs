// regard-lib/tests/integration.rs

//! Integration tests for regard-lib exports and the summary pipeline

use chrono::{DateTime, Duration, TimeZone, Utc};
use regard_lib::{
    create_summary_at, detect_query_type, extract_tld, generate_post_expiration_guidance,
    human_readable_time, interpret_status, parse_asn_info, Lookup, LookupConfig, Protocol,
    ProtocolPreference, QueryData, QueryResult, QueryType, SummaryStatus, WhoisRecord,
};
use serde_json::json;

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

fn expired_whois(domain: &str, days_ago: i64) -> QueryResult {
    let expiry = (fixed_now() - Duration::days(days_ago)).format("%Y-%m-%dT%H:%M:%SZ");
    let raw = format!(
        "Domain Name: {}\nRegistry Expiry Date: {}\nDomain Status: clientTransferProhibited\n",
        domain.to_uppercase(),
        expiry
    );
    QueryResult::success(
        domain,
        detect_query_type(domain),
        Protocol::Whois,
        QueryData::Whois(WhoisRecord::parse(&raw)),
        raw,
    )
}

#[test]
fn test_library_exports_work() {
    assert_eq!(detect_query_type("example.com"), QueryType::Domain);
    assert_eq!(detect_query_type("1.1.1.1"), QueryType::Ip);
    assert_eq!(detect_query_type("AS13335"), QueryType::Asn);
    assert_eq!(extract_tld("example.co.uk"), "co.uk");
    assert_eq!(interpret_status(&[], ""), SummaryStatus::Unknown);
    assert_eq!(human_readable_time(fixed_now(), fixed_now()), "today");
}

#[test]
fn test_hold_status_alone_is_unknown() {
    let raw = "Domain Name: EXAMPLE.COM\nDomain Status: clientHold\n";
    let result = QueryResult::success(
        "example.com",
        QueryType::Domain,
        Protocol::Whois,
        QueryData::Whois(WhoisRecord::parse(raw)),
        raw.to_string(),
    );

    let summary = create_summary_at(&result, fixed_now());
    assert_eq!(summary.status_details, vec!["clientHold"]);
    assert_eq!(summary.status, SummaryStatus::Unknown);
}

#[test]
fn test_guidance_through_summary() {
    let cases = [
        ("example.com", 5, "renewal grace period"),
        ("example.com", 50, "redemption grace period"),
        ("example.com", 78, "pending deletion"),
        ("example.com", 85, "completed the deletion process"),
        ("example.co.uk", 50, "90-day grace period"),
        ("example.co.uk", 100, "available for public registration"),
        ("example.io", 10, "may still be in renewal grace period"),
    ];

    for (domain, days_ago, expected) in cases {
        let summary = create_summary_at(&expired_whois(domain, days_ago), fixed_now());
        let guidance = summary
            .post_expiration
            .unwrap_or_else(|| panic!("no guidance for {} at -{}d", domain, days_ago));
        assert!(
            guidance.guidance_message.contains(expected),
            "{} at -{}d: {}",
            domain,
            days_ago,
            guidance.guidance_message
        );
    }
}

#[test]
fn test_guidance_is_recomputed_from_timeline() {
    let summary = create_summary_at(&expired_whois("example.org", 78), fixed_now());
    let stored = summary.post_expiration.clone().unwrap();

    let recomputed = generate_post_expiration_guidance(&summary, fixed_now()).unwrap();
    assert_eq!(stored, recomputed);

    let expiry = summary.timeline.expiration.as_ref().unwrap().date;
    assert_eq!(stored.available_date, Some(expiry + Duration::days(80)));
}

#[test]
fn test_summary_json_shape() {
    let summary = create_summary_at(&expired_whois("example.com", 5), fixed_now());
    let value = serde_json::to_value(&summary).unwrap();

    assert_eq!(value["domain"], "example.com");
    assert_eq!(value["protocol"], "WHOIS");
    assert_eq!(value["query_type"], "domain");
    assert_eq!(value["status"], "active");
    assert_eq!(value["status_details"], json!(["clientTransferProhibited"]));
    assert_eq!(value["timeline"]["expiration"]["human_readable"], "5 days ago");
    assert_eq!(value["post_expiration"]["days_expired"], 5);
    assert!(value["post_expiration"].get("available_date").is_none());
    assert_eq!(value["dnssec"], json!({"enabled": false}));
    assert_eq!(value["registrar"], json!({"name": ""}));
    assert!(value.get("asn").is_none());
}

#[test]
fn test_query_result_round_trips_through_json() {
    let result = expired_whois("example.com", 5);
    let text = serde_json::to_string(&result).unwrap();
    let back: QueryResult = serde_json::from_str(&text).unwrap();

    assert_eq!(back.query, "example.com");
    assert_eq!(back.protocol, Protocol::Whois);
    assert!(matches!(back.data, Some(QueryData::Whois(_))));

    let rdap = QueryResult::success(
        "example.com",
        QueryType::Domain,
        Protocol::Rdap,
        QueryData::Rdap(json!({"ldhName": "EXAMPLE.COM"})),
        String::new(),
    );
    let back: QueryResult = serde_json::from_value(serde_json::to_value(&rdap).unwrap()).unwrap();
    assert!(matches!(back.data, Some(QueryData::Rdap(_))));
}

#[test]
fn test_asn_parser_export() {
    let raw = "aut-num: AS9009\nimport: from AS701, accept ANY\n% Abuse contact for 'AS9009' is 'abuse@example.ro'\n";
    let info = parse_asn_info("AS9009", raw).unwrap();
    assert_eq!(info.number, "AS9009");
    assert_eq!(info.peers, vec!["AS701"]);
    assert_eq!(info.abuse_contact, "abuse@example.ro");
}

#[test]
fn test_lookup_rejects_empty_query() {
    let lookup = Lookup::new(LookupConfig::default().with_preference(ProtocolPreference::Whois))
        .unwrap();
    let result = tokio_test::block_on(lookup.query(""));
    assert!(result.is_err());
}
