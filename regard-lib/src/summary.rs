//! Summary assembly: one `QueryResult` in, one `Summary` out.
//!
//! Assembly is total. Missing or malformed payload pieces leave the
//! corresponding summary fields empty.

use crate::asn;
use crate::lifecycle::{generate_post_expiration_guidance, parse_whois_date, timeline_event};
use crate::protocols::rdap::RdapObject;
use crate::protocols::whois::WhoisRecord;
use crate::status::interpret_status;
use crate::types::{
    AsnInfo, DnssecInfo, Protocol, QueryData, QueryResult, QueryType, Summary, SummaryStatus, TimelineEvent,
};
use chrono::{DateTime, Utc};
use tracing::debug;

const REGISTRATION_KEYS: &[&str] = &["creation_date", "created", "registered"];

const UPDATED_KEYS: &[&str] = &["updated_date", "last_updated", "changed", "last_modified"];

const EXPIRATION_KEYS: &[&str] = &[
    "registry_expiry_date",
    "registrar_registration_expiration_date",
    "expiry_date",
    "expiration_date",
    "paid-till",
];

/// Build a summary using the current wall-clock time.
pub fn create_summary(result: &QueryResult) -> Summary {
    create_summary_at(result, Utc::now())
}

/// Build a summary with relative dates and guidance computed against `now`.
pub fn create_summary_at(result: &QueryResult, now: DateTime<Utc>) -> Summary {
    let mut summary = Summary::new(result.query.as_str(), result.protocol, result.query_type);

    let rdap = match (&result.protocol, &result.data) {
        (Protocol::Rdap, Some(QueryData::Rdap(document))) => {
            let object = RdapObject::from_value(document);
            apply_rdap(&mut summary, &object, now);
            Some(object)
        }
        (Protocol::Whois, Some(QueryData::Whois(record))) => {
            apply_whois(&mut summary, record, now);
            None
        }
        (Protocol::Whois, None) if !result.raw_data.is_empty() => {
            apply_whois(&mut summary, &WhoisRecord::parse(&result.raw_data), now);
            None
        }
        _ => None,
    };

    summary.status = interpret_status(&summary.status_details, &result.raw_data);

    if result.query_type == QueryType::Asn {
        let mut info = asn::scan_asn_text(&result.query, &result.raw_data);
        if let Some(object) = &rdap {
            let info = info.get_or_insert_with(|| AsnInfo {
                number: result.query.clone(),
                ..AsnInfo::default()
            });
            asn::fill_from_rdap(info, &result.query, object);
        }
        if let Some(info) = info.as_mut() {
            asn::finalize(info);
            if !info.status.is_empty() {
                summary.status = SummaryStatus::from(info.status.clone());
            }
        }
        summary.asn = info;
    }

    if summary.timeline.expiration.is_some() {
        summary.post_expiration = generate_post_expiration_guidance(&summary, now);
    }

    summary
}

fn apply_rdap(summary: &mut Summary, object: &RdapObject, now: DateTime<Utc>) {
    summary.status_details = object.status.clone();

    for nameserver in &object.nameservers {
        if let Some(name) = nameserver.ldh_name.as_deref() {
            push_unique(&mut summary.nameservers, name);
        }
    }

    if object.delegation_signed() {
        summary.dnssec = DnssecInfo {
            enabled: true,
            details: Some("Delegation signed".to_string()),
        };
    }

    for event in &object.events {
        let date = match DateTime::parse_from_rfc3339(&event.event_date) {
            Ok(date) => date.with_timezone(&Utc),
            Err(e) => {
                debug!(action = %event.event_action, date = %event.event_date, error = %e, "dropping RDAP event with unparsable date");
                continue;
            }
        };

        let slot = match event.event_action.as_str() {
            "registration" => &mut summary.timeline.registration,
            "last changed" | "last update of RDAP database" => &mut summary.timeline.last_updated,
            "expiration" => &mut summary.timeline.expiration,
            other => {
                debug!(action = other, "ignoring RDAP event");
                continue;
            }
        };
        *slot = Some(timeline_event(date, now));
    }

    if let Some(registrar) = object.registrar() {
        if let Some(name) = registrar.full_name() {
            summary.registrar.name = name.to_string();
        }
        summary.registrar.id = registrar.handle.clone();
    }
}

fn apply_whois(summary: &mut Summary, record: &WhoisRecord, now: DateTime<Utc>) {
    summary.status_details = record.status_tokens();
    summary.nameservers = record.nameservers();

    if let Some(value) = record.get("dnssec") {
        summary.dnssec = DnssecInfo {
            enabled: value.eq_ignore_ascii_case("signedDelegation"),
            details: Some(value.to_string()),
        };
    }

    summary.timeline.registration = whois_event(record, REGISTRATION_KEYS, now);
    summary.timeline.last_updated = whois_event(record, UPDATED_KEYS, now);
    summary.timeline.expiration = whois_event(record, EXPIRATION_KEYS, now);

    if let Some(name) = record.get("registrar") {
        summary.registrar.name = name.to_string();
    }
    summary.registrar.id = record.get("registrar_iana_id").map(str::to_string);
}

fn whois_event(record: &WhoisRecord, keys: &[&str], now: DateTime<Utc>) -> Option<TimelineEvent> {
    let value = record.first_of(keys)?;
    match parse_whois_date(value) {
        Ok(date) => Some(timeline_event(date, now)),
        Err(e) => {
            debug!(error = %e, "dropping WHOIS date");
            None
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
