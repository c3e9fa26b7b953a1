//! Registration lifecycle: relative dates and post-expiration guidance.
//!
//! Every function takes the current instant explicitly so results are
//! reproducible; nothing in here reads the clock.

use crate::error::RegardError;
use crate::types::{ExpirationInfo, Summary, TimelineEvent};
use crate::utils::extract_tld;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Days before expiry at which guidance starts being offered.
const WATCH_WINDOW_DAYS: i64 = 30;

/// Days after expiry at which a gTLD name completes deletion.
const GTLD_DELETE_DAYS: i64 = 80;

/// Describe `date` relative to `now` ("today", "in 3 months", "2 years ago").
///
/// Whole days are truncated, months are 30 days and years are 365 days.
/// The plural unit is used for every magnitude, so 400 days ahead reads
/// "in 1 years".
pub fn human_readable_time(date: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if date > now {
        let days = (date - now).num_days();
        match days {
            0 => "today".to_string(),
            1 => "tomorrow".to_string(),
            2..=29 => format!("in {} days", days),
            30..=364 => format!("in {} months", days / 30),
            _ => format!("in {} years", days / 365),
        }
    } else {
        let days = (now - date).num_days();
        match days {
            0 => "today".to_string(),
            1 => "yesterday".to_string(),
            2..=29 => format!("{} days ago", days),
            30..=364 => format!("{} months ago", days / 30),
            _ => format!("{} years ago", days / 365),
        }
    }
}

/// Timeline entry for `date` with its relative description frozen at `now`.
pub fn timeline_event(date: DateTime<Utc>, now: DateTime<Utc>) -> TimelineEvent {
    TimelineEvent {
        date,
        human_readable: human_readable_time(date, now),
    }
}

/// Parse a WHOIS date field.
///
/// Formats are tried in order: RFC 3339, `2006-01-02T15:04:05Z`, bare date,
/// space-separated date-time, `02-Jan-2006`, `2006/01/02`. Forms without an
/// offset are taken as UTC.
pub fn parse_whois_date(value: &str) -> Result<DateTime<Utc>, RegardError> {
    let trimmed = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(date.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%SZ") {
        return Ok(date.and_utc());
    }

    for format in ["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%d-%b-%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(date.and_utc());
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(midnight.and_utc());
            }
        }
    }

    Err(RegardError::parse(format!("unable to parse date: {}", value)))
}

/// Produce acquisition guidance for a summary whose expiration is known.
///
/// Returns `None` when there is no expiration event or the domain expires
/// more than 30 days after `now`.
pub fn generate_post_expiration_guidance(
    summary: &Summary,
    now: DateTime<Utc>,
) -> Option<ExpirationInfo> {
    let expiry = summary.timeline.expiration.as_ref()?.date;

    if expiry > now + Duration::days(WATCH_WINDOW_DAYS) {
        return None;
    }

    if expiry > now {
        let days_left = (expiry - now).num_days();
        let guidance_message = if days_left <= 7 {
            format!(
                "Domain expires in {} days. Monitor closely - it may become available if not renewed.",
                days_left
            )
        } else {
            format!(
                "Domain expires in {} days. Add to your watchlist if interested.",
                days_left
            )
        };

        return Some(ExpirationInfo {
            days_expired: 0,
            available_date: None,
            guidance_message,
        });
    }

    let days_expired = (now - expiry).num_days();
    let tld = extract_tld(&summary.domain).to_lowercase();

    let (guidance_message, available_date) = match tld.as_str() {
        "com" | "net" | "org" => gtld_guidance(expiry, days_expired),
        "uk" | "co.uk" => {
            if days_expired <= 90 {
                (
                    "Domain is in renewal grace period (.uk domains have 90-day grace period). Original owner can still renew.".to_string(),
                    None,
                )
            } else {
                (
                    "Domain has passed the renewal grace period and should be available for public registration.".to_string(),
                    None,
                )
            }
        }
        _ => {
            if days_expired <= 30 {
                (
                    "Domain may still be in renewal grace period. Original owner might still renew.".to_string(),
                    None,
                )
            } else {
                (
                    "Domain is likely available for registration. Check with registrars or domain drop services.".to_string(),
                    None,
                )
            }
        }
    };

    Some(ExpirationInfo {
        days_expired,
        available_date,
        guidance_message,
    })
}

/// Standard gTLD drop cycle: 30 days renewal grace, redemption until day 75,
/// pending delete until day 80.
fn gtld_guidance(expiry: DateTime<Utc>, days_expired: i64) -> (String, Option<DateTime<Utc>>) {
    match days_expired {
        ..=30 => (
            "Domain is in renewal grace period. Original owner can still renew. Not yet available for registration.".to_string(),
            None,
        ),
        31..=75 => (
            "Domain is in redemption grace period. Original owner can still recover it with fees. Not available for public registration yet.".to_string(),
            None,
        ),
        _ if days_expired < GTLD_DELETE_DAYS => (
            format!(
                "Domain is pending deletion! It will drop and become available for registration in approximately {} days.",
                GTLD_DELETE_DAYS - days_expired
            ),
            Some(expiry + Duration::days(GTLD_DELETE_DAYS)),
        ),
        _ => (
            "Domain has completed the deletion process and should be available for registration at any registrar.".to_string(),
            None,
        ),
    }
}
