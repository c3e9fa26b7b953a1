//! Terminal rendering of a `Summary`.
//!
//! Rendering builds a `String` so the layout can be tested without a
//! terminal; `print_summary` is the only part that touches stdout.

use chrono::{DateTime, Duration, Utc};
use console::{measure_text_width, Style, Term};
use regard_lib::{QueryType, Summary, SummaryStatus, TimelineEvent};
use std::fmt::Write;

const FALLBACK_WIDTH: usize = 80;
const MAX_PEERS: usize = 10;

/// Print a summary to stdout using the current terminal width.
pub fn print_summary(summary: &Summary, color: bool) {
    let width = Term::stdout()
        .size_checked()
        .map(|(_, cols)| cols as usize)
        .unwrap_or(FALLBACK_WIDTH);
    print!("{}", render_summary(summary, Utc::now(), width, color));
}

// ── Styles ───────────────────────────────────────────────────────────────────

struct Palette {
    bold: Style,
    green: Style,
    yellow: Style,
    red: Style,
    blue: Style,
    headline: Style,
}

impl Palette {
    fn new(color: bool) -> Self {
        let base = || Style::new().force_styling(color);
        Self {
            bold: base().bold(),
            green: base().green(),
            yellow: base().yellow(),
            red: base().red(),
            blue: base().blue(),
            headline: base().green().bold(),
        }
    }
}

// ── Layout ───────────────────────────────────────────────────────────────────

/// Render the full terminal layout for `summary`.
///
/// `now` decides expiry coloring; `width` is the terminal width used to push
/// the protocol name to the right edge of the header.
pub fn render_summary(summary: &Summary, now: DateTime<Utc>, width: usize, color: bool) -> String {
    let p = Palette::new(color);
    let mut out = String::new();

    render_header(&mut out, summary, width, &p);

    if summary.status == SummaryStatus::Available {
        let _ = writeln!(
            out,
            "\n🎉 {}",
            p.green.apply_to("This domain appears to be available for registration!")
        );
        return out;
    }

    render_timeline(&mut out, summary, now, &p);

    if !summary.nameservers.is_empty() {
        let _ = writeln!(out, "\n{}", p.bold.apply_to("Nameservers:"));
        for nameserver in &summary.nameservers {
            let _ = writeln!(out, "  • {}", nameserver);
        }
    }

    if summary.query_type == Some(QueryType::Domain) {
        let _ = write!(out, "\n{} ", p.bold.apply_to("DNSSEC:"));
        if summary.dnssec.enabled {
            let _ = write!(out, "{}", p.green.apply_to("enabled"));
            if let Some(details) = summary.dnssec.details.as_deref().filter(|d| !d.is_empty()) {
                let _ = write!(out, " ({})", details);
            }
        } else {
            let _ = write!(out, "{}", p.red.apply_to("disabled"));
        }
        out.push('\n');
    }

    if !summary.registrar.name.is_empty() {
        let _ = write!(out, "\n{} {}", p.bold.apply_to("Registrar:"), summary.registrar.name);
        if let Some(id) = summary.registrar.id.as_deref().filter(|id| !id.is_empty()) {
            let _ = write!(out, " (ID: {})", id);
        }
        out.push('\n');
    }

    render_asn(&mut out, summary, &p);

    if !summary.status_details.is_empty() {
        let _ = writeln!(out, "\n{}", p.bold.apply_to("Status details:"));
        for status in &summary.status_details {
            let _ = writeln!(out, "  • {}", status);
        }
    }

    if let Some(guidance) = &summary.post_expiration {
        let _ = writeln!(out, "\n{}", p.bold.apply_to("Post-expiration guidance:"));
        let _ = writeln!(out, "  {}", guidance.guidance_message);
    }

    out
}

fn render_header(out: &mut String, summary: &Summary, width: usize, p: &Palette) {
    let (status_text, status_style) = match &summary.status {
        SummaryStatus::Available => ("AVAILABLE".to_string(), &p.headline),
        SummaryStatus::Unknown => (summary.status.to_string(), &p.yellow),
        SummaryStatus::Registry(s) if s.eq_ignore_ascii_case("expired") => (s.clone(), &p.red),
        other => (other.to_string(), &p.green),
    };

    let protocol = summary.protocol.to_string();
    let plain_len = measure_text_width(&summary.domain) + 1 + measure_text_width(&status_text);
    let padding = width
        .saturating_sub(plain_len + protocol.len() + 1)
        .max(1);

    let _ = writeln!(
        out,
        "{} {}{}{}",
        p.bold.apply_to(&summary.domain),
        status_style.apply_to(status_text),
        " ".repeat(padding),
        protocol
    );
}

fn render_timeline(out: &mut String, summary: &Summary, now: DateTime<Utc>, p: &Palette) {
    let timeline = &summary.timeline;
    if timeline.is_empty() {
        return;
    }

    let _ = writeln!(out, "\n{}", p.bold.apply_to("Timeline:"));

    if let Some(event) = &timeline.registration {
        timeline_line(out, "Registered", event, &p.blue, p);
    }
    if let Some(event) = &timeline.last_updated {
        timeline_line(out, "Last updated", event, &p.blue, p);
    }
    if let Some(event) = &timeline.expiration {
        let style = if event.date < now {
            &p.red
        } else if event.date < now + Duration::days(30) {
            &p.yellow
        } else {
            &p.green
        };
        timeline_line(out, "Expires", event, style, p);
    }
}

fn timeline_line(out: &mut String, label: &str, event: &TimelineEvent, style: &Style, p: &Palette) {
    let _ = writeln!(
        out,
        "  • {}: {} ({})",
        p.bold.apply_to(label),
        event.date.format("%Y-%m-%d"),
        style.apply_to(&event.human_readable)
    );
}

fn render_asn(out: &mut String, summary: &Summary, p: &Palette) {
    let Some(asn) = &summary.asn else {
        return;
    };

    let _ = write!(out, "\n{} {}", p.bold.apply_to("Organization:"), asn.organization);
    if !asn.country.is_empty() {
        let _ = write!(out, " ({})", asn.country);
    }
    out.push('\n');

    if !asn.name.is_empty() {
        let _ = writeln!(out, "{} {}", p.bold.apply_to("AS Name:"), asn.name);
    }
    if !asn.abuse_contact.is_empty() {
        let _ = writeln!(out, "{} {}", p.bold.apply_to("Abuse Contact:"), asn.abuse_contact);
    }

    if !asn.peers.is_empty() {
        let _ = writeln!(out, "\n{}", p.bold.apply_to("Key Peers:"));
        for peer in asn.peers.iter().take(MAX_PEERS) {
            let _ = writeln!(out, "  • {}", peer);
        }
        if asn.peers.len() > MAX_PEERS {
            let _ = writeln!(out, "  ... and {} more", asn.peers.len() - MAX_PEERS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use regard_lib::{
        create_summary_at, AsnInfo, Protocol, QueryData, QueryResult, WhoisRecord,
    };

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn whois_summary(query: &str, raw: &str) -> Summary {
        let result = QueryResult::success(
            query,
            regard_lib::detect_query_type(query),
            Protocol::Whois,
            QueryData::Whois(WhoisRecord::parse(raw)),
            raw.to_string(),
        );
        create_summary_at(&result, fixed_now())
    }

    #[test]
    fn test_header_pads_protocol_to_width() {
        let summary = Summary::new("example.com", Protocol::Rdap, QueryType::Domain);
        let out = render_summary(&summary, fixed_now(), 40, false);
        let header = out.lines().next().unwrap();

        assert!(header.starts_with("example.com unknown"));
        assert!(header.ends_with("RDAP"));
        assert_eq!(header.len(), 39);
    }

    #[test]
    fn test_header_on_narrow_terminal_keeps_one_space() {
        let summary = Summary::new("a-very-long-domain-name.example", Protocol::Whois, QueryType::Domain);
        let out = render_summary(&summary, fixed_now(), 10, false);
        assert!(out.starts_with("a-very-long-domain-name.example unknown WHOIS\n"));
    }

    #[test]
    fn test_available_domain_stops_after_celebration() {
        let summary = whois_summary("free-example.com", "No match for \"FREE-EXAMPLE.COM\".\n");
        let out = render_summary(&summary, fixed_now(), 80, false);

        assert!(out.contains("AVAILABLE"));
        assert!(out.contains("available for registration!"));
        assert!(!out.contains("DNSSEC"));
        assert_eq!(out.lines().filter(|l| !l.is_empty()).count(), 2);
    }

    #[test]
    fn test_domain_sections() {
        let raw = "\
Domain Name: EXAMPLE.COM
Creation Date: 1995-08-14T04:00:00Z
Registry Expiry Date: 2025-06-10T04:00:00Z
Registrar: Example Registrar, Inc.
Registrar IANA ID: 376
Domain Status: clientTransferProhibited
Name Server: A.IANA-SERVERS.NET
";
        let out = render_summary(&whois_summary("example.com", raw), fixed_now(), 80, false);

        assert!(out.contains("Timeline:"));
        assert!(out.contains("  • Registered: 1995-08-14 (29 years ago)"));
        assert!(out.contains("  • Expires: 2025-06-10 (5 days ago)"));
        assert!(out.contains("Nameservers:\n  • A.IANA-SERVERS.NET"));
        assert!(out.contains("DNSSEC: disabled"));
        assert!(out.contains("Registrar: Example Registrar, Inc. (ID: 376)"));
        assert!(out.contains("Status details:\n  • clientTransferProhibited"));
        assert!(out.contains("Post-expiration guidance:\n  Domain is in renewal grace period."));
    }

    #[test]
    fn test_asn_block_truncates_peers() {
        let mut summary = Summary::new("AS64500", Protocol::Whois, QueryType::Asn);
        summary.status = SummaryStatus::Registry("ASSIGNED".to_string());
        summary.asn = Some(AsnInfo {
            number: "AS64500".to_string(),
            name: "EXAMPLE-NET".to_string(),
            organization: "Example Networks".to_string(),
            country: "NL".to_string(),
            abuse_contact: "abuse@example.net".to_string(),
            peers: (1..=13).map(|n| format!("AS{}", 64500 + n)).collect(),
            ..AsnInfo::default()
        });

        let out = render_summary(&summary, fixed_now(), 80, false);

        assert!(out.starts_with("AS64500 ASSIGNED"));
        assert!(!out.contains("DNSSEC"));
        assert!(out.contains("Organization: Example Networks (NL)"));
        assert!(out.contains("AS Name: EXAMPLE-NET"));
        assert!(out.contains("Abuse Contact: abuse@example.net"));
        assert!(out.contains("  • AS64510\n"));
        assert!(!out.contains("AS64511"));
        assert!(out.contains("  ... and 3 more"));
    }

    #[test]
    fn test_color_only_when_requested() {
        let summary = whois_summary("example.com", "Domain Status: ok\n");
        let plain = render_summary(&summary, fixed_now(), 80, false);
        let colored = render_summary(&summary, fixed_now(), 80, true);

        assert!(!plain.contains('\u{1b}'));
        assert!(colored.contains('\u{1b}'));
        assert_eq!(console::strip_ansi_codes(&colored), plain);
    }
}
