//! Registration status interpretation.

use crate::types::SummaryStatus;

/// Phrases registries use in place of a record when nothing is registered.
const NOT_FOUND_MARKERS: [&str; 5] = [
    "not found",
    "no match",
    "no data found",
    "domain not found",
    "available for registration",
];

/// Raw responses shorter than this with no status tokens are terse denials.
const TERSE_RESPONSE_LEN: usize = 100;

/// Classify registration state from status tokens, using the raw response
/// text as a secondary signal.
///
/// The first matching rule wins:
/// 1. a not-found phrase anywhere in the raw text means available;
/// 2. with no tokens, a terse or "no entries found" response means available;
/// 3. any token mentioning `active`, `ok` or `prohibited` means active.
///
/// Protective locks such as `clientTransferProhibited` only appear on held
/// names, so they count as active.
pub fn interpret_status(status_details: &[String], raw: &str) -> SummaryStatus {
    let raw_lower = raw.to_lowercase();

    if NOT_FOUND_MARKERS
        .iter()
        .any(|marker| raw_lower.contains(marker))
    {
        return SummaryStatus::Available;
    }

    if status_details.is_empty() {
        let terse = raw.trim().len() < TERSE_RESPONSE_LEN;
        if !raw.is_empty() && (raw_lower.contains("no entries found") || terse) {
            return SummaryStatus::Available;
        }
        return SummaryStatus::Unknown;
    }

    let held = status_details.iter().any(|status| {
        let status = status.to_lowercase();
        status.contains("active") || status.contains("ok") || status.contains("prohibited")
    });

    if held {
        SummaryStatus::Active
    } else {
        SummaryStatus::Unknown
    }
}
