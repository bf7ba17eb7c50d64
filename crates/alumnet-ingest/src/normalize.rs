//! Field normalization for raw export cells
//!
//! The legacy exports mark absent data with the literal token `Missing`, and
//! write calendar dates as `D-MMM-YYYY` (e.g. `20-Jan-1962`). Everything here
//! is a pure transform: unparseable input becomes `None`, never an error.
//! That leniency is deliberate — the exports predate any validation, and a
//! hard failure on one bad date would lose the rest of the row.

use chrono::NaiveDate;

/// Token the source exports use for "field intentionally left blank".
pub const SENTINEL: &str = "Missing";

/// English three-letter month abbreviations, in the exact casing the exports
/// were authored with. Matching is case-sensitive on purpose.
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Normalize an optional free-text cell.
///
/// Returns `None` for empty, whitespace-only, or sentinel input; otherwise
/// the trimmed text.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == SENTINEL {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a `D-MMM-YYYY` cell into a calendar date.
///
/// Accepts a 1-2 digit day, a case-sensitive English month abbreviation, and
/// a 4-digit year. Anything else — the sentinel, empty input, an unknown
/// month, an impossible day — yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == SENTINEL {
        return None;
    }

    let mut parts = trimmed.split('-');
    let day = parts.next()?;
    let month = parts.next()?;
    let year = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    if day.is_empty() || day.len() > 2 || !day.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Extract the calendar year from a normalized date.
pub fn derive_year(date: Option<NaiveDate>) -> Option<i32> {
    use chrono::Datelike;
    date.map(|d| d.year())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_text_trims() {
        assert_eq!(optional_text("  Ibadan  "), Some("Ibadan".to_string()));
    }

    #[test]
    fn test_optional_text_absent_inputs() {
        assert_eq!(optional_text(""), None);
        assert_eq!(optional_text("   "), None);
        assert_eq!(optional_text("Missing"), None);
        assert_eq!(optional_text("  Missing  "), None);
    }

    #[test]
    fn test_optional_text_sentinel_is_case_sensitive() {
        // "missing" is someone's actual data; only the exact token is absent.
        assert_eq!(optional_text("missing"), Some("missing".to_string()));
    }

    #[test]
    fn test_parse_date_zero_pads() {
        assert_eq!(
            parse_date("20-Jan-1962"),
            NaiveDate::from_ymd_opt(1962, 1, 20)
        );
        assert_eq!(
            parse_date("5-Sep-1947"),
            NaiveDate::from_ymd_opt(1947, 9, 5)
        );
        assert_eq!(
            parse_date("1-Mar-1990").unwrap().to_string(),
            "1990-03-01"
        );
    }

    #[test]
    fn test_parse_date_all_months() {
        for (i, month) in MONTHS.iter().enumerate() {
            let raw = format!("15-{month}-2000");
            assert_eq!(
                parse_date(&raw),
                NaiveDate::from_ymd_opt(2000, i as u32 + 1, 15),
                "month {month} should parse"
            );
        }
    }

    #[test]
    fn test_parse_date_lenient_on_bad_input() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("Missing"), None);
        assert_eq!(parse_date("1962-01-20"), None);
        assert_eq!(parse_date("20/Jan/1962"), None);
        assert_eq!(parse_date("20-January-1962"), None);
        // Lowercase month abbreviations never appear in the exports.
        assert_eq!(parse_date("20-jan-1962"), None);
        // Calendar-impossible day.
        assert_eq!(parse_date("31-Feb-1962"), None);
        // Two-digit year.
        assert_eq!(parse_date("20-Jan-62"), None);
        // Trailing segment.
        assert_eq!(parse_date("20-Jan-1962-extra"), None);
        // Three-digit day.
        assert_eq!(parse_date("123-Jan-1962"), None);
    }

    #[test]
    fn test_derive_year() {
        assert_eq!(derive_year(NaiveDate::from_ymd_opt(1962, 1, 20)), Some(1962));
        assert_eq!(derive_year(None), None);
    }
}
