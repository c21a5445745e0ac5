//! core::time
//!
//! Time parameters for `--from` / `--to` style flags.
//!
//! # Accepted Forms
//!
//! - `now` (case-insensitive)
//! - A bare integer, taken as unix milliseconds
//! - A relative offset into the past: `30m`, `-2h`, `5 minutes`, `1week`
//! - RFC3339: `2024-01-01T00:00:00Z`
//!
//! Relative offsets are second-aligned: the result is always a whole
//! number of seconds expressed in milliseconds.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from time parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error(
        "unable to parse time: {0:?}\nExpected: now, 1h, 30m, 7d, 5minutes, RFC3339, or Unix timestamp"
    )]
    Unparseable(String),
}

/// Parse a time parameter into unix milliseconds relative to the current time.
pub fn parse_time_millis(input: &str) -> Result<i64, TimeError> {
    parse_time_millis_at(input, Utc::now())
}

/// Parse a time parameter into unix seconds.
pub fn parse_time_secs(input: &str) -> Result<i64, TimeError> {
    Ok(parse_time_millis(input)? / 1000)
}

/// Parse a time parameter into an RFC3339 UTC timestamp.
///
/// Used by the v2 search endpoints, which take ISO timestamps in filters.
pub fn parse_time_rfc3339(input: &str) -> Result<String, TimeError> {
    let millis = parse_time_millis(input)?;
    millis_to_rfc3339(millis).ok_or_else(|| TimeError::Unparseable(input.trim().to_string()))
}

/// Format unix milliseconds as RFC3339 with second precision.
pub fn millis_to_rfc3339(millis: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
}

/// Parse a time parameter against an explicit "now".
pub fn parse_time_millis_at(input: &str, now: DateTime<Utc>) -> Result<i64, TimeError> {
    let trimmed = input.trim();
    let unparseable = || TimeError::Unparseable(trimmed.to_string());
    let now_secs = now.timestamp();

    if trimmed.eq_ignore_ascii_case("now") {
        return Ok(now_secs * 1000);
    }

    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return trimmed.parse().map_err(|_| unparseable());
    }

    if trimmed.contains('T') {
        return DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .and_then(|dt| dt.timestamp().checked_mul(1000))
            .ok_or_else(unparseable);
    }

    let offset = relative_seconds(trimmed).ok_or_else(unparseable)?;
    now_secs
        .checked_sub(offset)
        .and_then(|secs| secs.checked_mul(1000))
        .ok_or_else(unparseable)
}

/// `N<unit>` with an optional leading `-` and optional spaces.
fn relative_seconds(input: &str) -> Option<i64> {
    let body = input.trim_start_matches('-').trim();
    let digits_end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    if digits_end == 0 {
        return None;
    }

    let amount: i64 = body[..digits_end].parse().ok()?;
    let unit = body[digits_end..].trim().to_ascii_lowercase();
    let per_unit = match unit.as_str() {
        "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 7 * 86_400,
        _ => return None,
    };
    amount.checked_mul(per_unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn parse(input: &str) -> Result<i64, TimeError> {
        parse_time_millis_at(input, fixed_now())
    }

    const NOW_MS: i64 = 1_717_243_200_000;

    #[test]
    fn rfc3339_rendering() {
        assert_eq!(
            millis_to_rfc3339(NOW_MS).as_deref(),
            Some("2024-06-01T12:00:00Z")
        );
        assert!(parse_time_rfc3339("soon").is_err());
        assert!(parse_time_rfc3339("1h").unwrap().ends_with('Z'));
    }

    #[test]
    fn now_any_case() {
        assert_eq!(parse("now"), Ok(NOW_MS));
        assert_eq!(parse("NOW"), Ok(NOW_MS));
        assert_eq!(parse(" Now "), Ok(NOW_MS));
    }

    #[test]
    fn digits_are_millis() {
        assert_eq!(parse("1700000000000"), Ok(1_700_000_000_000));
    }

    #[test]
    fn rfc3339() {
        assert_eq!(parse("2024-01-01T00:00:00Z"), Ok(1_704_067_200_000));
        assert_eq!(parse("2024-01-01T01:00:00+01:00"), Ok(1_704_067_200_000));
    }

    #[test]
    fn short_units() {
        assert_eq!(parse("5s"), Ok(NOW_MS - 5_000));
        assert_eq!(parse("30m"), Ok(NOW_MS - 1_800_000));
        assert_eq!(parse("1h"), Ok(NOW_MS - 3_600_000));
        assert_eq!(parse("7d"), Ok(NOW_MS - 7 * 86_400_000));
        assert_eq!(parse("1w"), Ok(NOW_MS - 7 * 86_400_000));
    }

    #[test]
    fn long_units_spaces_and_minus() {
        assert_eq!(parse("5minutes"), Ok(NOW_MS - 300_000));
        assert_eq!(parse("5 minutes"), Ok(NOW_MS - 300_000));
        assert_eq!(parse("2HRS"), Ok(NOW_MS - 7_200_000));
        assert_eq!(parse("-30m"), Ok(NOW_MS - 1_800_000));
        assert_eq!(parse("3 days"), Ok(NOW_MS - 3 * 86_400_000));
    }

    #[test]
    fn rejects_garbage() {
        for input in ["", "yesterday", "5 fortnights", "m5", "-", "2024-13-45T00:00:00Z"] {
            let err = parse(input).unwrap_err();
            assert!(err.to_string().starts_with("unable to parse time"), "{input}");
        }
    }

    #[test]
    fn huge_offsets_are_errors() {
        for input in ["9223372036854775807s", "-9223372036854775807 seconds", "99999999999999999999w"] {
            let err = parse(input).unwrap_err();
            assert!(err.to_string().starts_with("unable to parse time"), "{input}");
        }
        assert_eq!(parse("9223372036854775807"), Ok(i64::MAX));
    }

    #[test]
    fn rfc3339_extremes() {
        assert_eq!(parse("9999-12-31T23:59:59Z"), Ok(253_402_300_799_000));
        assert_eq!(parse("0001-01-01T00:00:00Z"), Ok(-62_135_596_800_000));
    }

    #[test]
    fn real_clock_is_second_aligned() {
        let ms = parse_time_millis("1h").unwrap();
        assert_eq!(ms % 1000, 0);
        assert_eq!(parse_time_secs("1700000000000").unwrap(), 1_700_000_000);
    }
}
