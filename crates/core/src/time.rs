//! Timestamp helpers: truncation, display-zone rendering, and lenient
//! parsing of caller-supplied instants.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Zone every outgoing timestamp is rendered in.
pub const DISPLAY_TZ: Tz = chrono_tz::Europe::Moscow;

/// Naive formats accepted for instants without an offset (read as UTC).
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Current UTC instant truncated to whole seconds.
pub fn now_utc() -> Timestamp {
    Utc::now().trunc_subsecs(0)
}

/// Render a stored timestamp in [`DISPLAY_TZ`] with second precision,
/// e.g. `2024-03-01T15:04:05+03:00`.
pub fn format_display(ts: &Timestamp) -> String {
    ts.trunc_subsecs(0)
        .with_timezone(&DISPLAY_TZ)
        .to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// `serialize_with` adapter for a required timestamp field.
pub fn serialize_display<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_display(ts))
}

/// `serialize_with` adapter for a nullable timestamp field.
pub fn serialize_display_opt<S: Serializer>(
    ts: &Option<Timestamp>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ts {
        Some(ts) => serializer.serialize_str(&format_display(ts)),
        None => serializer.serialize_none(),
    }
}

/// Parse an instant supplied by a caller.
///
/// Accepted shapes, tried in order:
/// - RFC 3339 with offset (`2024-03-01T12:00:00+03:00`, `...Z`)
/// - naive date-time, read as UTC (`2024-03-01T12:00:00`, `2024-03-01 12:00:00.5`)
/// - bare date, read as midnight UTC (`2024-03-01`)
///
/// A `+` in an offset that arrived through a query string decodes to a space;
/// that form is repaired before giving up.
pub fn parse_instant(raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();

    if let Some(ts) = parse_strict(raw) {
        return Ok(ts);
    }
    if let Some(repaired) = restore_plus_offset(raw) {
        if let Some(ts) = parse_strict(&repaired) {
            return Ok(ts);
        }
    }

    Err(CoreError::Validation(format!("Invalid datetime: '{raw}'")))
}

fn parse_strict(raw: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// `2024-03-01T12:00:00 03:00` -> `2024-03-01T12:00:00+03:00`.
fn restore_plus_offset(raw: &str) -> Option<String> {
    let (head, tail) = raw.rsplit_once(' ')?;
    let looks_like_offset = tail.len() == 5
        && tail.as_bytes()[2] == b':'
        && tail.bytes().filter(u8::is_ascii_digit).count() == 4;
    (head.contains('T') && looks_like_offset).then(|| format!("{head}+{tail}"))
}

/// `deserialize_with` adapter for a required instant.
pub fn deserialize_instant<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_instant(&raw).map_err(serde::de::Error::custom)
}

/// `deserialize_with` adapter for an optional instant. Pair with `#[serde(default)]`.
pub fn deserialize_opt_instant<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => parse_instant(&raw)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn now_has_no_subsecond_part() {
        assert_eq!(now_utc().timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn display_renders_moscow_offset() {
        assert_eq!(
            format_display(&utc(2024, 3, 1, 12, 4, 5)),
            "2024-03-01T15:04:05+03:00"
        );
    }

    #[test]
    fn display_drops_subseconds() {
        let ts = utc(2024, 3, 1, 12, 0, 0) + chrono::Duration::milliseconds(750);
        assert_eq!(format_display(&ts), "2024-03-01T15:00:00+03:00");
    }

    #[test]
    fn display_crosses_midnight_into_next_local_day() {
        assert_eq!(
            format_display(&utc(2024, 12, 31, 22, 30, 0)),
            "2025-01-01T01:30:00+03:00"
        );
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        assert_eq!(
            parse_instant("2024-03-01T15:00:00+03:00").unwrap(),
            utc(2024, 3, 1, 12, 0, 0)
        );
        assert_eq!(
            parse_instant("2024-03-01T12:00:00Z").unwrap(),
            utc(2024, 3, 1, 12, 0, 0)
        );
    }

    #[test]
    fn parses_naive_as_utc() {
        assert_eq!(
            parse_instant("2024-03-01T12:00:00").unwrap(),
            utc(2024, 3, 1, 12, 0, 0)
        );
        assert_eq!(
            parse_instant("2024-03-01 12:00:00").unwrap(),
            utc(2024, 3, 1, 12, 0, 0)
        );
    }

    #[test]
    fn parses_bare_date_as_midnight() {
        assert_eq!(
            parse_instant("2024-03-01").unwrap(),
            utc(2024, 3, 1, 0, 0, 0)
        );
    }

    #[test]
    fn repairs_offset_plus_lost_in_query_string() {
        assert_eq!(
            parse_instant("2024-03-01T15:00:00 03:00").unwrap(),
            utc(2024, 3, 1, 12, 0, 0)
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_instant("yesterday").unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn serialize_adapters_emit_display_strings_and_null() {
        #[derive(serde::Serialize)]
        struct Probe {
            #[serde(serialize_with = "serialize_display")]
            at: Timestamp,
            #[serde(serialize_with = "serialize_display_opt")]
            gone: Option<Timestamp>,
        }

        let json = serde_json::to_value(Probe {
            at: utc(2024, 3, 1, 0, 0, 0),
            gone: None,
        })
        .unwrap();
        assert_eq!(json["at"], "2024-03-01T03:00:00+03:00");
        assert!(json["gone"].is_null());
    }
}
