use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a timestamp the way the backend may send it.
///
/// Offsets are dropped after conversion so the shop sees the wall-clock time
/// that was recorded.
pub fn parse_backend_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Serde helper for optional backend timestamps; unparsable values become `None`
pub fn deserialize_optional_datetime<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_backend_datetime))
}

/// Parse the `YYYY-MM-DD` value of an HTML date input
pub fn parse_search_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// vi-VN short date, e.g. `19/10/2026`
pub fn format_date(value: &NaiveDateTime) -> String {
    value.format("%d/%m/%Y").to_string()
}

/// vi-VN date and time, e.g. `14:30:05 19/10/2026`
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%H:%M:%S %d/%m/%Y").to_string()
}

pub fn format_optional_datetime(value: Option<&NaiveDateTime>) -> String {
    value.map(format_datetime).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_backend_datetime_variants() {
        let expected = at(2026, 10, 19, 14, 30, 5);
        assert_eq!(parse_backend_datetime("2026-10-19T14:30:05"), Some(expected));
        assert_eq!(
            parse_backend_datetime("2026-10-19T14:30:05.1234567"),
            at(2026, 10, 19, 14, 30, 5).with_nanosecond(123_456_700)
        );
        assert_eq!(parse_backend_datetime("2026-10-19 14:30:05"), Some(expected));
        assert_eq!(
            parse_backend_datetime("2026-10-19T14:30:05+07:00"),
            Some(expected)
        );
        assert_eq!(
            parse_backend_datetime("2026-10-19"),
            Some(at(2026, 10, 19, 0, 0, 0))
        );
        assert_eq!(parse_backend_datetime("yesterday"), None);
    }

    #[test]
    fn test_format_vi_vn() {
        let value = at(2026, 3, 7, 9, 5, 0);
        assert_eq!(format_date(&value), "07/03/2026");
        assert_eq!(format_datetime(&value), "09:05:00 07/03/2026");
        assert_eq!(format_optional_datetime(None), "-");
    }

    #[test]
    fn test_parse_search_date() {
        assert_eq!(
            parse_search_date("2026-10-19"),
            NaiveDate::from_ymd_opt(2026, 10, 19)
        );
        assert_eq!(parse_search_date("19/10/2026"), None);
    }
}
