use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parses an RFC 3339 timestamp, falling back to a naive ISO-8601 value read as UTC.
pub fn parse_timestamp(s: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive: NaiveDateTime = s.parse()?;
    Ok(naive.and_utc())
}

pub fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_offset_and_naive_timestamps() {
        let with_offset = parse_timestamp("2025-03-01T10:15:30.250+02:00").unwrap();
        assert_eq!(
            with_offset,
            Utc.with_ymd_and_hms(2025, 3, 1, 8, 15, 30).unwrap()
                + chrono::Duration::milliseconds(250)
        );

        let naive = parse_timestamp("2025-03-01T10:15:30.123456").unwrap();
        assert_eq!(
            naive,
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 30).unwrap()
                + chrono::Duration::microseconds(123456)
        );

        let whole_seconds = parse_timestamp("2025-03-01T10:15:30").unwrap();
        assert_eq!(
            whole_seconds,
            Utc.with_ymd_and_hms(2025, 3, 1, 10, 15, 30).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
    }
}
