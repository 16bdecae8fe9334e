//! Lenient serde adapters for values the backend renders inconsistently.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};

/// Accept a JSON string or number and keep it as text.
///
/// Record ids and floors are opaque to the client but some backends emit
/// them as numbers.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl Visitor<'_> for TextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            Ok(value.to_string())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

/// Treat an explicit JSON `null` like a missing key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `HH:MM`, or `HH:MM:SS` when the seconds are not zero.
pub fn format_time(time: NaiveTime) -> String {
    if time.second() == 0 {
        time.format("%H:%M").to_string()
    } else {
        time.format("%H:%M:%S").to_string()
    }
}

/// Parse a wall-clock time given as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

/// Times serialize as `HH:MM` (seconds kept when present) and accept an
/// optional seconds part.
pub mod hhmm {
    use super::{format_time, parse_time, Deserialize, Deserializer, NaiveTime, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_time(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_time(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time of day: {raw}")))
    }
}

/// Optional timestamps with or without an offset; offsets are folded to UTC.
pub mod lenient_datetime {
    use super::{DateTime, Deserialize, Deserializer, NaiveDateTime, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(timestamp) => {
                serializer.serialize_str(&timestamp.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Some(with_offset.naive_utc()));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(Some)
            .map_err(|error| serde::de::Error::custom(format!("invalid timestamp {raw}: {error}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_time_accepts_optional_seconds() {
        assert_eq!(parse_time("09:00"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(parse_time("17:45:30"), NaiveTime::from_hms_opt(17, 45, 30));
        assert_eq!(parse_time("25:00"), None);
        assert_eq!(parse_time("nove horas"), None);
    }

    #[test]
    fn format_time_keeps_nonzero_seconds() {
        let on_the_minute = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let with_seconds = NaiveTime::from_hms_opt(14, 0, 30).unwrap();
        assert_eq!(format_time(on_the_minute), "09:00");
        assert_eq!(format_time(with_seconds), "14:00:30");
        assert_eq!(parse_time(&format_time(with_seconds)), Some(with_seconds));
    }

    #[test]
    fn null_as_default_accepts_null_and_values() {
        #[derive(Debug, Deserialize)]
        struct Row {
            #[serde(default, deserialize_with = "null_as_default")]
            tags: Vec<String>,
            #[serde(default, deserialize_with = "null_as_default")]
            note: String,
        }

        let nulls: Row = serde_json::from_str(r#"{"tags": null, "note": null}"#).unwrap();
        assert!(nulls.tags.is_empty());
        assert_eq!(nulls.note, "");

        let filled: Row = serde_json::from_str(r#"{"tags": ["a"], "note": "x"}"#).unwrap();
        assert_eq!(filled.tags, vec!["a".to_string()]);
        assert_eq!(filled.note, "x");
    }
}
