//! Serde adapters shared by stored documents.

/// `DateTime<Utc>` as a fixed-width RFC 3339 string with millisecond
/// precision, e.g. `2024-05-01T12:00:00.000Z`.
///
/// Fixed width keeps lexicographic order equal to chronological order, so
/// string-valued timestamps sort correctly inside MongoDB.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Doc {
///     #[serde(with = "database::serde_helpers::rfc3339_millis")]
///     created_at: DateTime<Utc>,
/// }
/// ```
pub mod rfc3339_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "super::rfc3339_millis")]
        at: DateTime<Utc>,
    }

    #[test]
    fn test_fixed_width_output() {
        let whole = Stamped {
            at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        };
        let json = serde_json::to_string(&whole).unwrap();
        assert_eq!(json, r#"{"at":"2024-05-01T12:00:00.000Z"}"#);
    }

    #[test]
    fn test_parses_back() {
        let parsed: Stamped = serde_json::from_str(r#"{"at":"2024-05-01T12:00:00.250Z"}"#).unwrap();
        assert_eq!(parsed.at.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(serde_json::from_str::<Stamped>(r#"{"at":"yesterday"}"#).is_err());
    }
}
