// Timestamp codec
//
// The platform exchanges instants as integer milliseconds since the Unix
// epoch (UTC). The one exception is a device's `createdAt`, which is a
// second-precision date-time string with a literal `UTC` suffix.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::Error;

/// Format of the `createdAt` field on registered devices.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SUTC";

/// Milliseconds since the Unix epoch, after normalising to UTC.
///
/// Sub-millisecond precision is truncated.
pub fn to_epoch_millis<Tz: TimeZone>(instant: &DateTime<Tz>) -> i64 {
    instant.timestamp_millis()
}

/// The UTC instant `millis` milliseconds after the Unix epoch.
pub fn from_epoch_millis(millis: i64) -> Result<DateTime<Utc>, Error> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        Error::invalid_argument("millis", format!("{millis} is outside the supported range"))
    })
}

/// Serializer for optional instants carried as epoch milliseconds.
pub(crate) mod epoch_millis_option {
    use chrono::{DateTime, Utc};
    use serde::Serializer;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(instant) => serializer.serialize_i64(super::to_epoch_millis(instant)),
            None => serializer.serialize_none(),
        }
    }
}

/// Serde adapter for the `createdAt` date-time string.
///
/// Writes [`CREATED_AT_FORMAT`]; reads that format and falls back to
/// RFC 3339 so a server switching to ISO offsets keeps working.
pub(crate) mod created_at {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::CREATED_AT_FORMAT;

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&value.format(CREATED_AT_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_created_at(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parse a `createdAt` value.
pub fn parse_created_at(raw: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, CREATED_AT_FORMAT) {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Deserialization {
            message: format!("invalid createdAt timestamp: {e}"),
            body: raw.to_owned(),
        })
}
