//! The fixed wire timestamp format: `yyyy-MM-dd'T'HH:mm:ss.SSSZ`.
//!
//! Every timestamp crossing the wire uses millisecond precision and a
//! numeric offset (`2024-03-01T10:15:30.000+0000`). A value that is present
//! but does not parse is fatal to the surrounding request or response parse;
//! it is never silently recovered.

use chrono::DateTime;

use crate::types::Timestamp;

pub const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

pub fn format(ts: &Timestamp) -> String {
    ts.format(WIRE_FORMAT).to_string()
}

pub fn parse(raw: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_str(raw, WIRE_FORMAT)
}

/// Serde adapter for mandatory timestamp fields.
pub mod wire_date {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Timestamp;

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for nullable timestamp fields.
pub mod wire_date_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::Timestamp;

    pub fn serialize<S: Serializer>(
        ts: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_str(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_utc_with_milliseconds() {
        let ts = parse("2024-03-01T10:15:30.123+0000").unwrap();
        assert_eq!(format(&ts), "2024-03-01T10:15:30.123+0000");
    }

    #[test]
    fn preserves_numeric_offset() {
        let ts = parse("2024-03-01T10:15:30.000+0130").unwrap();
        assert_eq!(format(&ts), "2024-03-01T10:15:30.000+0130");
    }

    #[test]
    fn rejects_missing_milliseconds() {
        assert!(parse("2024-03-01T10:15:30+0000").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_err());
    }
}
