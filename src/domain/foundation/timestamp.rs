//! UTC instants for debate creation, closing and wire frames.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Borrow the inner value, e.g. to bind it as a `TIMESTAMPTZ`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Millisecond-precision RFC 3339 with a `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_utc_with_millis() {
        let ts = Timestamp::from(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = "\"2024-01-15T10:30:00Z\"";
        let ts: Timestamp = serde_json::from_str(json).unwrap();
        assert_eq!(ts.as_datetime().timestamp(), 1_705_314_600);
        assert!(serde_json::to_string(&ts).unwrap().starts_with("\"2024-01-15T10:30:00"));
    }

    #[test]
    fn orders_chronologically() {
        let opened = Timestamp::now();
        let closed = Timestamp::from(*opened.as_datetime() + chrono::Duration::seconds(1));
        assert!(opened < closed);
    }
}
