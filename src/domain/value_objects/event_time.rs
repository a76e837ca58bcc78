//! # Event Time Value Object
//!
//! Vendor timestamp with two accepted textual encodings.
//!
//! iiko reports instants either as RFC 3339 (`2024-01-02T10:00:00.123Z`) or in
//! its own `yyyy-MM-dd HH:mm:ss.fff` layout (`2024-01-02 10:00:00.123`), and
//! sometimes sends an empty string or `null` where no instant is known.
//! [`EventTime`] accepts all of them.
//!
//! # Examples
//!
//! ```
//! use iiko_client::domain::value_objects::event_time::EventTime;
//!
//! let vendor = EventTime::parse("2024-01-02 10:00:00.123").unwrap();
//! let standard = EventTime::parse("2024-01-02T10:00:00.123Z").unwrap();
//! assert_eq!(vendor, standard);
//!
//! assert!(EventTime::parse("").unwrap().is_zero());
//! assert!(EventTime::parse("not-a-date").is_err());
//! ```

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Failure to read an [`EventTime`] from text.
///
/// Carries the offending input verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed timestamp: '{raw}'")]
pub struct ParseEventTimeError {
    /// The raw token that matched neither encoding.
    pub raw: String,
}

/// A UTC instant reported by the iiko platform.
///
/// # Invariants
///
/// - Always in UTC. The vendor layout carries no offset and is read as UTC.
/// - The zero value is the Unix epoch and stands for "no instant".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventTime(DateTime<Utc>);

impl EventTime {
    /// Vendor layout used when parsing. The fractional part is optional.
    pub const VENDOR_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S%.f";

    /// Vendor layout used when formatting, fixed at millisecond precision.
    pub const VENDOR_OUTPUT_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S%.3f";

    /// The zero value.
    pub const ZERO: Self = Self(DateTime::<Utc>::UNIX_EPOCH);

    /// Parses a raw token.
    ///
    /// Enclosing quotes are stripped first, so a JSON string literal can be
    /// passed as is. Empty input and the literal `null` give [`EventTime::ZERO`].
    /// RFC 3339 is tried before the vendor layout.
    ///
    /// # Errors
    ///
    /// Returns [`ParseEventTimeError`] when neither encoding matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use iiko_client::domain::value_objects::event_time::EventTime;
    ///
    /// let ts = EventTime::parse("\"2024-01-02 10:00:00\"").unwrap();
    /// assert_eq!(ts.to_vendor_format(), "2024-01-02 10:00:00.000");
    ///
    /// assert_eq!(EventTime::parse("null").unwrap(), EventTime::ZERO);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ParseEventTimeError> {
        let token = raw.trim_matches('"').trim();

        if token.is_empty() || token == "null" {
            return Ok(Self::ZERO);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(token) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        if let Ok(naive) = NaiveDateTime::parse_from_str(token, Self::VENDOR_FORMAT) {
            return Ok(Self(naive.and_utc()));
        }

        Err(ParseEventTimeError {
            raw: raw.to_string(),
        })
    }

    /// Creates an event time from Unix milliseconds.
    ///
    /// Returns `None` if the value is out of range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Returns true if this is the zero value.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Formats in the vendor layout, `yyyy-MM-dd HH:mm:ss.fff`.
    #[must_use]
    pub fn to_vendor_format(&self) -> String {
        self.0.format(Self::VENDOR_OUTPUT_FORMAT).to_string()
    }

    /// Formats as RFC 3339.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Returns the underlying DateTime.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for EventTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_vendor_format())
    }
}

impl std::str::FromStr for EventTime {
    type Err = ParseEventTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for EventTime {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<EventTime> for DateTime<Utc> {
    fn from(ts: EventTime) -> Self {
        ts.0
    }
}

impl Serialize for EventTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_zero() {
            serializer.serialize_none()
        } else {
            serializer.serialize_str(&self.to_vendor_format())
        }
    }
}

impl<'de> Deserialize<'de> for EventTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => Self::parse(&raw).map_err(serde::de::Error::custom),
            None => Ok(Self::ZERO),
        }
    }
}
