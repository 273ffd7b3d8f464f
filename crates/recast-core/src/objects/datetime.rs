//! Date/time wrapper with timezone resolution

use crate::error::{Error, Result};
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::fmt;

const ISO_8601: &str = "%Y-%m-%dT%H:%M:%S%:z";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq)]
struct Moment {
    value: String,
    at: chrono::DateTime<FixedOffset>,
    timezone: String,
}

/// A parsed point in time, or an empty placeholder
///
/// Serializes as its ISO-8601 form, or `null` when empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DateTime {
    moment: Option<Moment>,
}

impl DateTime {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a date/time string, interpreting zone-less input in `timezone` (UTC by default)
    ///
    /// Input carrying its own offset keeps that offset and reports it as the
    /// timezone name. Integer input is read as epoch seconds.
    pub fn parse(value: &str, timezone: Option<&str>) -> Result<Self> {
        let zone = match timezone {
            Some(name) => name
                .parse::<Tz>()
                .map_err(|e| Error::invalid_value("timezone", name, e.to_string()))?,
            None => Tz::UTC,
        };
        let trimmed = value.trim();

        if let Ok(at) = chrono::DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self::resolved(value, at, at.offset().to_string()));
        }

        if let Ok(seconds) = trimmed.parse::<i64>() {
            let at = Utc
                .timestamp_opt(seconds, 0)
                .single()
                .ok_or_else(|| Error::invalid_value("date", value, "timestamp out of range"))?
                .with_timezone(&zone);
            return Ok(Self::resolved(value, at.fixed_offset(), zone.name().to_string()));
        }

        let naive = NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .ok_or_else(|| Error::invalid_value("date", value, "unrecognized date format"))?;

        let at = zone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| {
                Error::invalid_value("date", value, format!("local time does not exist in {}", zone.name()))
            })?;

        Ok(Self::resolved(value, at.fixed_offset(), zone.name().to_string()))
    }

    fn resolved(value: &str, at: chrono::DateTime<FixedOffset>, timezone: String) -> Self {
        Self {
            moment: Some(Moment {
                value: value.to_string(),
                at,
                timezone,
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.moment.is_none()
    }

    /// The raw input
    pub fn value(&self) -> Option<&str> {
        self.moment.as_ref().map(|m| m.value.as_str())
    }

    /// Epoch seconds
    pub fn time(&self) -> Option<i64> {
        self.moment.as_ref().map(|m| m.at.timestamp())
    }

    /// Resolved timezone name, e.g. `UTC`, `Asia/Jakarta` or `+07:00`
    pub fn timezone(&self) -> Option<&str> {
        self.moment.as_ref().map(|m| m.timezone.as_str())
    }

    pub fn moment(&self) -> Option<chrono::DateTime<FixedOffset>> {
        self.moment.as_ref().map(|m| m.at)
    }

    /// strftime-style rendering; empty for an empty value
    pub fn format(&self, pattern: &str) -> String {
        self.moment
            .as_ref()
            .map(|m| m.at.format(pattern).to_string())
            .unwrap_or_default()
    }

    pub fn to_iso8601(&self) -> String {
        self.format(ISO_8601)
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for DateTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.moment {
            Some(_) => serializer.serialize_str(&self.to_iso8601()),
            None => serializer.serialize_none(),
        }
    }
}
