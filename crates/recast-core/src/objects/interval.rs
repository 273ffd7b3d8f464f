//! ISO-8601 duration wrapper
//!
//! Copyright (c) 2025 Recast Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use chrono::{Duration, Months, Utc};
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

fn duration_pattern() -> &'static Regex {
    static DURATION: OnceLock<Regex> = OnceLock::new();
    DURATION.get_or_init(|| {
        Regex::new(
            r"^P(?:(\d+)Y)?(?:(\d+)M)?(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$",
        )
        .expect("duration pattern is valid")
    })
}

/// The components of a duration exactly as written, not normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DurationParts {
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl DurationParts {
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |message: &str| Error::invalid_value("interval", value, message);

        if value == "P" || value.ends_with('T') {
            return Err(invalid("duration has no components"));
        }
        let captures = duration_pattern()
            .captures(value)
            .ok_or_else(|| invalid("not an ISO-8601 duration"))?;

        let component = |index: usize| -> Result<u32> {
            captures
                .get(index)
                .map(|m| m.as_str().parse::<u32>())
                .transpose()
                .map(|n| n.unwrap_or(0))
                .map_err(|e| invalid(&e.to_string()))
        };

        let weeks = component(3)?;
        Ok(Self {
            years: component(1)?,
            months: component(2)?,
            days: weeks.saturating_mul(7).saturating_add(component(4)?),
            hours: component(5)?,
            minutes: component(6)?,
            seconds: component(7)?,
        })
    }

    fn labelled(&self) -> [(u32, &'static str); 6] {
        [
            (self.years, "year"),
            (self.months, "month"),
            (self.days, "day"),
            (self.hours, "hour"),
            (self.minutes, "minute"),
            (self.seconds, "second"),
        ]
    }

    /// Human form, e.g. `1 year 2 months and 1 day`
    pub fn describe(&self) -> String {
        let mut parts: Vec<String> = self
            .labelled()
            .iter()
            .filter(|(amount, _)| *amount > 0)
            .map(|(amount, label)| {
                let plural = if *amount > 1 { "s" } else { "" };
                format!("{amount} {label}{plural}")
            })
            .collect();

        if parts.len() > 1 {
            if let Some(last) = parts.last_mut() {
                *last = format!("and {last}");
            }
        }
        parts.join(" ")
    }

    /// Shift `from` forward by this duration, calendar units first
    fn add_to(&self, from: chrono::DateTime<Utc>) -> Option<chrono::DateTime<Utc>> {
        let months = self.years.checked_mul(12)?.checked_add(self.months)?;
        let shifted = from.checked_add_months(Months::new(months))?;
        let clock = Duration::try_days(i64::from(self.days))?
            + Duration::try_hours(i64::from(self.hours))?
            + Duration::try_minutes(i64::from(self.minutes))?
            + Duration::try_seconds(i64::from(self.seconds))?;
        shifted.checked_add_signed(clock)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Span {
    value: String,
    parts: DurationParts,
    date: chrono::DateTime<Utc>,
    time: i64,
}

/// A duration anchored at its construction time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Interval {
    span: Option<Span>,
}

impl Interval {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a duration relative to the current time
    pub fn parse(value: &str) -> Result<Self> {
        Self::parse_at(value, Utc::now())
    }

    /// Parse a duration relative to `now`
    pub fn parse_at(value: &str, now: chrono::DateTime<Utc>) -> Result<Self> {
        let parts = DurationParts::parse(value.trim())?;
        let date = parts
            .add_to(now)
            .ok_or_else(|| Error::invalid_value("interval", value, "duration out of range"))?;

        Ok(Self {
            span: Some(Span {
                value: value.to_string(),
                parts,
                date,
                time: date.timestamp() - now.timestamp(),
            }),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_none()
    }

    pub fn value(&self) -> Option<&str> {
        self.span.as_ref().map(|s| s.value.as_str())
    }

    pub fn parts(&self) -> Option<DurationParts> {
        self.span.as_ref().map(|s| s.parts)
    }

    /// Seconds from construction time to the target time
    pub fn time(&self) -> Option<i64> {
        self.span.as_ref().map(|s| s.time)
    }

    /// The absolute target time
    pub fn date(&self) -> Option<chrono::DateTime<Utc>> {
        self.span.as_ref().map(|s| s.date)
    }

    pub fn describe(&self) -> String {
        self.span
            .as_ref()
            .map(|s| s.parts.describe())
            .unwrap_or_default()
    }

    /// strftime-style rendering of the target time
    pub fn format(&self, pattern: &str) -> String {
        self.span
            .as_ref()
            .map(|s| s.date.format(pattern).to_string())
            .unwrap_or_default()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let Some(span) = &self.span else {
            return serializer.serialize_none();
        };
        let mut state = serializer.serialize_struct("Interval", 3)?;
        state.serialize_field("time", &span.time)?;
        state.serialize_field("date", &span.date.format("%Y-%m-%dT%H:%M:%S%:z").to_string())?;
        state.serialize_field("interval", &span.parts.describe())?;
        state.end()
    }
}
