//! Availability Schedule Model
//!
//! Optional day / time-of-day / date-range constraints attached to a menu item.
//! Every axis is optional; an absent axis does not constrain availability.
//! Axes of the wrong shape (hand-edited files) decode as absent.

use serde::{Deserialize, Serialize};

use super::serde_helpers;

/// Availability schedule (供应时段)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Weekday indices (0=Sunday..6=Saturday)
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient_days",
        skip_serializing_if = "Option::is_none"
    )]
    pub days: Option<Vec<u8>>,
    /// Daily window (HH:MM, both bounds inclusive)
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_range: Option<TimeRange>,
    /// Calendar window (YYYY-MM-DD, both bounds inclusive, either side open)
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_range: Option<DateRange>,
}

/// Daily time window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<String>,
}

/// Calendar date window
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub start: Option<String>,
    #[serde(
        default,
        deserialize_with = "serde_helpers::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<String>,
}

impl Schedule {
    /// True when no axis carries a constraint
    pub fn is_empty(&self) -> bool {
        self.days.as_ref().is_none_or(|d| d.is_empty())
            && self.time_range.is_none()
            && self.date_range.is_none()
    }

    /// Weekday indices within 0..=6, out-of-range entries dropped
    pub fn valid_days(&self) -> Vec<u8> {
        self.days
            .as_deref()
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|d| *d <= 6)
            .collect()
    }
}

impl TimeRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }
}

impl DateRange {
    pub fn new(start: Option<&str>, end: Option<&str>) -> Self {
        Self {
            start: start.map(str::to_string),
            end: end.map(str::to_string),
        }
    }
}
