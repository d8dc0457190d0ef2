//! Schedule Evaluator
//!
//! Decides whether a scheduled menu item is orderable at a given local time,
//! and if not, why and when it next will be.
//!
//! Pure and infallible: malformed schedule fields simply stop constraining.

mod evaluator;

pub use evaluator::evaluate;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Why a schedule currently blocks an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Today's weekday is not in `days`
    NotToday,
    /// Before `dateRange.start`
    NotYetStarted,
    /// After `dateRange.end`
    Expired,
    /// Outside `timeRange`
    OutsideHours,
    /// `timeRange` ends before it starts (overnight windows are not modelled)
    UnsupportedTimeWindow,
}

impl UnavailableReason {
    pub fn message(&self) -> &'static str {
        match self {
            UnavailableReason::NotToday => "Not available today",
            UnavailableReason::NotYetStarted => "Not available yet",
            UnavailableReason::Expired => "No longer available",
            UnavailableReason::OutsideHours => "Outside serving hours",
            UnavailableReason::UnsupportedTimeWindow => "Unsupported time window",
        }
    }
}

/// Evaluation result (供应状态)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub is_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<UnavailableReason>,
    /// Earliest local time at which every constraint holds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_available: Option<NaiveDateTime>,
}

impl Availability {
    pub fn available() -> Self {
        Self {
            is_available: true,
            reason: None,
            next_available: None,
        }
    }

    pub fn unavailable(reason: UnavailableReason, next_available: Option<NaiveDateTime>) -> Self {
        Self {
            is_available: false,
            reason: Some(reason),
            next_available,
        }
    }
}
