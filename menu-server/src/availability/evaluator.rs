use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use shared::models::Schedule;

use super::{Availability, UnavailableReason};
use crate::utils::time::{parse_date, parse_hhmm, truncate_to_minute};

/// How many consecutive days the next-available search looks at
const SEARCH_DAYS: u64 = 8;

/// Parsed schedule; fields that fail to parse are dropped
#[derive(Debug, Default)]
struct Constraints {
    /// Sunday-based weekday numbers; `None` means every day
    days: Option<Vec<u32>>,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
    /// Only set when both bounds parse
    time: Option<(NaiveTime, NaiveTime)>,
}

impl Constraints {
    fn from_schedule(schedule: &Schedule) -> Self {
        let days: Vec<u32> = schedule.valid_days().into_iter().map(u32::from).collect();
        let (date_start, date_end) = schedule
            .date_range
            .as_ref()
            .map(|r| {
                (
                    r.start.as_deref().and_then(parse_date),
                    r.end.as_deref().and_then(parse_date),
                )
            })
            .unwrap_or_default();
        let time = schedule.time_range.as_ref().and_then(|r| {
            let start = r.start.as_deref().and_then(parse_hhmm)?;
            let end = r.end.as_deref().and_then(parse_hhmm)?;
            Some((start, end))
        });

        Self {
            days: (!days.is_empty()).then_some(days),
            date_start,
            date_end,
            time,
        }
    }

    fn allows_day(&self, date: NaiveDate) -> bool {
        self.days
            .as_ref()
            .is_none_or(|days| days.contains(&date.weekday().num_days_from_sunday()))
    }

    fn window_start(&self) -> NaiveTime {
        self.time.map(|(start, _)| start).unwrap_or(NaiveTime::MIN)
    }

    /// Earliest instant at or after `now` meeting every constraint
    fn next_available(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let today = now.date();
        let first = self.date_start.map_or(today, |start| start.max(today));

        for offset in 0..SEARCH_DAYS {
            let day = first.checked_add_days(Days::new(offset))?;
            if self.date_end.is_some_and(|end| day > end) {
                return None;
            }
            if !self.allows_day(day) {
                continue;
            }
            if day == today {
                match self.time {
                    Some((start, _)) if now.time() < start => return Some(day.and_time(start)),
                    Some((_, end)) if now.time() <= end => return Some(now),
                    Some(_) => continue,
                    None => return Some(now),
                }
            }
            return Some(day.and_time(self.window_start()));
        }
        None
    }
}

/// Evaluate `schedule` at local wall-clock time `now`.
///
/// Checks run day, then date range, then time of day; the first failure is
/// the reported reason. `next_available` accounts for all of them at once.
pub fn evaluate(schedule: Option<&Schedule>, now: NaiveDateTime) -> Availability {
    let Some(schedule) = schedule.filter(|s| !s.is_empty()) else {
        return Availability::available();
    };
    let constraints = Constraints::from_schedule(schedule);

    if constraints.time.is_some_and(|(start, end)| end < start) {
        return Availability::unavailable(UnavailableReason::UnsupportedTimeWindow, None);
    }

    let now = now.date().and_time(truncate_to_minute(now.time()));
    let today = now.date();

    let reason = if !constraints.allows_day(today) {
        UnavailableReason::NotToday
    } else if constraints.date_start.is_some_and(|start| today < start) {
        UnavailableReason::NotYetStarted
    } else if constraints.date_end.is_some_and(|end| today > end) {
        return Availability::unavailable(UnavailableReason::Expired, None);
    } else if constraints
        .time
        .is_some_and(|(start, end)| now.time() < start || now.time() > end)
    {
        UnavailableReason::OutsideHours
    } else {
        return Availability::available();
    };

    Availability::unavailable(reason, constraints.next_available(now))
}
