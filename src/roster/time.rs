use crate::error::{validation_error, Error, RosterResult};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minutes in one day, used for the overnight wrap
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Date format used for week keys (YYYY-MM-DD)
pub const WEEK_KEY_FORMAT: &str = "%Y-%m-%d";

/// Parse time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    // `u32::parse` accepts a leading '+', the grid never produces one
    let is_clock_part =
        |part: &str| !part.is_empty() && part.len() <= 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !is_clock_part(parts[0]) || !is_clock_part(parts[1]) {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// A 24-hour clock value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u32,
    minute: u32,
}

impl TimeOfDay {
    /// Create a time of day, `None` when out of range
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_time(s)
            .and_then(|(hour, minute)| TimeOfDay::new(hour, minute))
            .ok_or_else(|| validation_error(&format!("Invalid time '{}', expected HH:MM", s)))
    }
}

/// What a single roster cell holds once read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeInput {
    /// Cell is unset or blank
    Empty,
    /// Cell holds a valid clock value
    Valid(TimeOfDay),
    /// Cell holds text that is not a clock value
    Malformed(String),
}

impl TimeInput {
    /// Read a raw cell value
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => TimeInput::Empty,
            Some(text) => match text.parse::<TimeOfDay>() {
                Ok(time) => TimeInput::Valid(time),
                Err(_) => TimeInput::Malformed(text.to_string()),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TimeInput::Empty)
    }
}

/// One of the seven scheduling buckets, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Position in the week, 0 = Monday
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = Error;

    /// Accepts full names and three-letter abbreviations, any case
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.name() == lowered || (lowered.len() == 3 && day.name().starts_with(&lowered)))
            .ok_or_else(|| validation_error(&format!("Unknown weekday '{}'", s)))
    }
}

/// Identifies a week by the date of its Monday
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Week containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        let offset = i64::from(date.weekday().num_days_from_monday());
        let monday = date
            .checked_sub_signed(Duration::days(offset))
            .unwrap_or(date);
        Self(monday)
    }

    /// Week containing the given instant, in the instant's own timezone
    pub fn current<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        Self::containing(now.date_naive())
    }
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WEEK_KEY_FORMAT))
    }
}

impl FromStr for WeekKey {
    type Err = Error;

    /// Any date is accepted and normalized to its Monday
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(s.trim(), WEEK_KEY_FORMAT).map_err(|e| {
            validation_error(&format!("Failed to parse week date {}: {}", s, e))
        })?;
        Ok(Self::containing(date))
    }
}

impl TryFrom<String> for WeekKey {
    type Error = Error;

    fn try_from(value: String) -> RosterResult<Self> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(key: WeekKey) -> Self {
        key.to_string()
    }
}
