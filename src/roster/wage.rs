use super::time::{TimeInput, TimeOfDay, MINUTES_PER_DAY};
use crate::error::{validation_error, RosterResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Shifts longer than this include an unpaid break
pub const BREAK_THRESHOLD_MINUTES: i64 = 5 * 60;

/// Length of the unpaid break
pub const UNPAID_BREAK_MINUTES: i64 = 30;

/// Highest hourly rate accepted anywhere a rate enters the system
pub const MAX_HOURLY_RATE: f64 = 10_000.0;

/// Reject hourly rates that are negative, non-finite or above the ceiling
pub fn validate_rate(rate: f64) -> RosterResult<()> {
    if !rate.is_finite() || !(0.0..=MAX_HOURLY_RATE).contains(&rate) {
        return Err(validation_error(&format!(
            "Invalid hourly rate {}, expected 0 to {}",
            rate, MAX_HOURLY_RATE
        )));
    }
    Ok(())
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Billable hours and pay for one shift
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShiftWage {
    pub hours: f64,
    pub pay: f64,
}

impl ShiftWage {
    pub const ZERO: ShiftWage = ShiftWage {
        hours: 0.0,
        pay: 0.0,
    };

    /// Pay in whole cents
    pub fn pay_cents(&self) -> i64 {
        (self.pay * 100.0).round() as i64
    }

    /// Hours in hundredths of an hour
    pub fn hour_hundredths(&self) -> i64 {
        (self.hours * 100.0).round() as i64
    }
}

/// Result of pricing one shift cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShiftOutcome {
    /// Both ends were valid clock values
    Worked(ShiftWage),
    /// Start or end is unset
    NoShift,
    /// Start or end could not be read; priced at zero
    Malformed { reason: String },
}

impl ShiftOutcome {
    /// Hours and pay, zero unless the shift was worked
    pub fn wage(&self) -> ShiftWage {
        match self {
            ShiftOutcome::Worked(wage) => *wage,
            ShiftOutcome::NoShift | ShiftOutcome::Malformed { .. } => ShiftWage::ZERO,
        }
    }
}

/// Minutes between start and end, wrapping past midnight when end is earlier
pub fn raw_minutes(start: TimeOfDay, end: TimeOfDay) -> i64 {
    let mut minutes = end.minutes_since_midnight() - start.minutes_since_midnight();
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }
    minutes
}

/// Minutes paid for a shift after the break deduction, never negative
pub fn billable_minutes(start: TimeOfDay, end: TimeOfDay) -> i64 {
    let raw = raw_minutes(start, end);
    let adjusted = if raw > BREAK_THRESHOLD_MINUTES {
        raw - UNPAID_BREAK_MINUTES
    } else {
        raw
    };
    adjusted.max(0)
}

/// Price one shift from its start and end cell values
///
/// A blank or unset side means no shift. Text that is not an `HH:MM`
/// clock value is priced at zero and reported as `Malformed`.
pub fn compute_shift_wage(start: Option<&str>, end: Option<&str>, rate: f64) -> ShiftOutcome {
    let start = TimeInput::parse(start);
    let end = TimeInput::parse(end);

    if start.is_empty() || end.is_empty() {
        return ShiftOutcome::NoShift;
    }

    match (start, end) {
        (TimeInput::Valid(start), TimeInput::Valid(end)) => {
            let hours = billable_minutes(start, end) as f64 / 60.0;
            // NaN and negative rates price at zero
            let rate = rate.max(0.0);
            ShiftOutcome::Worked(ShiftWage {
                hours: round2(hours),
                pay: round2(hours * rate),
            })
        }
        (start, end) => {
            let bad: Vec<String> = [start, end]
                .into_iter()
                .filter_map(|input| match input {
                    TimeInput::Malformed(text) => Some(format!("'{}'", text)),
                    _ => None,
                })
                .collect();
            let reason = format!("Unreadable shift time {}", bad.join(" and "));
            warn!("{}, treating as no shift", reason);
            ShiftOutcome::Malformed { reason }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wage(start: &str, end: &str, rate: f64) -> ShiftWage {
        compute_shift_wage(Some(start), Some(end), rate).wage()
    }

    #[test]
    fn test_short_shift_is_not_deducted() {
        let result = wage("08:00", "12:00", 25.0);
        assert_eq!(result.hours, 4.0);
        assert_eq!(result.pay, 100.0);

        // Exactly five hours stays whole
        let result = wage("09:00", "14:00", 10.0);
        assert_eq!(result.hours, 5.0);
        assert_eq!(result.pay, 50.0);
    }

    #[test]
    fn test_long_shift_loses_half_hour() {
        let result = wage("08:00", "14:00", 20.0);
        assert_eq!(result.hours, 5.5);
        assert_eq!(result.pay, 110.0);

        let result = wage("08:00", "18:00", 20.0);
        assert_eq!(result.hours, 9.5);

        // Five and a half hours is just over the threshold
        let result = wage("08:30", "14:00", 20.0);
        assert_eq!(result.hours, 5.0);
    }

    #[test]
    fn test_every_half_hour_grid_pair() {
        let rate = 17.5;
        for start in 0..48 {
            for end in 0..48 {
                let start_str = format!("{:02}:{:02}", start / 2, (start % 2) * 30);
                let end_str = format!("{:02}:{:02}", end / 2, (end % 2) * 30);
                let raw = if end >= start { end - start } else { end + 48 - start };
                let raw_hours = raw as f64 / 2.0;
                let expected = if raw_hours > 5.0 { raw_hours - 0.5 } else { raw_hours };

                let result = wage(&start_str, &end_str, rate);
                assert_eq!(result.hours, expected, "{} -> {}", start_str, end_str);
                assert_eq!(result.pay, round2(expected * rate));
                assert!(result.hours >= 0.0 && result.pay >= 0.0);
            }
        }
    }

    #[test]
    fn test_overnight_wraps() {
        let result = wage("23:00", "02:00", 30.0);
        assert_eq!(result.hours, 3.0);
        assert_eq!(result.pay, 90.0);

        // 22:00 -> 07:00 is nine hours, not the twelve-hour variant
        let result = wage("22:00", "07:00", 10.0);
        assert_eq!(result.hours, 8.5);
    }

    #[test]
    fn test_equal_times_are_zero() {
        assert_eq!(
            compute_shift_wage(Some("10:00"), Some("10:00"), 20.0),
            ShiftOutcome::Worked(ShiftWage::ZERO)
        );
    }

    #[test]
    fn test_missing_side_is_no_shift() {
        assert_eq!(
            compute_shift_wage(None, Some("14:00"), 20.0),
            ShiftOutcome::NoShift
        );
        assert_eq!(
            compute_shift_wage(Some("08:00"), Some(""), 20.0),
            ShiftOutcome::NoShift
        );
        // An empty side wins over a malformed one
        assert_eq!(
            compute_shift_wage(Some("8h"), None, 20.0),
            ShiftOutcome::NoShift
        );
    }

    #[test]
    fn test_malformed_is_zero_but_flagged() {
        for (start, end) in [("08-00", "14:00"), ("08:00", "two"), ("25:00", "26:00")] {
            let outcome = compute_shift_wage(Some(start), Some(end), 20.0);
            assert!(
                matches!(outcome, ShiftOutcome::Malformed { .. }),
                "{} -> {}",
                start,
                end
            );
            assert_eq!(outcome.wage(), ShiftWage::ZERO);
        }
    }

    #[test]
    fn test_negative_rate_never_pays_negative() {
        let result = wage("08:00", "12:00", -10.0);
        assert_eq!(result.hours, 4.0);
        assert_eq!(result.pay, 0.0);
    }

    #[test]
    fn test_outcome_serializes_with_status() {
        let json = serde_json::to_value(compute_shift_wage(Some("08:00"), Some("12:00"), 25.0))
            .unwrap();
        assert_eq!(json["status"], "worked");
        assert_eq!(json["hours"], 4.0);
        assert_eq!(json["pay"], 100.0);

        let json = serde_json::to_value(ShiftOutcome::NoShift).unwrap();
        assert_eq!(json["status"], "no_shift");
    }

    #[test]
    fn test_cents() {
        let result = wage("08:00", "14:00", 20.0);
        assert_eq!(result.pay_cents(), 11_000);
        assert_eq!(result.hour_hundredths(), 550);
    }

    #[test]
    fn test_validate_rate() {
        assert!(validate_rate(0.0).is_ok());
        assert!(validate_rate(21.5).is_ok());
        assert!(validate_rate(MAX_HOURLY_RATE).is_ok());
        assert!(validate_rate(-0.5).is_err());
        assert!(validate_rate(1e308).is_err());
        assert!(validate_rate(f64::INFINITY).is_err());
        assert!(validate_rate(f64::NAN).is_err());
    }
}
