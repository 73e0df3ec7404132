use super::models::{RosterSnapshot, ShiftCell, StaffDirectory};
use super::time::{TimeOfDay, WeekKey, Weekday};
use crate::error::{config_error, RosterResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A fixed shift repeated on the listed weekdays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedShift {
    pub employee: String,
    pub start: String,
    pub end: String,
    pub days: Vec<Weekday>,
}

/// Known shift layout for one historical week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedTemplate {
    pub week: WeekKey,
    #[serde(default)]
    pub shifts: Vec<SeedShift>,
}

/// Seed templates keyed by week
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedBook {
    templates: HashMap<WeekKey, Vec<SeedShift>>,
}

impl SeedBook {
    /// Build the book, normalizing times and rejecting duplicate weeks
    pub fn new(templates: Vec<SeedTemplate>) -> RosterResult<Self> {
        let mut book = HashMap::new();

        for template in templates {
            let mut shifts = Vec::with_capacity(template.shifts.len());
            for shift in template.shifts {
                let start = shift.start.parse::<TimeOfDay>().map_err(|e| {
                    config_error(&format!("Seed for week {}: {}", template.week, e))
                })?;
                let end = shift.end.parse::<TimeOfDay>().map_err(|e| {
                    config_error(&format!("Seed for week {}: {}", template.week, e))
                })?;
                shifts.push(SeedShift {
                    start: start.to_string(),
                    end: end.to_string(),
                    ..shift
                });
            }

            if book.insert(template.week, shifts).is_some() {
                return Err(config_error(&format!(
                    "Week {} is seeded more than once",
                    template.week
                )));
            }
        }

        Ok(Self { templates: book })
    }

    pub fn template_for(&self, week: &WeekKey) -> Option<&[SeedShift]> {
        self.templates.get(week).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Fresh roster for a week: one empty row per employee, seeded when the book
/// has a template for that week
pub fn initialize(week: &WeekKey, staff: &StaffDirectory, seeds: &SeedBook) -> RosterSnapshot {
    let mut snapshot = RosterSnapshot::empty_for(staff);

    let Some(shifts) = seeds.template_for(week) else {
        debug!("No seed for week {}, starting empty", week);
        return snapshot;
    };

    let mut applied = 0;
    for shift in shifts {
        let row = snapshot
            .rows
            .iter_mut()
            .find(|row| row.employee.eq_ignore_ascii_case(&shift.employee));

        match row {
            Some(row) => {
                for day in &shift.days {
                    *row.cell_mut(*day) = ShiftCell::new(shift.start.clone(), shift.end.clone());
                    applied += 1;
                }
            }
            None => debug!(
                "Seed for week {} names {} who is not on staff, skipping",
                week, shift.employee
            ),
        }
    }

    info!("Seeded week {} with {} shifts", week, applied);
    snapshot
}
