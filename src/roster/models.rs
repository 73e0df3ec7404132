use super::time::{WeekKey, Weekday};
use super::wage::{compute_shift_wage, validate_rate, ShiftOutcome, MAX_HOURLY_RATE};
use crate::error::{validation_error, RosterResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Settlement bucket an employee's pay accrues to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayCategory {
    #[default]
    #[serde(alias = "CASH", alias = "Cash")]
    Cash,
    #[serde(alias = "TRANSFER", alias = "Transfer")]
    Transfer,
}

/// A staff member as known to the staff directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique display name
    pub name: String,
    /// Hourly rate
    pub rate: f64,
    /// Where the pay is settled
    #[serde(default)]
    pub category: PayCategory,
}

impl Employee {
    pub fn new(name: impl Into<String>, rate: f64, category: PayCategory) -> Self {
        Self {
            name: name.into(),
            rate,
            category,
        }
    }
}

/// Staff directory in display order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StaffDirectory {
    employees: Vec<Employee>,
}

impl StaffDirectory {
    /// Build a directory, rejecting blank or duplicate names and bad rates
    pub fn new(employees: Vec<Employee>) -> RosterResult<Self> {
        let mut seen = HashSet::new();
        for employee in &employees {
            let name = employee.name.trim();
            if name.is_empty() {
                return Err(validation_error("Employee name must not be empty"));
            }
            if validate_rate(employee.rate).is_err() {
                return Err(validation_error(&format!(
                    "Invalid hourly rate {} for {}, expected 0 to {}",
                    employee.rate, employee.name, MAX_HOURLY_RATE
                )));
            }
            if !seen.insert(name.to_string()) {
                return Err(validation_error(&format!(
                    "Duplicate employee name {}",
                    employee.name
                )));
            }
        }

        Ok(Self { employees })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.employees.iter().map(|e| e.name.as_str())
    }

    pub fn find(&self, name: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.name == name)
    }

    /// Rate and category for a name; unknown names pay nothing and settle in cash
    pub fn rate_and_category(&self, name: &str) -> (f64, PayCategory) {
        match self.find(name) {
            Some(employee) => (employee.rate, employee.category),
            None => {
                debug!("No staff entry for {}, using rate 0 and cash", name);
                (0.0, PayCategory::Cash)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }
}

/// Start and end of one shift cell, both unset when there is no shift
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftCell {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl ShiftCell {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: Some(start.into()),
            end: Some(end.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        let blank = |v: &Option<String>| v.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.start) && blank(&self.end)
    }

    /// Wage outcome of this cell at the given rate
    pub fn outcome(&self, rate: f64) -> ShiftOutcome {
        compute_shift_wage(self.start.as_deref(), self.end.as_deref(), rate)
    }

    /// Format the shift as a human-readable string
    pub fn format(&self) -> String {
        match (self.start.as_deref(), self.end.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                format!("{} - {}", start, end)
            }
            (Some(start), _) if !start.is_empty() => format!("Starting at {}", start),
            (_, Some(end)) if !end.is_empty() => format!("Ending at {}", end),
            _ => "No shift".to_string(),
        }
    }
}

/// One employee's line in the weekly roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    pub employee: String,
    /// Indexed by `Weekday::index`, Monday first
    #[serde(default)]
    pub shifts: [ShiftCell; 7],
}

impl RosterRow {
    /// Row with every cell empty
    pub fn new(employee: impl Into<String>) -> Self {
        Self {
            employee: employee.into(),
            shifts: Default::default(),
        }
    }

    pub fn cell(&self, day: Weekday) -> &ShiftCell {
        &self.shifts[day.index()]
    }

    pub fn cell_mut(&mut self, day: Weekday) -> &mut ShiftCell {
        &mut self.shifts[day.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.iter().all(ShiftCell::is_empty)
    }
}

/// Materialized roster table for one week
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(default)]
    pub rows: Vec<RosterRow>,
}

impl RosterSnapshot {
    /// One empty row per employee in the directory
    pub fn empty_for(staff: &StaffDirectory) -> Self {
        Self {
            rows: staff.names().map(RosterRow::new).collect(),
        }
    }

    pub fn row(&self, employee: &str) -> Option<&RosterRow> {
        self.rows.iter().find(|r| r.employee == employee)
    }

    pub fn row_mut(&mut self, employee: &str) -> Option<&mut RosterRow> {
        self.rows.iter_mut().find(|r| r.employee == employee)
    }

    /// Reject snapshots listing the same employee twice
    pub fn validate(&self) -> RosterResult<()> {
        let mut seen = HashSet::new();
        for row in &self.rows {
            if !seen.insert(row.employee.as_str()) {
                return Err(validation_error(&format!(
                    "Employee {} appears more than once in the roster",
                    row.employee
                )));
            }
        }
        Ok(())
    }
}

/// Revenue per weekday; a missing day counts as zero
pub type RevenueMap = BTreeMap<Weekday, f64>;

/// Revenue recorded for a day, zero when unset
pub fn revenue_for(revenue: &RevenueMap, day: Weekday) -> f64 {
    revenue.get(&day).copied().unwrap_or(0.0)
}

/// Reject negative or non-finite revenue figures
pub fn validate_revenue(revenue: &RevenueMap) -> RosterResult<()> {
    for (day, amount) in revenue {
        validate_amount(*day, *amount)?;
    }
    Ok(())
}

pub(crate) fn validate_amount(day: Weekday, amount: f64) -> RosterResult<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(validation_error(&format!(
            "Invalid revenue {} for {}",
            amount, day
        )));
    }
    Ok(())
}

/// Everything stored for one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekRecord {
    pub week: WeekKey,
    pub snapshot: RosterSnapshot,
    #[serde(default)]
    pub revenue: RevenueMap,
}

impl WeekRecord {
    pub fn new(week: WeekKey, snapshot: RosterSnapshot, revenue: RevenueMap) -> Self {
        Self {
            week,
            snapshot,
            revenue,
        }
    }
}

/// A request to change one roster cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftEdit {
    pub employee: String,
    pub day: Weekday,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}
