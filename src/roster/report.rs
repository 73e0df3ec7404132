use super::models::{revenue_for, PayCategory, RevenueMap, RosterSnapshot, StaffDirectory};
use super::time::Weekday;
use super::wage::{round2, ShiftOutcome};
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals for one employee across the week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeTotals {
    pub employee: String,
    pub category: PayCategory,
    pub hours: f64,
    pub pay: f64,
}

/// A cell whose times could not be read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedCell {
    pub employee: String,
    pub day: Weekday,
    pub reason: String,
}

/// Hours, wages and labor cost for one week
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub per_day_hours: BTreeMap<Weekday, f64>,
    pub per_day_pay: BTreeMap<Weekday, f64>,
    pub cash_total: f64,
    pub transfer_total: f64,
    /// Pay as a percentage of revenue, 0 when there was no revenue
    pub labor_percent_by_day: BTreeMap<Weekday, f64>,
    pub per_employee: Vec<EmployeeTotals>,
    pub total_hours: f64,
    pub total_pay: f64,
    pub total_revenue: f64,
    pub labor_percent_total: f64,
    pub malformed_cells: Vec<MalformedCell>,
}

/// Labor cost as a percentage of revenue, 0 when revenue is 0
pub fn labor_percent(pay: f64, revenue: f64) -> f64 {
    if revenue <= 0.0 {
        return 0.0;
    }
    round2(pay / revenue * 100.0)
}

fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

// Hours are tracked in hundredths and money in cents so the totals add up exactly
#[derive(Default)]
struct Tally {
    day_hours: [i64; 7],
    day_pay: [i64; 7],
    cash: i64,
    transfer: i64,
    employees: Vec<EmployeeTotals>,
    malformed: Vec<MalformedCell>,
}

/// Fold a roster into a weekly report, pricing every cell with the wage rule
pub fn aggregate(
    snapshot: &RosterSnapshot,
    staff: &StaffDirectory,
    revenue: &RevenueMap,
) -> WeeklyReport {
    let tally = snapshot.rows.iter().fold(Tally::default(), |mut tally, row| {
        let (rate, category) = staff.rate_and_category(&row.employee);
        let mut hours: i64 = 0;
        let mut pay: i64 = 0;

        for day in Weekday::ALL {
            let outcome = row.cell(day).outcome(rate);
            if let ShiftOutcome::Malformed { reason } = &outcome {
                tally.malformed.push(MalformedCell {
                    employee: row.employee.clone(),
                    day,
                    reason: reason.clone(),
                });
            }

            let wage = outcome.wage();
            let slot = day.index();
            tally.day_hours[slot] = tally.day_hours[slot].saturating_add(wage.hour_hundredths());
            tally.day_pay[slot] = tally.day_pay[slot].saturating_add(wage.pay_cents());
            hours = hours.saturating_add(wage.hour_hundredths());
            pay = pay.saturating_add(wage.pay_cents());
        }

        match category {
            PayCategory::Cash => tally.cash = tally.cash.saturating_add(pay),
            PayCategory::Transfer => tally.transfer = tally.transfer.saturating_add(pay),
        }
        tally.employees.push(EmployeeTotals {
            employee: row.employee.clone(),
            category,
            hours: from_cents(hours),
            pay: from_cents(pay),
        });

        tally
    });

    let mut per_day_hours = BTreeMap::new();
    let mut per_day_pay = BTreeMap::new();
    let mut labor_percent_by_day = BTreeMap::new();
    for day in Weekday::ALL {
        let pay = from_cents(tally.day_pay[day.index()]);
        per_day_hours.insert(day, from_cents(tally.day_hours[day.index()]));
        per_day_pay.insert(day, pay);
        labor_percent_by_day.insert(day, labor_percent(pay, revenue_for(revenue, day)));
    }

    let total_pay = from_cents(tally.cash.saturating_add(tally.transfer));
    let total_revenue = round2(Weekday::ALL.iter().map(|d| revenue_for(revenue, *d)).sum());

    WeeklyReport {
        per_day_hours,
        per_day_pay,
        cash_total: from_cents(tally.cash),
        transfer_total: from_cents(tally.transfer),
        labor_percent_by_day,
        per_employee: tally.employees,
        total_hours: from_cents(
            tally
                .day_hours
                .iter()
                .fold(0, |acc, hours| acc.saturating_add(*hours)),
        ),
        total_pay,
        total_revenue,
        labor_percent_total: labor_percent(total_pay, total_revenue),
        malformed_cells: tally.malformed,
    }
}
