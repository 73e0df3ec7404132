pub mod models;
pub mod report;
pub mod seed;
pub mod time;
pub mod wage;

pub use models::{
    revenue_for, Employee, PayCategory, RevenueMap, RosterRow, RosterSnapshot, ShiftCell,
    ShiftEdit, StaffDirectory, WeekRecord,
};
pub use report::{aggregate, WeeklyReport};
pub use seed::{initialize, SeedBook, SeedShift, SeedTemplate};
pub use time::{TimeOfDay, WeekKey, Weekday};
pub use wage::{compute_shift_wage, ShiftOutcome, ShiftWage};
