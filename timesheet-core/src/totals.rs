use crate::{
    models::{sum_hours, TimesheetRow},
    week::DAYS_IN_WEEK,
};

/// Scheduled hours per week; anything above counts as overtime.
pub const STANDARD_WEEK_HOURS: f64 = 40.0;

/// Hours summary of the visible week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekTotals {
    pub total: f64,
    pub billable: f64,
    pub non_billable: f64,
    /// Hours up to the overtime threshold.
    pub regular: f64,
    pub overtime: f64,
    pub per_day: [f64; DAYS_IN_WEEK],
}

impl WeekTotals {
    pub fn compute(rows: &[TimesheetRow], overtime_threshold: f64) -> Self {
        let total = sum_hours(rows.iter().flat_map(|r| r.hours()));
        let billable = sum_hours(
            rows.iter()
                .filter(|r| r.billable())
                .flat_map(|r| r.hours()),
        );

        let mut per_day = [0.0; DAYS_IN_WEEK];
        for (day, slot) in per_day.iter_mut().enumerate() {
            *slot = sum_hours(rows.iter().map(|r| r.hours()[day]));
        }

        Self {
            total,
            billable,
            non_billable: total - billable,
            regular: total.min(overtime_threshold),
            overtime: (total - overtime_threshold).max(0.0),
            per_day,
        }
    }
}
