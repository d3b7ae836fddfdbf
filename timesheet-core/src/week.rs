use time::{Date, Duration, Month, Weekday};

pub const DAYS_IN_WEEK: usize = 7;

pub const DAY_NAMES: [&str; DAYS_IN_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// The Monday-Sunday week containing an anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    anchor: Date,
    days: [Date; DAYS_IN_WEEK],
}

impl WeekWindow {
    pub fn containing(anchor: Date) -> Self {
        let offset = i64::from(anchor.weekday().number_days_from_monday());
        let monday = anchor.saturating_sub(Duration::days(offset));

        let mut days = [monday; DAYS_IN_WEEK];
        for (i, day) in days.iter_mut().enumerate() {
            *day = monday.saturating_add(Duration::days(i as i64));
        }

        Self { anchor, days }
    }

    pub fn anchor(&self) -> Date {
        self.anchor
    }

    pub fn days(&self) -> [Date; DAYS_IN_WEEK] {
        self.days
    }

    pub fn day(&self, index: usize) -> Option<Date> {
        self.days.get(index).copied()
    }

    pub fn first(&self) -> Date {
        self.days[0]
    }

    pub fn last(&self) -> Date {
        self.days[DAYS_IN_WEEK - 1]
    }

    /// `YYYY-MM-DD` of the Monday, for range queries.
    pub fn first_iso(&self) -> String {
        self.first().to_string()
    }

    /// `YYYY-MM-DD` of the Sunday, for range queries.
    pub fn last_iso(&self) -> String {
        self.last().to_string()
    }

    pub fn contains(&self, date: Date) -> bool {
        self.index_of(date).is_some()
    }

    pub fn index_of(&self, date: Date) -> Option<usize> {
        self.days.iter().position(|d| *d == date)
    }

    pub fn is_weekend(&self, index: usize) -> bool {
        self.day(index)
            .is_some_and(|d| matches!(d.weekday(), Weekday::Saturday | Weekday::Sunday))
    }

    /// Move the anchor by whole weeks.
    pub fn shift_weeks(&self, weeks: i64) -> Self {
        Self::containing(self.anchor.saturating_add(Duration::weeks(weeks)))
    }

    /// Move the anchor by calendar months, clamping the day to the target
    /// month's length (Jan 31 + 1 month = Feb 29 in a leap year).
    pub fn shift_months(&self, months: i32) -> Self {
        let current = self.anchor.year() * 12 + i32::from(self.anchor.month() as u8) - 1;
        let target = current + months;
        let year = target.div_euclid(12);
        let month_number = (target.rem_euclid(12) + 1) as u8;

        let anchor = Month::try_from(month_number)
            .ok()
            .and_then(|month| {
                let day = self
                    .anchor
                    .day()
                    .min(time::util::days_in_year_month(year, month));
                Date::from_calendar_date(year, month, day).ok()
            })
            .unwrap_or(self.anchor);

        Self::containing(anchor)
    }

    /// `dd/mm/yyyy - dd/mm/yyyy`.
    pub fn range_label(&self) -> String {
        format!("{} - {}", format_dmy(self.first()), format_dmy(self.last()))
    }
}

fn format_dmy(date: Date) -> String {
    format!(
        "{:02}/{:02}/{}",
        date.day(),
        date.month() as u8,
        date.year()
    )
}
