use std::str::FromStr;

use time::{macros::format_description, Date};

use super::QueryFilter;

/// Inclusive date range used by the `my-timesheets` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFilter {
    pub from: Date,
    pub to: Date,
}

impl DateFilter {
    pub fn new(from: Date, to: Date) -> Self {
        Self { from, to }
    }
}

impl QueryFilter for DateFilter {
    fn as_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("date_from", self.from.to_string()),
            ("date_to", self.to.to_string()),
        ]
    }
}

impl FromStr for DateFilter {
    type Err = time::error::Parse;

    /// Parses `YYYY-MM-DD,YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = format_description!("[year]-[month]-[day]");
        let (from, to) = s.split_once(',').unwrap_or((s, s));
        let from = Date::parse(from.trim(), format)?;
        let to = Date::parse(to.trim(), format)?;

        Ok(Self { from, to })
    }
}
