use std::fmt;

/// Largest value a single cell can hold.
pub const MAX_HOURS_PER_DAY: f64 = 24.0;

const QUARTERS_PER_HOUR: f64 = 4.0;

/// Hours worked on one day, stored as whole quarter hours (0..=96).
///
/// Storing quarters keeps row and week totals exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours(u8);

impl Hours {
    pub const ZERO: Hours = Hours(0);
    pub const MAX: Hours = Hours(96);

    /// Normalize raw input: clamp to [0, 24] and round to the nearest quarter.
    ///
    /// Non-numeric input (NaN) counts as zero.
    pub fn from_input(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }

        let clamped = value.clamp(0.0, MAX_HOURS_PER_DAY);
        Self((clamped * QUARTERS_PER_HOUR).round() as u8)
    }

    pub fn from_quarters(quarters: u8) -> Option<Self> {
        (quarters <= Self::MAX.0).then_some(Self(quarters))
    }

    pub fn quarters(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / QUARTERS_PER_HOUR
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

/// Sum of quarter hours, converted to hours.
pub fn sum_hours<I: IntoIterator<Item = Hours>>(hours: I) -> f64 {
    let quarters: u32 = hours.into_iter().map(|h| u32::from(h.quarters())).sum();
    f64::from(quarters) / QUARTERS_PER_HOUR
}
