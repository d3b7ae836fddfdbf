use time::{Date, OffsetDateTime, UtcOffset};

/// Source of "today" for the date lock.
pub trait Clock: Send + Sync {
    fn today(&self) -> Date;
}

/// Today's date in the local time zone, falling back to UTC when the local
/// offset cannot be determined.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        let now = OffsetDateTime::now_utc();
        match UtcOffset::current_local_offset() {
            Ok(offset) => now.to_offset(offset).date(),
            Err(_) => now.date(),
        }
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn today(&self) -> Date {
        self.0
    }
}
