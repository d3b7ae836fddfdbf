use time::Date;

use super::{EntryId, Hours};
use crate::error::LockReason;

/// Lifecycle of a grid cell: `Empty -> Edited -> Persisted`.
///
/// There is no way back from `Persisted`; changing a stored entry goes
/// through the backend's update endpoint, not the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Empty,
    Edited(Hours),
    Persisted { id: EntryId, hours: Hours },
}

/// One day of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimesheetCell {
    date: Date,
    state: CellState,
}

impl TimesheetCell {
    pub fn empty(date: Date) -> Self {
        Self {
            date,
            state: CellState::Empty,
        }
    }

    pub fn persisted(date: Date, id: EntryId, hours: Hours) -> Self {
        Self {
            date,
            state: CellState::Persisted { id, hours },
        }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    pub fn hours(&self) -> Hours {
        match self.state {
            CellState::Empty => Hours::ZERO,
            CellState::Edited(hours) | CellState::Persisted { hours, .. } => hours,
        }
    }

    pub fn server_id(&self) -> Option<EntryId> {
        match self.state {
            CellState::Persisted { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        matches!(self.state, CellState::Persisted { .. })
    }

    /// Edited locally with hours that still have to be created on the backend.
    pub fn is_pending(&self) -> bool {
        matches!(self.state, CellState::Edited(hours) if !hours.is_zero())
    }

    /// Why this cell cannot be edited on `today`, if it cannot.
    ///
    /// An existing entry is reported before the future-date rule.
    pub fn lock_reason(&self, today: Date) -> Option<LockReason> {
        if self.is_persisted() {
            Some(LockReason::AlreadyPersisted)
        } else if self.date > today {
            Some(LockReason::FutureDate)
        } else {
            None
        }
    }

    /// Store new hours, returning whether the value changed.
    ///
    /// Callers check the lock first; a persisted cell is left untouched.
    pub(crate) fn set_hours(&mut self, hours: Hours) -> bool {
        if self.is_persisted() || self.hours() == hours {
            return false;
        }

        self.state = if hours.is_zero() {
            CellState::Empty
        } else {
            CellState::Edited(hours)
        };
        true
    }

    pub(crate) fn persist(&mut self, id: EntryId, hours: Hours) {
        self.state = CellState::Persisted { id, hours };
    }
}
