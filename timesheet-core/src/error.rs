use thiserror::Error;
use time::Date;

use crate::models::RowId;

/// Errors reported by a [`TimesheetBackend`](crate::TimesheetBackend).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("authentication failed")]
    Auth,
    #[error("network error: {0}")]
    Network(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unknown(String),
}

impl BackendError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}

/// Why a grid cell cannot be edited in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockReason {
    /// The cell's date is after today.
    FutureDate,
    /// The cell already holds a server entry.
    AlreadyPersisted,
}

impl LockReason {
    pub fn message(&self) -> &'static str {
        match self {
            LockReason::FutureDate => "Cannot edit timesheets for future dates.",
            LockReason::AlreadyPersisted => "Cannot edit existing timesheet entries.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", .reason.message())]
pub struct LockedCellError {
    pub reason: LockReason,
}

impl From<LockReason> for LockedCellError {
    fn from(reason: LockReason) -> Self {
        Self { reason }
    }
}

/// Errors from grid edits (hours, project/activity selection, rows).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error(transparent)]
    Locked(#[from] LockedCellError),
    #[error("row not found: {0}")]
    RowNotFound(RowId),
    #[error("day index out of range: {0}")]
    DayOutOfRange(usize),
    #[error("project and activity of an existing row cannot be changed")]
    ExistingRow(RowId),
    #[error("the last row cannot be removed")]
    LastRow,
    #[error("the grid cannot be edited while a submission is in progress")]
    SubmitInProgress,
}

/// Field validation of a create request, checked before the backend is called.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("employee id is missing")]
    MissingEmployee,
    #[error("project is missing")]
    MissingProject,
    #[error("activity is missing")]
    MissingActivity,
    #[error("hours must be greater than zero")]
    ZeroHours,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("No valid timesheet entries to submit")]
    NothingToSubmit,
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error("invalid entry for row {row}: {source}")]
    Invalid {
        row: RowId,
        #[source]
        source: ValidationError,
    },
    #[error("Failed to save timesheet for {date}: {source}")]
    Partial {
        row: RowId,
        date: Date,
        #[source]
        source: BackendError,
    },
    #[error("the week was reloaded while the submission was in flight")]
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("User not authenticated")]
    NotAuthenticated,
    #[error("Failed to load data: {0}")]
    Load(#[from] BackendError),
}
