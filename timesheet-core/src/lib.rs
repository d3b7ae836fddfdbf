//! Weekly timesheet grid: which cells may be edited, which edits are still
//! unsaved, and which of them must be created on the backend.

pub mod clock;
pub mod error;
pub mod models;
pub mod ports;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod submit;
pub mod totals;
pub mod week;

#[cfg(test)]
mod mock;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{
    BackendError, GridError, LockReason, LockedCellError, SessionError, SubmitError,
    ValidationError,
};
pub use models::*;
pub use ports::TimesheetBackend;
pub use reconcile::{HourUpdate, ReconciliationEngine};
pub use session::TimesheetSession;
pub use store::TimesheetRowStore;
pub use submit::{
    CreatedCell, PlannedCell, PlannedRow, RowOutcome, SubmitCoordinator, SubmitFailure,
    SubmitOutcome, SubmitPlan, SubmitReport,
};
pub use totals::{WeekTotals, STANDARD_WEEK_HOURS};
pub use week::{WeekWindow, DAYS_IN_WEEK, DAY_NAMES};
