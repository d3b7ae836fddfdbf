use async_trait::async_trait;
use time::Date;

use crate::{
    error::BackendError,
    models::{CreateEntryRequest, CurrentUser, EmployeeId, EntryId, Project, ProjectId, TimesheetEntry},
};

/// Outbound port to the timesheet backend.
///
/// The backend owns authentication and persistence; the grid only reads
/// entries and catalogs and creates new entries.
#[async_trait]
pub trait TimesheetBackend: Send + Sync + 'static {
    /// The employee behind the current session.
    async fn current_user(&self) -> Result<CurrentUser, BackendError>;

    /// Entries of `employee` between `from` and `to`, both inclusive.
    async fn fetch_timesheets(
        &self,
        employee: &EmployeeId,
        from: Date,
        to: Date,
    ) -> Result<Vec<TimesheetEntry>, BackendError>;

    /// Create one entry and return its server id.
    async fn create_timesheet_entry(
        &self,
        request: &CreateEntryRequest,
    ) -> Result<EntryId, BackendError>;

    async fn fetch_active_projects(&self) -> Result<Vec<Project>, BackendError>;

    async fn fetch_project_activities(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<String>, BackendError>;
}
