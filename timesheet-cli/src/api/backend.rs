use async_trait::async_trait;
use time::Date;

use timesheet_api::{ApiError, DateFilter, TimesheetClient};
use timesheet_core::{
    BackendError, CreateEntryRequest, CurrentUser, EmployeeId, EntryId, Project, ProjectId,
    TimesheetBackend, TimesheetEntry,
};

use super::conversions::{to_domain_entry, to_domain_project, to_domain_user, to_payload};

/// Adapter that wraps the REST client to implement the backend port.
pub struct HttpBackend {
    client: TimesheetClient,
}

impl HttpBackend {
    pub fn new(client: TimesheetClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TimesheetBackend for HttpBackend {
    async fn current_user(&self) -> Result<CurrentUser, BackendError> {
        let user = self
            .client
            .fetch_current_user()
            .await
            .map_err(map_api_error)?;
        Ok(to_domain_user(user))
    }

    async fn fetch_timesheets(
        &self,
        employee: &EmployeeId,
        from: Date,
        to: Date,
    ) -> Result<Vec<TimesheetEntry>, BackendError> {
        // The listing is scoped to the session's own employee.
        tracing::debug!("Fetching timesheets of {} from {} to {}", employee, from, to);
        let timesheets = self
            .client
            .fetch_my_timesheets(&DateFilter::new(from, to))
            .await
            .map_err(map_api_error)?;
        Ok(timesheets.into_iter().map(to_domain_entry).collect())
    }

    async fn create_timesheet_entry(
        &self,
        request: &CreateEntryRequest,
    ) -> Result<EntryId, BackendError> {
        let id = self
            .client
            .create_timesheet(&to_payload(request))
            .await
            .map_err(map_api_error)?;
        Ok(EntryId::new(id))
    }

    async fn fetch_active_projects(&self) -> Result<Vec<Project>, BackendError> {
        let projects = self
            .client
            .fetch_active_projects()
            .await
            .map_err(map_api_error)?;
        Ok(projects.into_iter().map(to_domain_project).collect())
    }

    async fn fetch_project_activities(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<String>, BackendError> {
        self.client
            .fetch_project_activities(project_id.as_i64())
            .await
            .map_err(map_api_error)
    }
}

fn map_api_error(e: ApiError) -> BackendError {
    match e {
        ApiError::Unauthorized => BackendError::Auth,
        ApiError::Rejected { message, .. } => BackendError::validation(message),
        ApiError::ResponseError(msg) => BackendError::network(msg),
        other => BackendError::unknown(other.to_string()),
    }
}
