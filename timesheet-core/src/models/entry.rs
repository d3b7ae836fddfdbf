use time::Date;

use super::{EmployeeId, EntryId, Hours, ProjectId};
use crate::error::ValidationError;

/// A timesheet entry stored on the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetEntry {
    pub id: EntryId,
    pub project_id: ProjectId,
    pub project_name: String,
    pub activity: String,
    pub date: Date,
    pub hours: Hours,
    pub description: Option<String>,
}

/// Request to create one day's entry.
///
/// Built through [`CreateEntryRequest::new`], which validates every field
/// before anything reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEntryRequest {
    pub employee_id: EmployeeId,
    pub project_id: ProjectId,
    pub activity: String,
    pub date: Date,
    pub hours: Hours,
    pub description: String,
}

impl CreateEntryRequest {
    pub fn new(
        employee_id: EmployeeId,
        project_id: Option<ProjectId>,
        activity: impl Into<String>,
        date: Date,
        hours: Hours,
    ) -> Result<Self, ValidationError> {
        if employee_id.as_str().trim().is_empty() {
            return Err(ValidationError::MissingEmployee);
        }
        let project_id = project_id.ok_or(ValidationError::MissingProject)?;
        let activity = activity.into();
        if activity.trim().is_empty() {
            return Err(ValidationError::MissingActivity);
        }
        if hours.is_zero() {
            return Err(ValidationError::ZeroHours);
        }

        Ok(Self {
            employee_id,
            project_id,
            activity,
            date,
            hours,
            description: String::new(),
        })
    }
}
