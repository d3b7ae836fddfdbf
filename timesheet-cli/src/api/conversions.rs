use timesheet_core::{
    CreateEntryRequest, CurrentUser, EmployeeId, EntryId, Hours, Project, ProjectId, Role,
    TimesheetEntry,
};

/// Convert the backend's current-user payload to a domain user.
pub fn to_domain_user(user: timesheet_api::CurrentUser) -> CurrentUser {
    let role: Role = user.role.parse().unwrap_or_default();
    CurrentUser {
        employee_id: EmployeeId::new(user.employee_id),
        name: user.employee_name,
        department: user.department,
        role,
        is_active: user.is_active,
    }
}

pub fn to_domain_project(project: timesheet_api::Project) -> Project {
    Project::new(project.id, project.name, project.billable)
}

/// Convert a stored timesheet to a domain entry.
///
/// Hours are normalized to quarter hours like any grid input.
pub fn to_domain_entry(timesheet: timesheet_api::Timesheet) -> TimesheetEntry {
    TimesheetEntry {
        id: EntryId::new(timesheet.id),
        project_id: ProjectId::new(timesheet.project),
        project_name: timesheet.project_name,
        activity: timesheet.activity_type,
        date: timesheet.date,
        hours: Hours::from_input(timesheet.hours_worked),
        description: timesheet.description,
    }
}

pub fn to_payload(request: &CreateEntryRequest) -> timesheet_api::TimesheetPayload {
    timesheet_api::TimesheetPayload::new(
        request.employee_id.to_string(),
        request.project_id.as_i64(),
        request.activity.clone(),
        request.date,
        request.hours.as_f64(),
        request.description.clone(),
    )
}
