//! In-memory backend for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use time::Date;

use crate::{
    error::BackendError,
    models::{
        CreateEntryRequest, CurrentUser, EmployeeId, EntryId, Project, ProjectId, Role,
        TimesheetEntry,
    },
    ports::TimesheetBackend,
};

#[derive(Default)]
struct MockState {
    entries: Vec<TimesheetEntry>,
    create_calls: Vec<CreateEntryRequest>,
    fetch_calls: usize,
    next_id: i64,
}

/// Mock backend that keeps created entries in memory.
///
/// Create calls are recorded for assertions; failures are injected per call
/// number so partial batches can be exercised.
#[derive(Clone, Default)]
pub struct MockBackend {
    user: Option<CurrentUser>,
    projects: Vec<Project>,
    activities: HashMap<ProjectId, Vec<String>>,
    failing_activities: HashSet<ProjectId>,
    /// 1-based create call numbers that fail.
    failing_creates: HashSet<usize>,
    fail_fetch: bool,
    state: Arc<RwLock<MockState>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState {
                next_id: 100,
                ..MockState::default()
            })),
            ..Self::default()
        }
    }

    pub fn user() -> CurrentUser {
        CurrentUser {
            employee_id: EmployeeId::new("EMP001"),
            name: "Ada Lovelace".to_string(),
            department: "Engineering".to_string(),
            role: Role::Employee,
            is_active: true,
        }
    }

    /// Backend with the default signed-in employee.
    pub fn signed_in() -> Self {
        Self::new().with_user(Self::user())
    }

    pub fn with_user(mut self, user: CurrentUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    pub fn with_activities(mut self, project: i64, activities: &[&str]) -> Self {
        self.activities.insert(
            ProjectId::new(project),
            activities.iter().map(|a| a.to_string()).collect(),
        );
        self
    }

    pub fn with_entries(self, entries: Vec<TimesheetEntry>) -> Self {
        self.state.write().unwrap().entries.extend(entries);
        self
    }

    pub fn failing_activities(mut self, project: i64) -> Self {
        self.failing_activities.insert(ProjectId::new(project));
        self
    }

    pub fn failing_create(mut self, call: usize) -> Self {
        self.failing_creates.insert(call);
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn create_calls(&self) -> Vec<CreateEntryRequest> {
        self.state.read().unwrap().create_calls.clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.state.read().unwrap().fetch_calls
    }

    pub fn entries(&self) -> Vec<TimesheetEntry> {
        self.state.read().unwrap().entries.clone()
    }
}

#[async_trait]
impl TimesheetBackend for MockBackend {
    async fn current_user(&self) -> Result<CurrentUser, BackendError> {
        self.user.clone().ok_or(BackendError::Auth)
    }

    async fn fetch_timesheets(
        &self,
        employee: &EmployeeId,
        from: Date,
        to: Date,
    ) -> Result<Vec<TimesheetEntry>, BackendError> {
        let mut state = self.state.write().unwrap();
        state.fetch_calls += 1;
        if self.fail_fetch {
            return Err(BackendError::network("connection refused"));
        }
        if self.user.as_ref().map(|u| &u.employee_id) != Some(employee) {
            return Err(BackendError::Auth);
        }

        Ok(state
            .entries
            .iter()
            .filter(|e| e.date >= from && e.date <= to)
            .cloned()
            .collect())
    }

    async fn create_timesheet_entry(
        &self,
        request: &CreateEntryRequest,
    ) -> Result<EntryId, BackendError> {
        let mut state = self.state.write().unwrap();
        state.create_calls.push(request.clone());
        if self.failing_creates.contains(&state.create_calls.len()) {
            return Err(BackendError::validation("rejected by backend"));
        }

        state.next_id += 1;
        let id = EntryId::new(state.next_id);
        let project_name = self
            .projects
            .iter()
            .find(|p| p.id == request.project_id)
            .map(|p| p.name.clone())
            .unwrap_or_default();
        state.entries.push(TimesheetEntry {
            id,
            project_id: request.project_id,
            project_name,
            activity: request.activity.clone(),
            date: request.date,
            hours: request.hours,
            description: None,
        });

        Ok(id)
    }

    async fn fetch_active_projects(&self) -> Result<Vec<Project>, BackendError> {
        Ok(self.projects.clone())
    }

    async fn fetch_project_activities(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<String>, BackendError> {
        if self.failing_activities.contains(&project_id) {
            return Err(BackendError::network("timed out"));
        }
        Ok(self.activities.get(&project_id).cloned().unwrap_or_default())
    }
}
