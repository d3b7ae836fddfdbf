use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use time::Date;

use timesheet_core::{
    BackendError, CreateEntryRequest, CurrentUser, EmployeeId, EntryId, Hours, Project,
    ProjectId, Role, TimesheetBackend, TimesheetEntry, WeekWindow,
};

const DEV_EMPLOYEE: &str = "EMP001";

/// In-memory backend for `--dev` runs. Seeded with two weeks of entries
/// around `today`; created entries live until the process exits.
#[derive(Debug, Clone)]
pub struct DevBackend {
    store: Arc<Mutex<DevStore>>,
}

#[derive(Debug)]
struct DevStore {
    entries: Vec<TimesheetEntry>,
    next_id: i64,
}

impl DevBackend {
    pub fn new(today: Date) -> Self {
        let entries = seed_dev_entries(today);
        let next_id = entries.len() as i64 + 1;
        Self {
            store: Arc::new(Mutex::new(DevStore { entries, next_id })),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, DevStore>, BackendError> {
        self.store
            .lock()
            .map_err(|_| BackendError::unknown("dev store lock poisoned"))
    }
}

fn dev_projects() -> Vec<Project> {
    vec![
        Project::new(1, "Apollo", true),
        Project::new(2, "Internal", false),
        Project::new(3, "Website Redesign", true),
    ]
}

fn dev_activities(project_id: ProjectId) -> Vec<String> {
    let activities: &[&str] = match project_id.as_i64() {
        1 => &["Development", "Code Review", "Meetings"],
        2 => &["Support", "Training"],
        3 => &["Design", "Development"],
        _ => &[],
    };
    activities.iter().map(|a| a.to_string()).collect()
}

fn project_name(project_id: ProjectId) -> String {
    dev_projects()
        .into_iter()
        .find(|p| p.id == project_id)
        .map(|p| p.name)
        .unwrap_or_default()
}

fn seed_dev_entries(today: Date) -> Vec<TimesheetEntry> {
    let this_week = WeekWindow::containing(today);
    let last_week = this_week.shift_weeks(-1);

    let mut plan: Vec<(Date, i64, &str, f64)> = Vec::new();
    for (i, day) in last_week.days().iter().take(5).enumerate() {
        plan.push((*day, 1, "Development", 6.0));
        if i % 2 == 0 {
            plan.push((*day, 2, "Support", 2.0));
        } else {
            plan.push((*day, 3, "Design", 2.0));
        }
    }
    // Only days that already happened this week.
    for day in this_week.days().iter().take(5).filter(|d| **d < today) {
        plan.push((*day, 1, "Development", 7.5));
    }

    plan.into_iter()
        .enumerate()
        .map(|(i, (date, project, activity, hours))| {
            let project_id = ProjectId::new(project);
            TimesheetEntry {
                id: EntryId::new(i as i64 + 1),
                project_id,
                project_name: project_name(project_id),
                activity: activity.to_string(),
                date,
                hours: Hours::from_input(hours),
                description: None,
            }
        })
        .collect()
}

#[async_trait]
impl TimesheetBackend for DevBackend {
    async fn current_user(&self) -> Result<CurrentUser, BackendError> {
        Ok(CurrentUser {
            employee_id: EmployeeId::new(DEV_EMPLOYEE),
            name: "Dev User".to_string(),
            department: "Engineering".to_string(),
            role: Role::Employee,
            is_active: true,
        })
    }

    async fn fetch_timesheets(
        &self,
        _employee: &EmployeeId,
        from: Date,
        to: Date,
    ) -> Result<Vec<TimesheetEntry>, BackendError> {
        Ok(self
            .lock()?
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
        let mut store = self.lock()?;
        let id = EntryId::new(store.next_id);
        store.next_id += 1;
        store.entries.push(TimesheetEntry {
            id,
            project_id: request.project_id,
            project_name: project_name(request.project_id),
            activity: request.activity.clone(),
            date: request.date,
            hours: request.hours,
            description: (!request.description.is_empty()).then(|| request.description.clone()),
        });
        Ok(id)
    }

    async fn fetch_active_projects(&self) -> Result<Vec<Project>, BackendError> {
        Ok(dev_projects())
    }

    async fn fetch_project_activities(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<String>, BackendError> {
        Ok(dev_activities(project_id))
    }
}
