use std::sync::Arc;

use time::Date;

use crate::{
    clock::{Clock, SystemClock},
    error::{BackendError, GridError, SessionError, SubmitError},
    models::{CurrentUser, EmployeeId, ProjectCatalog, RowId, TimesheetRow},
    ports::TimesheetBackend,
    reconcile::{HourUpdate, ReconciliationEngine},
    store::TimesheetRowStore,
    submit::{SubmitCoordinator, SubmitOutcome, SubmitPlan, SubmitReport},
    totals::{WeekTotals, STANDARD_WEEK_HOURS},
    week::WeekWindow,
};

/// The signed-in user's view of one week.
///
/// Owns the week anchor, the user, the project catalog and the grid. Every
/// reload or week change bumps a generation; submit results planned against
/// an older generation are discarded.
pub struct TimesheetSession<B: TimesheetBackend, C: Clock = SystemClock> {
    backend: Arc<B>,
    clock: C,
    user: Option<CurrentUser>,
    catalog: ProjectCatalog,
    store: TimesheetRowStore,
    generation: u64,
    submitting: bool,
    overtime_threshold: f64,
}

impl<B: TimesheetBackend> TimesheetSession<B, SystemClock> {
    pub fn with_system_clock(backend: Arc<B>) -> Self {
        Self::new(backend, SystemClock)
    }
}

impl<B: TimesheetBackend, C: Clock> TimesheetSession<B, C> {
    /// A session anchored on today, with nothing loaded yet.
    pub fn new(backend: Arc<B>, clock: C) -> Self {
        let window = WeekWindow::containing(clock.today());
        Self {
            backend,
            clock,
            user: None,
            catalog: ProjectCatalog::default(),
            store: TimesheetRowStore::empty(window),
            generation: 0,
            submitting: false,
            overtime_threshold: STANDARD_WEEK_HOURS,
        }
    }

    pub fn with_overtime_threshold(mut self, hours: f64) -> Self {
        self.overtime_threshold = hours;
        self
    }

    /// Load the user, the project catalog and the current week.
    pub async fn initialize(&mut self) -> Result<(), SessionError> {
        let user = self.backend.current_user().await.map_err(session_error)?;
        tracing::info!("Signed in as {} ({})", user.name, user.employee_id);
        self.user = Some(user);

        self.load_catalog().await?;
        self.reload().await
    }

    /// Active projects and their activities.
    ///
    /// A project whose activities cannot be fetched keeps an empty list.
    pub async fn load_catalog(&mut self) -> Result<(), SessionError> {
        let projects = self
            .backend
            .fetch_active_projects()
            .await
            .map_err(session_error)?;
        let mut catalog = ProjectCatalog::new(projects.clone());

        for project in &projects {
            match self.backend.fetch_project_activities(project.id).await {
                Ok(activities) => catalog.set_activities(project.id, activities),
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch activities for project {}: {}",
                        project.name,
                        e
                    );
                    catalog.set_activities(project.id, Vec::new());
                }
            }
        }

        tracing::debug!("Loaded {} active projects", projects.len());
        self.catalog = catalog;
        Ok(())
    }

    /// Rebuild the grid from the backend for the current week.
    ///
    /// Unsaved edits are dropped. On failure the grid is reset to a single
    /// empty row.
    pub async fn reload(&mut self) -> Result<(), SessionError> {
        self.generation += 1;
        let window = *self.store.window();
        let employee = self.employee_id()?.clone();

        match self
            .backend
            .fetch_timesheets(&employee, window.first(), window.last())
            .await
        {
            Ok(entries) => {
                tracing::info!(
                    "Loaded {} entries for {}",
                    entries.len(),
                    window.range_label()
                );
                self.store = TimesheetRowStore::from_entries(window, &entries, &self.catalog);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load {}: {}", window.range_label(), e);
                self.store = TimesheetRowStore::empty(window);
                Err(session_error(e))
            }
        }
    }

    pub async fn navigate_weeks(&mut self, weeks: i64) -> Result<(), SessionError> {
        let window = self.store.window().shift_weeks(weeks);
        self.show(window).await
    }

    pub async fn navigate_months(&mut self, months: i32) -> Result<(), SessionError> {
        let window = self.store.window().shift_months(months);
        self.show(window).await
    }

    /// Show the week containing `date`.
    pub async fn go_to(&mut self, date: Date) -> Result<(), SessionError> {
        self.show(WeekWindow::containing(date)).await
    }

    async fn show(&mut self, window: WeekWindow) -> Result<(), SessionError> {
        self.store = TimesheetRowStore::empty(window);
        self.reload().await
    }

    /// Edit rules as of today.
    pub fn engine(&self) -> ReconciliationEngine {
        ReconciliationEngine::new(self.clock.today())
    }

    pub fn update_hours(
        &mut self,
        row: &RowId,
        day: usize,
        value: f64,
    ) -> Result<HourUpdate, GridError> {
        self.ensure_not_submitting()?;
        self.engine().update_hours(&mut self.store, row, day, value)
    }

    pub fn select_project(&mut self, row: &RowId, project_name: &str) -> Result<(), GridError> {
        self.ensure_not_submitting()?;
        self.engine()
            .select_project(&mut self.store, row, project_name, &self.catalog)
    }

    pub fn select_activity(&mut self, row: &RowId, activity: &str) -> Result<(), GridError> {
        self.ensure_not_submitting()?;
        self.engine().select_activity(&mut self.store, row, activity)
    }

    pub fn add_row(&mut self) -> Result<RowId, GridError> {
        self.ensure_not_submitting()?;
        Ok(self.store.add_row())
    }

    pub fn remove_row(&mut self, row: &RowId) -> Result<TimesheetRow, GridError> {
        self.ensure_not_submitting()?;
        self.store.remove_row(row)
    }

    /// The grid is frozen between `begin_submit` and `finish_submit`.
    fn ensure_not_submitting(&self) -> Result<(), GridError> {
        if self.submitting {
            return Err(GridError::SubmitInProgress);
        }
        Ok(())
    }

    /// Plan a submit and close the gate until it is finished or abandoned.
    pub fn begin_submit(&mut self) -> Result<SubmitPlan, SubmitError> {
        if self.submitting {
            return Err(SubmitError::AlreadySubmitting);
        }
        let employee = self
            .user
            .as_ref()
            .map(|u| &u.employee_id)
            .ok_or(SubmitError::NotAuthenticated)?;

        let plan = SubmitPlan::build(&self.store, employee, self.generation)?;
        self.submitting = true;
        Ok(plan)
    }

    /// A coordinator sharing this session's backend.
    pub fn coordinator(&self) -> SubmitCoordinator<B> {
        SubmitCoordinator::new(Arc::clone(&self.backend))
    }

    /// Apply a finished batch and open the gate again.
    pub fn finish_submit(
        &mut self,
        plan: &SubmitPlan,
        outcome: &SubmitOutcome,
    ) -> Result<SubmitReport, SubmitError> {
        self.submitting = false;
        outcome.apply(&mut self.store, self.generation, plan.skipped().len())
    }

    /// Reopen the gate for a plan that will not be executed.
    pub fn abandon_submit(&mut self) {
        self.submitting = false;
    }

    /// Create every pending cell of the qualifying rows.
    pub async fn submit(&mut self) -> Result<SubmitReport, SubmitError> {
        let plan = self.begin_submit()?;
        let outcome = self.coordinator().execute(&plan).await;
        self.finish_submit(&plan, &outcome)
    }

    pub fn totals(&self) -> WeekTotals {
        WeekTotals::compute(self.store.rows(), self.overtime_threshold)
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    pub fn employee_id(&self) -> Result<&EmployeeId, SessionError> {
        self.user
            .as_ref()
            .map(|u| &u.employee_id)
            .ok_or(SessionError::NotAuthenticated)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin())
    }

    pub fn catalog(&self) -> &ProjectCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &TimesheetRowStore {
        &self.store
    }

    pub fn rows(&self) -> &[TimesheetRow] {
        self.store.rows()
    }

    pub fn window(&self) -> &WeekWindow {
        self.store.window()
    }

    pub fn today(&self) -> Date {
        self.clock.today()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.store.has_unsaved_changes()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }
}

fn session_error(e: BackendError) -> SessionError {
    match e {
        BackendError::Auth => SessionError::NotAuthenticated,
        other => SessionError::Load(other),
    }
}
