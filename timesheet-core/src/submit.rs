use std::sync::Arc;

use time::Date;

use crate::{
    error::{BackendError, SubmitError},
    models::{CreateEntryRequest, EmployeeId, EntryId, Hours, RowId},
    ports::TimesheetBackend,
    store::TimesheetRowStore,
};

/// One create call to make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedCell {
    pub day: usize,
    pub request: CreateEntryRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRow {
    pub row_id: RowId,
    /// May be empty: a qualifying row without pending cells is only marked
    /// saved.
    pub cells: Vec<PlannedCell>,
}

/// The create calls for every qualifying row, taken from a snapshot of the
/// grid at `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitPlan {
    generation: u64,
    rows: Vec<PlannedRow>,
    skipped: Vec<RowId>,
}

impl SubmitPlan {
    /// Collect the rows that are unsaved, have both project and activity set
    /// and hold some hours.
    ///
    /// Unsaved rows missing a project or activity are left out and stay
    /// unsaved.
    pub fn build(
        store: &TimesheetRowStore,
        employee: &EmployeeId,
        generation: u64,
    ) -> Result<Self, SubmitError> {
        let mut rows = Vec::new();
        let mut skipped = Vec::new();

        for row in store.rows().iter().filter(|r| r.has_unsaved_changes()) {
            if !row.has_project_and_activity() {
                tracing::debug!("Skipping row {} without project or activity", row.id());
                skipped.push(row.id().clone());
                continue;
            }
            if !row.has_hours() {
                continue;
            }

            let cells = row
                .pending_cells()
                .map(|(day, cell)| {
                    CreateEntryRequest::new(
                        employee.clone(),
                        row.project_id(),
                        row.activity(),
                        cell.date(),
                        cell.hours(),
                    )
                    .map(|request| PlannedCell { day, request })
                    .map_err(|source| SubmitError::Invalid {
                        row: row.id().clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            rows.push(PlannedRow {
                row_id: row.id().clone(),
                cells,
            });
        }

        if rows.is_empty() {
            return Err(SubmitError::NothingToSubmit);
        }

        Ok(Self {
            generation,
            rows,
            skipped,
        })
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rows(&self) -> &[PlannedRow] {
        &self.rows
    }

    /// Unsaved rows left out for missing project or activity.
    pub fn skipped(&self) -> &[RowId] {
        &self.skipped
    }

    pub fn call_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedCell {
    pub day: usize,
    pub id: EntryId,
    /// The hours that were sent.
    pub hours: Hours,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub row_id: RowId,
    pub created: Vec<CreatedCell>,
    /// Every planned cell of the row was created.
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitFailure {
    pub row_id: RowId,
    pub date: Date,
    pub error: BackendError,
}

/// What a submit batch achieved before it finished or stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    generation: u64,
    rows: Vec<RowOutcome>,
    failure: Option<SubmitFailure>,
}

/// Summary of an applied batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitReport {
    /// Entries created on the backend.
    pub created: usize,
    pub rows_saved: usize,
    /// Unsaved rows that were not submitted.
    pub skipped: usize,
}

impl SubmitOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rows(&self) -> &[RowOutcome] {
        &self.rows
    }

    pub fn failure(&self) -> Option<&SubmitFailure> {
        self.failure.as_ref()
    }

    pub fn created(&self) -> usize {
        self.rows.iter().map(|r| r.created.len()).sum()
    }

    /// Write the created ids back into the grid.
    ///
    /// Cells that were created become persisted even when the batch failed
    /// later on; only rows whose cells all succeeded and that have no newer
    /// pending cells are marked saved. An
    /// outcome planned against another generation is discarded.
    pub fn apply(
        &self,
        store: &mut TimesheetRowStore,
        current_generation: u64,
        skipped: usize,
    ) -> Result<SubmitReport, SubmitError> {
        if self.generation != current_generation {
            tracing::warn!(
                "Discarding submit results of generation {} (now {})",
                self.generation,
                current_generation
            );
            return Err(SubmitError::Stale);
        }

        let mut report = SubmitReport {
            skipped,
            ..SubmitReport::default()
        };

        for outcome in &self.rows {
            let row = match store.row_mut(&outcome.row_id) {
                Ok(row) => row,
                Err(_) => {
                    tracing::warn!("Row {} is gone, dropping its results", outcome.row_id);
                    continue;
                }
            };

            for created in &outcome.created {
                if let Some(cell) = row.cell_mut(created.day) {
                    if cell.hours() != created.hours {
                        tracing::warn!(
                            "Cell {} of row {} changed while it was submitted; keeping the stored {}h",
                            created.day,
                            outcome.row_id,
                            created.hours
                        );
                    }
                    cell.persist(created.id, created.hours);
                    report.created += 1;
                }
            }

            // Cells edited after the plan was taken keep the row unsaved.
            if outcome.complete && row.pending_cells().next().is_none() {
                row.mark_saved();
                report.rows_saved += 1;
            }
        }

        match &self.failure {
            Some(failure) => Err(SubmitError::Partial {
                row: failure.row_id.clone(),
                date: failure.date,
                source: failure.error.clone(),
            }),
            None => Ok(report),
        }
    }
}

/// Sends planned entries to the backend, one create call per cell.
pub struct SubmitCoordinator<B: TimesheetBackend> {
    backend: Arc<B>,
}

impl<B: TimesheetBackend> SubmitCoordinator<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Run the plan in order, stopping at the first failed call.
    pub async fn execute(&self, plan: &SubmitPlan) -> SubmitOutcome {
        tracing::debug!(
            "Submitting {} entries across {} rows",
            plan.call_count(),
            plan.rows.len()
        );

        let mut rows = Vec::with_capacity(plan.rows.len());
        let mut failure = None;

        for planned in &plan.rows {
            let mut created = Vec::with_capacity(planned.cells.len());

            for cell in &planned.cells {
                match self.backend.create_timesheet_entry(&cell.request).await {
                    Ok(id) => created.push(CreatedCell {
                        day: cell.day,
                        id,
                        hours: cell.request.hours,
                    }),
                    Err(error) => {
                        tracing::error!(
                            "Failed to create entry for {} on {}: {}",
                            planned.row_id,
                            cell.request.date,
                            error
                        );
                        failure = Some(SubmitFailure {
                            row_id: planned.row_id.clone(),
                            date: cell.request.date,
                            error,
                        });
                        break;
                    }
                }
            }

            rows.push(RowOutcome {
                row_id: planned.row_id.clone(),
                created,
                complete: failure.is_none(),
            });

            if failure.is_some() {
                break;
            }
        }

        let outcome = SubmitOutcome {
            generation: plan.generation,
            rows,
            failure,
        };
        tracing::info!(
            "Created {} of {} entries",
            outcome.created(),
            plan.call_count()
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock::MockBackend,
        models::{CellState, Project, ProjectCatalog, ProjectId, TimesheetEntry},
        reconcile::ReconciliationEngine,
        week::WeekWindow,
    };
    use time::macros::date;

    const TODAY: time::Date = date!(2024 - 03 - 06);

    fn employee() -> EmployeeId {
        EmployeeId::new("EMP001")
    }

    fn catalog() -> ProjectCatalog {
        ProjectCatalog::new(vec![Project::new(1, "Apollo", true)])
    }

    /// A draft row on Apollo/Development with the given hours from Monday on.
    fn store_with(hours: &[f64]) -> TimesheetRowStore {
        let engine = ReconciliationEngine::new(TODAY);
        let mut store = TimesheetRowStore::empty(WeekWindow::containing(TODAY));
        let id = RowId::Draft(1);
        engine
            .select_project(&mut store, &id, "Apollo", &catalog())
            .unwrap();
        engine
            .select_activity(&mut store, &id, "Development")
            .unwrap();
        for (day, value) in hours.iter().enumerate() {
            engine.update_hours(&mut store, &id, day, *value).unwrap();
        }
        store
    }

    async fn submit(
        store: &mut TimesheetRowStore,
        backend: MockBackend,
    ) -> Result<SubmitReport, SubmitError> {
        let plan = SubmitPlan::build(store, &employee(), 0)?;
        let outcome = SubmitCoordinator::new(Arc::new(backend))
            .execute(&plan)
            .await;
        outcome.apply(store, 0, plan.skipped().len())
    }

    #[test]
    fn nothing_unsaved_is_nothing_to_submit() {
        let store = TimesheetRowStore::empty(WeekWindow::containing(TODAY));
        assert_eq!(
            SubmitPlan::build(&store, &employee(), 0),
            Err(SubmitError::NothingToSubmit)
        );
    }

    #[tokio::test]
    async fn nothing_unsaved_makes_no_calls() {
        let backend = MockBackend::signed_in();
        let mut store = TimesheetRowStore::empty(WeekWindow::containing(TODAY));

        let result = submit(&mut store, backend.clone()).await;

        assert_eq!(result, Err(SubmitError::NothingToSubmit));
        assert!(backend.create_calls().is_empty());
    }

    #[tokio::test]
    async fn both_cells_succeed() {
        let backend = MockBackend::signed_in();
        let mut store = store_with(&[4.0, 6.0]);

        let report = submit(&mut store, backend.clone()).await.unwrap();

        assert_eq!(report.created, 2);
        assert_eq!(report.rows_saved, 1);

        let calls = backend.create_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].date, date!(2024 - 03 - 04));
        assert_eq!(calls[0].hours, Hours::from_input(4.0));
        assert_eq!(calls[1].hours, Hours::from_input(6.0));

        let row = &store.rows()[0];
        assert!(row.cells()[0].is_persisted());
        assert!(row.cells()[1].is_persisted());
        assert!(!row.has_unsaved_changes());
        assert!(row.is_existing());
    }

    #[tokio::test]
    async fn second_call_fails() {
        let backend = MockBackend::signed_in().failing_create(2);
        let mut store = store_with(&[4.0, 6.0]);

        let result = submit(&mut store, backend.clone()).await;

        match result {
            Err(SubmitError::Partial { date, .. }) => assert_eq!(date, date!(2024 - 03 - 05)),
            other => panic!("expected a partial failure, got {:?}", other),
        }
        assert_eq!(backend.create_calls().len(), 2);

        let row = &store.rows()[0];
        assert!(row.cells()[0].is_persisted());
        assert_eq!(
            row.cells()[1].state(),
            CellState::Edited(Hours::from_input(6.0))
        );
        assert!(row.has_unsaved_changes());
        assert!(!row.is_existing());
    }

    #[tokio::test]
    async fn retry_after_failure_only_sends_remaining_cells() {
        let mut store = store_with(&[4.0, 6.0]);
        let failing = MockBackend::signed_in().failing_create(2);
        assert!(submit(&mut store, failing).await.is_err());

        let backend = MockBackend::signed_in();
        let report = submit(&mut store, backend.clone()).await.unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(backend.create_calls().len(), 1);
        assert_eq!(backend.create_calls()[0].date, date!(2024 - 03 - 05));
        assert!(!store.has_unsaved_changes());
    }

    #[tokio::test]
    async fn failure_stops_the_batch() {
        let engine = ReconciliationEngine::new(TODAY);
        let mut store = store_with(&[4.0]);
        let second = store.add_row();
        engine
            .select_project(&mut store, &second, "Apollo", &catalog())
            .unwrap();
        engine
            .select_activity(&mut store, &second, "QA")
            .unwrap();
        engine.update_hours(&mut store, &second, 0, 2.0).unwrap();

        let backend = MockBackend::signed_in().failing_create(1);
        let result = submit(&mut store, backend.clone()).await;

        assert!(matches!(result, Err(SubmitError::Partial { .. })));
        assert_eq!(backend.create_calls().len(), 1);
        assert!(store.row(&second).unwrap().has_unsaved_changes());
    }

    #[tokio::test]
    async fn rows_without_project_are_skipped() {
        let engine = ReconciliationEngine::new(TODAY);
        let mut store = store_with(&[4.0]);
        let incomplete = store.add_row();
        engine.update_hours(&mut store, &incomplete, 0, 3.0).unwrap();

        let backend = MockBackend::signed_in();
        let report = submit(&mut store, backend.clone()).await.unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.skipped, 1);
        assert!(store.row(&incomplete).unwrap().has_unsaved_changes());
    }

    #[test]
    fn only_incomplete_rows_is_nothing_to_submit() {
        let engine = ReconciliationEngine::new(TODAY);
        let mut store = TimesheetRowStore::empty(WeekWindow::containing(TODAY));
        engine
            .update_hours(&mut store, &RowId::Draft(1), 0, 3.0)
            .unwrap();

        assert_eq!(
            SubmitPlan::build(&store, &employee(), 0),
            Err(SubmitError::NothingToSubmit)
        );
    }

    #[test]
    fn missing_employee_is_invalid() {
        let store = store_with(&[4.0]);
        let result = SubmitPlan::build(&store, &EmployeeId::new(""), 0);
        assert!(matches!(result, Err(SubmitError::Invalid { .. })));
    }

    #[tokio::test]
    async fn stale_outcome_is_discarded() {
        let mut store = store_with(&[4.0]);
        let plan = SubmitPlan::build(&store, &employee(), 3).unwrap();
        let outcome = SubmitCoordinator::new(Arc::new(MockBackend::signed_in()))
            .execute(&plan)
            .await;

        assert_eq!(outcome.apply(&mut store, 4, 0), Err(SubmitError::Stale));
        assert!(!store.rows()[0].cells()[0].is_persisted());
        assert!(store.has_unsaved_changes());
    }

    #[tokio::test]
    async fn cells_edited_after_planning_keep_the_row_unsaved() {
        let engine = ReconciliationEngine::new(TODAY);
        let mut store = store_with(&[1.0]);
        let id = RowId::Draft(1);
        let plan = SubmitPlan::build(&store, &employee(), 0).unwrap();
        let outcome = SubmitCoordinator::new(Arc::new(MockBackend::signed_in()))
            .execute(&plan)
            .await;

        engine.update_hours(&mut store, &id, 1, 3.0).unwrap();
        let report = outcome.apply(&mut store, 0, 0).unwrap();

        assert_eq!(report.created, 1);
        assert_eq!(report.rows_saved, 0);
        let row = store.row(&id).unwrap();
        assert!(row.cells()[0].is_persisted());
        assert_eq!(
            row.cells()[1].state(),
            CellState::Edited(Hours::from_input(3.0))
        );
        assert!(row.has_unsaved_changes());

        let next = SubmitPlan::build(&store, &employee(), 0).unwrap();
        assert_eq!(next.call_count(), 1);
        assert_eq!(next.rows()[0].cells[0].day, 1);
    }

    #[tokio::test]
    async fn cleared_cell_on_existing_row_is_saved_without_calls() {
        let engine = ReconciliationEngine::new(TODAY);
        let entry = TimesheetEntry {
            id: EntryId::new(7),
            project_id: ProjectId::new(1),
            project_name: "Apollo".to_string(),
            activity: "Development".to_string(),
            date: date!(2024 - 03 - 04),
            hours: Hours::from_input(8.0),
            description: None,
        };
        let mut store =
            TimesheetRowStore::from_entries(WeekWindow::containing(TODAY), &[entry], &catalog());
        let id = store.rows()[0].id().clone();
        engine.update_hours(&mut store, &id, 1, 2.0).unwrap();
        engine.update_hours(&mut store, &id, 1, 0.0).unwrap();
        assert!(store.has_unsaved_changes());

        let backend = MockBackend::signed_in();
        let report = submit(&mut store, backend.clone()).await.unwrap();

        assert!(backend.create_calls().is_empty());
        assert_eq!(report.created, 0);
        assert_eq!(report.rows_saved, 1);
        assert!(!store.has_unsaved_changes());
    }
}
