use time::Date;

use crate::{
    error::{GridError, LockReason, LockedCellError},
    models::{Hours, ProjectCatalog, RowId, TimesheetRow},
    store::TimesheetRowStore,
};

/// Edit rules of the weekly grid, evaluated against one "today".
///
/// A cell is editable when its date is not after today and it has no server
/// entry yet. Rows that came from the server keep their project and activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationEngine {
    today: Date,
}

/// Result of a successful hour edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourUpdate {
    /// The stored value after clamping and quantization.
    pub hours: Hours,
    pub changed: bool,
}

impl ReconciliationEngine {
    pub fn new(today: Date) -> Self {
        Self { today }
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub fn can_edit(&self, row: &TimesheetRow, day: usize) -> bool {
        self.check_editable(row, day).is_ok()
    }

    /// Why a cell is locked. An existing entry is reported before a future
    /// date.
    pub fn edit_block(&self, row: &TimesheetRow, day: usize) -> Option<LockReason> {
        row.cell(day).and_then(|cell| cell.lock_reason(self.today))
    }

    pub fn check_editable(&self, row: &TimesheetRow, day: usize) -> Result<(), GridError> {
        let cell = row.cell(day).ok_or(GridError::DayOutOfRange(day))?;
        match cell.lock_reason(self.today) {
            Some(reason) => Err(LockedCellError::from(reason).into()),
            None => Ok(()),
        }
    }

    /// Set a cell's hours from raw input.
    ///
    /// The value is clamped to [0, 24] and rounded to the nearest quarter. A
    /// locked cell is left untouched and the lock reason is returned.
    pub fn update_hours(
        &self,
        store: &mut TimesheetRowStore,
        row_id: &RowId,
        day: usize,
        value: f64,
    ) -> Result<HourUpdate, GridError> {
        let row = store.row_mut(row_id)?;
        self.check_editable(row, day)?;

        let hours = Hours::from_input(value);
        let changed = row
            .cell_mut(day)
            .map(|cell| cell.set_hours(hours))
            .unwrap_or(false);

        if changed {
            row.mark_unsaved();
        }

        Ok(HourUpdate { hours, changed })
    }

    /// Select a project by display name.
    ///
    /// Always clears the activity. The billable flag follows the project; a
    /// name missing from the catalog leaves the row without a project and
    /// billable.
    pub fn select_project(
        &self,
        store: &mut TimesheetRowStore,
        row_id: &RowId,
        project_name: &str,
        catalog: &ProjectCatalog,
    ) -> Result<(), GridError> {
        let row = store.row_mut(row_id)?;
        if row.is_existing() {
            return Err(GridError::ExistingRow(row_id.clone()));
        }

        match catalog.find_by_name(project_name) {
            Some(project) => row.set_project(Some(project.id), project_name, project.billable),
            None => {
                tracing::debug!("Project {:?} is not in the catalog", project_name);
                row.set_project(None, project_name, true);
            }
        }

        Ok(())
    }

    pub fn select_activity(
        &self,
        store: &mut TimesheetRowStore,
        row_id: &RowId,
        activity: &str,
    ) -> Result<(), GridError> {
        let row = store.row_mut(row_id)?;
        if row.is_existing() {
            return Err(GridError::ExistingRow(row_id.clone()));
        }

        row.set_activity(activity);
        Ok(())
    }
}
