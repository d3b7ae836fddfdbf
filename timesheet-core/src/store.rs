use std::collections::HashMap;

use crate::{
    error::GridError,
    models::{ProjectCatalog, ProjectId, RowId, TimesheetEntry, TimesheetRow},
    week::WeekWindow,
};

/// The rows of the visible week.
///
/// Rebuilt wholesale whenever the week changes or data is reloaded; the
/// grid always holds at least one row.
#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetRowStore {
    window: WeekWindow,
    rows: Vec<TimesheetRow>,
    next_draft: u32,
}

impl TimesheetRowStore {
    /// A grid with a single blank row.
    pub fn empty(window: WeekWindow) -> Self {
        Self {
            window,
            rows: vec![TimesheetRow::draft(RowId::Draft(1), &window)],
            next_draft: 2,
        }
    }

    /// Group server entries by project and activity, one row per pair, in the
    /// order the pairs first appear.
    pub fn from_entries(
        window: WeekWindow,
        entries: &[TimesheetEntry],
        catalog: &ProjectCatalog,
    ) -> Self {
        let mut rows: Vec<TimesheetRow> = Vec::new();
        let mut index: HashMap<(ProjectId, &str), usize> = HashMap::new();

        for entry in entries {
            let Some(day) = window.index_of(entry.date) else {
                tracing::debug!(
                    "Ignoring entry {} dated {} outside {}",
                    entry.id,
                    entry.date,
                    window.range_label()
                );
                continue;
            };

            let row_idx = *index
                .entry((entry.project_id, entry.activity.as_str()))
                .or_insert_with(|| {
                    let project = catalog.find(entry.project_id);
                    let project_name = project
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| entry.project_name.clone());
                    let billable = project.map(|p| p.billable).unwrap_or(false);

                    rows.push(TimesheetRow::existing(
                        entry.project_id,
                        project_name,
                        entry.activity.clone(),
                        billable,
                        &window,
                    ));
                    rows.len() - 1
                });

            let row = &mut rows[row_idx];
            if let Some(previous) = row.cell(day).and_then(|c| c.server_id()) {
                tracing::warn!(
                    "Entries {} and {} share {} on {}, keeping the latter",
                    previous,
                    entry.id,
                    row.id(),
                    entry.date
                );
            }
            if let Some(cell) = row.cell_mut(day) {
                cell.persist(entry.id, entry.hours);
            }
        }

        if rows.is_empty() {
            return Self::empty(window);
        }

        Self {
            window,
            rows,
            next_draft: 1,
        }
    }

    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn rows(&self) -> &[TimesheetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: &RowId) -> Option<&TimesheetRow> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub(crate) fn row_mut(&mut self, id: &RowId) -> Result<&mut TimesheetRow, GridError> {
        self.rows
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| GridError::RowNotFound(id.clone()))
    }

    /// Find the row for a project/activity pair, by project name.
    pub fn find_row(&self, project_name: &str, activity: &str) -> Option<&TimesheetRow> {
        self.rows
            .iter()
            .find(|r| r.project_name() == project_name && r.activity() == activity)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.rows.iter().any(|r| r.has_unsaved_changes())
    }

    /// Append a blank row and return its id.
    pub fn add_row(&mut self) -> RowId {
        let id = RowId::Draft(self.next_draft);
        self.next_draft += 1;
        self.rows.push(TimesheetRow::draft(id.clone(), &self.window));
        id
    }

    /// Remove a row. The last remaining row is kept.
    pub fn remove_row(&mut self, id: &RowId) -> Result<TimesheetRow, GridError> {
        let idx = self
            .rows
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| GridError::RowNotFound(id.clone()))?;

        if self.rows.len() <= 1 {
            return Err(GridError::LastRow);
        }

        Ok(self.rows.remove(idx))
    }
}
