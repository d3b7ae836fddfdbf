use super::{sum_hours, Hours, ProjectId, RowId, TimesheetCell};
use crate::week::{WeekWindow, DAYS_IN_WEEK};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// Added in the grid and never submitted.
    Draft,
    /// Built from server entries, or fully submitted.
    Existing,
}

/// A project + activity line of the weekly grid.
#[derive(Debug, Clone, PartialEq)]
pub struct TimesheetRow {
    id: RowId,
    project_id: Option<ProjectId>,
    project_name: String,
    activity: String,
    billable: bool,
    cells: [TimesheetCell; DAYS_IN_WEEK],
    unsaved: bool,
    origin: RowOrigin,
}

impl TimesheetRow {
    /// An empty row with no project selected.
    pub fn draft(id: RowId, window: &WeekWindow) -> Self {
        Self {
            id,
            project_id: None,
            project_name: String::new(),
            activity: String::new(),
            billable: true,
            cells: window.days().map(TimesheetCell::empty),
            unsaved: false,
            origin: RowOrigin::Draft,
        }
    }

    pub(crate) fn existing(
        project_id: ProjectId,
        project_name: impl Into<String>,
        activity: impl Into<String>,
        billable: bool,
        window: &WeekWindow,
    ) -> Self {
        let activity = activity.into();
        Self {
            id: RowId::Existing {
                project: project_id,
                activity: activity.clone(),
            },
            project_id: Some(project_id),
            project_name: project_name.into(),
            activity,
            billable,
            cells: window.days().map(TimesheetCell::empty),
            unsaved: false,
            origin: RowOrigin::Existing,
        }
    }

    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// `None` until a catalog project is selected.
    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn activity(&self) -> &str {
        &self.activity
    }

    pub fn billable(&self) -> bool {
        self.billable
    }

    pub fn origin(&self) -> RowOrigin {
        self.origin
    }

    pub fn is_existing(&self) -> bool {
        self.origin == RowOrigin::Existing
    }

    pub fn cells(&self) -> &[TimesheetCell; DAYS_IN_WEEK] {
        &self.cells
    }

    pub fn cell(&self, day: usize) -> Option<&TimesheetCell> {
        self.cells.get(day)
    }

    pub fn hours(&self) -> [Hours; DAYS_IN_WEEK] {
        self.cells.map(|c| c.hours())
    }

    /// Sum of the seven cells.
    pub fn total(&self) -> f64 {
        sum_hours(self.cells.iter().map(|c| c.hours()))
    }

    pub fn has_hours(&self) -> bool {
        self.cells.iter().any(|c| !c.hours().is_zero())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn has_project_and_activity(&self) -> bool {
        self.project_id.is_some() && !self.activity.trim().is_empty()
    }

    /// Cells that still need a create call, with their day index.
    pub fn pending_cells(&self) -> impl Iterator<Item = (usize, &TimesheetCell)> {
        self.cells.iter().enumerate().filter(|(_, c)| c.is_pending())
    }

    pub(crate) fn cell_mut(&mut self, day: usize) -> Option<&mut TimesheetCell> {
        self.cells.get_mut(day)
    }

    pub(crate) fn set_project(
        &mut self,
        project_id: Option<ProjectId>,
        project_name: impl Into<String>,
        billable: bool,
    ) {
        self.project_id = project_id;
        self.project_name = project_name.into();
        self.billable = billable;
        self.activity.clear();
    }

    pub(crate) fn set_activity(&mut self, activity: impl Into<String>) {
        self.activity = activity.into();
    }

    pub(crate) fn mark_unsaved(&mut self) {
        self.unsaved = true;
    }

    /// Every change of the row reached the backend.
    pub(crate) fn mark_saved(&mut self) {
        self.unsaved = false;
        self.origin = RowOrigin::Existing;
    }
}
