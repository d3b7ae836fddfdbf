use time::Date;

use timesheet_core::{
    CellState, CurrentUser, ProjectCatalog, TimesheetCell, TimesheetRow, WeekTotals, WeekWindow,
    DAYS_IN_WEEK, DAY_NAMES,
};

const CELL_WIDTH: usize = 6;

pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{:.0}", hours)
    } else {
        format!("{:.2}", hours)
            .trim_end_matches('0')
            .to_string()
    }
}

/// `-` for empty cells, `*` after hours that are not saved yet.
fn cell_text(cell: &TimesheetCell) -> String {
    match cell.state() {
        CellState::Empty => "-".to_string(),
        CellState::Edited(hours) => format!("{}*", format_hours(hours.as_f64())),
        CellState::Persisted { hours, .. } => format_hours(hours.as_f64()),
    }
}

/// The week as a plain-text table with per-day and overall totals.
pub fn week_table(window: &WeekWindow, rows: &[TimesheetRow], totals: &WeekTotals, today: Date) -> String {
    let label = |row: &TimesheetRow| {
        if row.project_name().is_empty() {
            "(no project)".to_string()
        } else {
            row.project_name().to_string()
        }
    };
    let project_width = rows.iter().map(|r| label(r).len()).chain([7]).max().unwrap_or(7);
    let activity_width = rows.iter().map(|r| r.activity().len()).chain([8]).max().unwrap_or(8);

    let mut out = String::new();
    out.push_str(&format!("Week {}\n", window.range_label()));

    out.push_str(&format!("{:<project_width$}  {:<activity_width$}", "Project", "Activity"));
    for (i, name) in DAY_NAMES.iter().enumerate() {
        let marker = if window.day(i) == Some(today) { "•" } else { "" };
        out.push_str(&format!(" {:>CELL_WIDTH$}", format!("{}{}", marker, name)));
    }
    out.push_str(&format!(" {:>CELL_WIDTH$}\n", "Total"));

    for row in rows {
        out.push_str(&format!(
            "{:<project_width$}  {:<activity_width$}",
            label(row),
            row.activity()
        ));
        for cell in row.cells() {
            out.push_str(&format!(" {:>CELL_WIDTH$}", cell_text(cell)));
        }
        out.push_str(&format!(" {:>CELL_WIDTH$}\n", format_hours(row.total())));
    }

    out.push_str(&format!("{:<project_width$}  {:<activity_width$}", "Total", ""));
    for day in 0..DAYS_IN_WEEK {
        out.push_str(&format!(" {:>CELL_WIDTH$}", format_hours(totals.per_day[day])));
    }
    out.push_str(&format!(" {:>CELL_WIDTH$}\n", format_hours(totals.total)));

    out
}

pub fn totals_summary(totals: &WeekTotals) -> String {
    format!(
        "Billable {}h  Non-billable {}h  Regular {}h  Overtime {}h",
        format_hours(totals.billable),
        format_hours(totals.non_billable),
        format_hours(totals.regular),
        format_hours(totals.overtime)
    )
}

pub fn user_summary(user: &CurrentUser) -> String {
    let mut out = format!(
        "{} ({})\nDepartment: {}\nRole: {}",
        user.name, user.employee_id, user.department, user.role
    );
    if !user.is_active {
        out.push_str("\nAccount is inactive");
    }
    out
}

pub fn project_list(catalog: &ProjectCatalog) -> String {
    let mut out = String::new();
    for project in catalog.projects() {
        let kind = if project.billable { "billable" } else { "non-billable" };
        out.push_str(&format!("{} [{}]\n", project.name, kind));
        let activities = catalog.activities(project.id);
        if activities.is_empty() {
            out.push_str("  (no activities)\n");
        }
        for activity in activities {
            out.push_str(&format!("  - {}\n", activity));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use timesheet_core::{
        EmployeeId, EntryId, Hours, Project, ProjectId, Role, TimesheetEntry, TimesheetRowStore,
        STANDARD_WEEK_HOURS,
    };
    use time::macros::date;

    #[test]
    fn hours_are_printed_compactly() {
        assert_eq!(format_hours(8.0), "8");
        assert_eq!(format_hours(7.5), "7.5");
        assert_eq!(format_hours(0.25), "0.25");
    }

    #[test]
    fn table_shows_rows_and_totals() {
        let catalog = ProjectCatalog::new(vec![Project::new(1, "Apollo", true)]);
        let entries = vec![TimesheetEntry {
            id: EntryId::new(1),
            project_id: ProjectId::new(1),
            project_name: "Apollo".to_string(),
            activity: "Development".to_string(),
            date: date!(2024 - 03 - 04),
            hours: Hours::from_input(7.5),
            description: None,
        }];
        let window = WeekWindow::containing(date!(2024 - 03 - 06));
        let store = TimesheetRowStore::from_entries(window, &entries, &catalog);
        let totals = WeekTotals::compute(store.rows(), STANDARD_WEEK_HOURS);

        let table = week_table(&window, store.rows(), &totals, date!(2024 - 03 - 06));

        assert!(table.starts_with("Week 04/03/2024 - 10/03/2024\n"));
        assert!(table.contains("•Wed"));
        let apollo = table.lines().find(|l| l.starts_with("Apollo")).unwrap();
        assert!(apollo.contains("Development"));
        assert!(apollo.contains("7.5"));
        assert!(table.lines().last().unwrap().starts_with("Total"));
    }

    #[test]
    fn summary_lists_billable_split() {
        let totals = WeekTotals {
            total: 45.0,
            billable: 40.0,
            non_billable: 5.0,
            regular: 40.0,
            overtime: 5.0,
            per_day: [9.0, 9.0, 9.0, 9.0, 9.0, 0.0, 0.0],
        };
        assert_eq!(
            totals_summary(&totals),
            "Billable 40h  Non-billable 5h  Regular 40h  Overtime 5h"
        );
    }

    #[test]
    fn projects_without_activities_are_marked() {
        let catalog = ProjectCatalog::new(vec![
            Project::new(1, "Apollo", true),
            Project::new(2, "Internal", false),
        ])
        .with_activities(ProjectId::new(1), ["Development"]);

        let list = project_list(&catalog);
        assert!(list.contains("Apollo [billable]\n  - Development\n"));
        assert!(list.contains("Internal [non-billable]\n  (no activities)\n"));
    }

    #[test]
    fn user_summary_names_role() {
        let user = CurrentUser {
            employee_id: EmployeeId::new("EMP001"),
            name: "Ada".to_string(),
            department: "Engineering".to_string(),
            role: Role::Manager,
            is_active: true,
        };
        assert_eq!(
            user_summary(&user),
            "Ada (EMP001)\nDepartment: Engineering\nRole: manager"
        );
    }
}
