use std::collections::HashMap;

use super::ProjectId;

/// An active project that hours can be logged against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub billable: bool,
}

impl Project {
    pub fn new(id: impl Into<ProjectId>, name: impl Into<String>, billable: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            billable,
        }
    }
}

/// Active projects and the activity labels each one accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
    activities: HashMap<ProjectId, Vec<String>>,
}

impl ProjectCatalog {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            activities: HashMap::new(),
        }
    }

    pub fn with_activities(
        mut self,
        project_id: ProjectId,
        activities: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.set_activities(project_id, activities.into_iter().map(Into::into).collect());
        self
    }

    pub fn set_activities(&mut self, project_id: ProjectId, activities: Vec<String>) {
        self.activities.insert(project_id, activities);
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn find(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Projects are selected by display name in the grid.
    pub fn find_by_name(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn activities(&self, id: ProjectId) -> &[String] {
        self.activities.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_by_id_and_name() {
        let catalog = ProjectCatalog::new(vec![
            Project::new(1, "Apollo", true),
            Project::new(2, "Internal", false),
        ])
        .with_activities(ProjectId::new(1), ["Development", "QA"]);

        assert_eq!(catalog.find_by_name("Internal").map(|p| p.id), Some(ProjectId::new(2)));
        assert!(catalog.find(ProjectId::new(3)).is_none());
        assert_eq!(catalog.activities(ProjectId::new(1)).len(), 2);
        assert!(catalog.activities(ProjectId::new(2)).is_empty());
    }
}
