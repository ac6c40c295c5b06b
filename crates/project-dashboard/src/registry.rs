//! Project registry
//!
//! Read-only lookup of configured projects by id and by tag.

use std::collections::HashSet;

use crate::contracts::{Integrations, Project, ProjectSummary};
use crate::error::{DashboardError, Result};

/// Immutable set of configured projects
#[derive(Debug, Clone, Default)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
}

impl ProjectRegistry {
    /// Build a registry, rejecting duplicate project ids
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        let mut seen = HashSet::new();
        for project in &projects {
            if !seen.insert(project.id.as_str()) {
                return Err(DashboardError::config(format!(
                    "duplicate project id: {}",
                    project.id
                )));
            }
        }
        Ok(Self { projects })
    }

    /// Look up a project by id
    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Look up a project by id, failing with `ProjectNotFound`
    pub fn resolve(&self, id: &str) -> Result<&Project> {
        self.get(id)
            .ok_or_else(|| DashboardError::ProjectNotFound(id.to_string()))
    }

    /// List projects in configuration order, optionally filtered by tag
    pub fn list(&self, tag: Option<&str>) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| tag.map_or(true, |t| p.tags.contains(t)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        ProjectSummary {
            id: project.id.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            integrations: Integrations {
                github: project.github.is_some(),
                heroku: project.heroku.is_some(),
            },
            urls: project.urls.clone(),
            tags: project.tags.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProjectRegistry {
        ProjectRegistry::new(vec![
            Project::new("api", "API")
                .with_github("acme", "api")
                .with_tag("backend"),
            Project::new("web", "Web")
                .with_heroku("web-prod")
                .with_tag("frontend"),
            Project::new("docs", "Docs").with_tag("frontend"),
        ])
        .unwrap()
    }

    #[test]
    fn test_get_and_resolve() {
        let registry = registry();
        assert_eq!(registry.get("web").unwrap().name, "Web");
        assert!(registry.get("missing").is_none());

        let err = registry.resolve("missing").unwrap_err();
        assert_eq!(err.to_string(), "Project not found: missing");
    }

    #[test]
    fn test_list_by_tag() {
        let registry = registry();
        let ids: Vec<_> = registry
            .list(Some("frontend"))
            .into_iter()
            .map(|p| p.id.as_str())
            .collect();
        assert_eq!(ids, vec!["web", "docs"]);
        assert_eq!(registry.list(None).len(), 3);
        assert!(registry.list(Some("mobile")).is_empty());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = ProjectRegistry::new(vec![Project::new("a", "A"), Project::new("a", "B")])
            .unwrap_err();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_project_summary_integrations() {
        let registry = registry();
        let summary = ProjectSummary::from(registry.get("api").unwrap());
        assert!(summary.integrations.github);
        assert!(!summary.integrations.heroku);
        assert!(summary.tags.contains("backend"));
    }
}
