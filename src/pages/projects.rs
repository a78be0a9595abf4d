use std::sync::Arc;

use log::info;
use tokio::sync::watch;

use super::{mutate, refresh, required, PageCell, PageState};
use crate::api::ApiClient;
use crate::error::{Action, AppError};
use crate::models::{Id, ProjectInput, ProjectSummary};
use crate::notify::Notifier;

/// The projects list.
pub struct ProjectsPage {
    client: Arc<ApiClient>,
    notifier: Notifier,
    cell: PageCell<Vec<ProjectSummary>>,
}

impl ProjectsPage {
    pub fn new(client: Arc<ApiClient>, notifier: Notifier) -> Self {
        Self {
            client,
            notifier,
            cell: PageCell::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<Vec<ProjectSummary>>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> PageState<Vec<ProjectSummary>> {
        self.cell.snapshot()
    }

    /// Fetches the project list.
    pub async fn load(&self) -> Result<(), AppError> {
        self.cell.load("projects", self.client.get_projects()).await
    }

    /// Projects whose name or description contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<ProjectSummary> {
        let query = query.trim().to_lowercase();
        self.cell
            .data()
            .unwrap_or_default()
            .into_iter()
            .filter(|project| {
                project.name.to_lowercase().contains(&query)
                    || project.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Creates a project and reloads the list. Blank names are rejected locally.
    pub async fn create(&self, input: &ProjectInput) -> Result<ProjectSummary, AppError> {
        let input = ProjectInput {
            name: required(&input.name, "Project name")?,
            description: input.description.clone(),
        };
        let project = mutate(
            &self.notifier,
            Action::CreateProject,
            self.client.create_project(&input),
        )
        .await?;
        info!("Created project {} ({})", project.name, project.id);
        refresh(self.load()).await;
        Ok(project)
    }

    /// Saves a project edit and reloads the list.
    pub async fn update(&self, id: Id, input: &ProjectInput) -> Result<(), AppError> {
        let input = ProjectInput {
            name: required(&input.name, "Project name")?,
            description: input.description.clone(),
        };
        mutate(
            &self.notifier,
            Action::UpdateProject,
            self.client.update_project(id, &input),
        )
        .await?;
        refresh(self.load()).await;
        Ok(())
    }

    /// Deletes a project and reloads the list.
    pub async fn delete(&self, id: Id) -> Result<(), AppError> {
        mutate(
            &self.notifier,
            Action::DeleteProject,
            self.client.delete_project(id),
        )
        .await?;
        info!("Deleted project {}", id);
        refresh(self.load()).await;
        Ok(())
    }
}
