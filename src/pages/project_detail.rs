use std::sync::Arc;

use log::info;
use tokio::sync::watch;

use super::{mutate, refresh, required, PageCell, PageState};
use crate::api::ApiClient;
use crate::error::{Action, AppError};
use crate::models::{Board, BoardInput, Id, ProjectDetail, ProjectInput};
use crate::navigation::{Navigator, Route};
use crate::notify::Notifier;

/// One project with its members and boards.
pub struct ProjectDetailPage {
    project_id: Id,
    client: Arc<ApiClient>,
    notifier: Notifier,
    navigator: Navigator,
    cell: PageCell<ProjectDetail>,
}

impl ProjectDetailPage {
    pub fn new(project_id: Id, client: Arc<ApiClient>, notifier: Notifier, navigator: Navigator) -> Self {
        Self {
            project_id,
            client,
            notifier,
            navigator,
            cell: PageCell::new(),
        }
    }

    pub fn project_id(&self) -> Id {
        self.project_id
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<ProjectDetail>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> PageState<ProjectDetail> {
        self.cell.snapshot()
    }

    /// Fetches the project with its members and boards.
    pub async fn load(&self) -> Result<(), AppError> {
        self.cell
            .load("project", self.client.get_project(self.project_id))
            .await
    }

    /// Saves the project's name and description. Owner only.
    pub async fn update(&self, input: &ProjectInput) -> Result<(), AppError> {
        let input = ProjectInput {
            name: required(&input.name, "Project name")?,
            description: input.description.clone(),
        };
        mutate(
            &self.notifier,
            Action::UpdateProject,
            self.client.update_project(self.project_id, &input),
        )
        .await?;
        refresh(self.load()).await;
        Ok(())
    }

    /// Deletes the project and leaves for the projects list.
    pub async fn delete(&self) -> Result<(), AppError> {
        mutate(
            &self.notifier,
            Action::DeleteProject,
            self.client.delete_project(self.project_id),
        )
        .await?;
        info!("Deleted project {}", self.project_id);
        self.navigator.navigate(Route::Projects);
        Ok(())
    }

    /// Adds the user with `email` and reloads the members.
    pub async fn add_member(&self, email: &str) -> Result<(), AppError> {
        let email = required(email, "Email")?;
        mutate(
            &self.notifier,
            Action::AddProjectMember,
            self.client.add_project_member(self.project_id, &email),
        )
        .await?;
        refresh(self.load()).await;
        Ok(())
    }

    /// Removes a member and reloads.
    pub async fn remove_member(&self, user_id: Id) -> Result<(), AppError> {
        mutate(
            &self.notifier,
            Action::RemoveProjectMember,
            self.client.remove_project_member(self.project_id, user_id),
        )
        .await?;
        refresh(self.load()).await;
        Ok(())
    }

    /// Creates a board attached to this project.
    pub async fn create_board(&self, name: &str, description: &str, is_public: bool) -> Result<Board, AppError> {
        let input = BoardInput {
            name: required(name, "Board name")?,
            description: description.to_string(),
            is_public,
            project_id: Some(self.project_id),
        };
        let board = mutate(
            &self.notifier,
            Action::CreateBoard,
            self.client.create_board(&input),
        )
        .await?;
        refresh(self.load()).await;
        Ok(board)
    }
}
