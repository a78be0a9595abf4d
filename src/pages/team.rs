use std::sync::Arc;

use log::{debug, warn};
use tokio::sync::watch;

use super::{mutate, refresh, required};
use crate::api::ApiClient;
use crate::error::{Action, AppError};
use crate::models::{Id, ProjectSummary, User};
use crate::notify::Notifier;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamState {
    pub projects: Vec<ProjectSummary>,
    pub selected_project: Option<Id>,
    pub members: Vec<User>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Members of one of the user's projects.
///
/// If the project's members cannot be fetched, every user is listed instead.
pub struct TeamPage {
    client: Arc<ApiClient>,
    notifier: Notifier,
    state: watch::Sender<TeamState>,
}

impl TeamPage {
    pub fn new(client: Arc<ApiClient>, notifier: Notifier) -> Self {
        let (state, _) = watch::channel(TeamState {
            loading: true,
            ..TeamState::default()
        });
        Self {
            client,
            notifier,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<TeamState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> TeamState {
        self.state.borrow().clone()
    }

    /// Fetches the projects, keeps or picks the selected one, and lists its members.
    pub async fn load(&self) -> Result<(), AppError> {
        self.state.send_modify(|state| state.loading = true);

        let projects = match self.client.get_projects().await {
            Ok(projects) => projects,
            Err(e) => {
                warn!("Failed to load projects: {}", e);
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(e.display_message());
                });
                return Err(e);
            }
        };

        let selected = self
            .state
            .borrow()
            .selected_project
            .filter(|id| projects.iter().any(|project| project.id == *id))
            .or_else(|| projects.first().map(|project| project.id));

        let members = match selected {
            Some(project_id) => self.members_of(project_id).await,
            None => Vec::new(),
        };

        self.state.send_replace(TeamState {
            projects,
            selected_project: selected,
            members,
            loading: false,
            error: None,
        });
        Ok(())
    }

    /// Switches to another project and reloads its members.
    pub async fn select_project(&self, project_id: Id) -> Result<(), AppError> {
        self.state
            .send_modify(|state| state.selected_project = Some(project_id));
        self.load().await
    }

    /// Case-insensitive search over name, email and username.
    pub fn search(&self, query: &str) -> Vec<User> {
        self.state
            .borrow()
            .members
            .iter()
            .filter(|user| user.matches(query))
            .cloned()
            .collect()
    }

    /// Adds `email` to the selected project.
    pub async fn invite(&self, email: &str) -> Result<(), AppError> {
        let email = required(email, "Email")?;
        let project_id = self
            .state
            .borrow()
            .selected_project
            .ok_or_else(|| AppError::BadRequest("Select a project first".into()))?;

        mutate(
            &self.notifier,
            Action::AddProjectMember,
            self.client.add_project_member(project_id, &email),
        )
        .await?;
        self.notifier.success(format!("Invitation sent to {}", email));
        refresh(self.load()).await;
        Ok(())
    }

    async fn members_of(&self, project_id: Id) -> Vec<User> {
        match self.client.get_project(project_id).await {
            Ok(project) => project.members.into_iter().map(User::from).collect(),
            Err(e) => {
                debug!("Falling back to all users for project {}: {}", project_id, e);
                match self.client.get_users().await {
                    Ok(users) => users,
                    Err(e) => {
                        warn!("Failed to load users: {}", e);
                        Vec::new()
                    }
                }
            }
        }
    }
}
