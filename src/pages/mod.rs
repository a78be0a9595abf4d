//! View models for the authenticated pages.
//!
//! Each page owns one state cell. Mutations make one API call; on success the
//! page reloads its collection from the server, on failure it shows an error
//! toast and leaves the state as it was.

mod boards;
mod dashboard;
mod project_detail;
mod projects;
mod settings;
mod team;

use std::future::Future;

use log::{debug, warn};
use tokio::sync::watch;

pub use boards::BoardsPage;
pub use dashboard::{DashboardPage, DashboardSummary};
pub use project_detail::ProjectDetailPage;
pub use projects::ProjectsPage;
pub use settings::{SettingsPage, PROFILE_UPDATED, PROFILE_UPDATE_FAILED};
pub use team::{TeamPage, TeamState};

use crate::error::{Action, AppError};
use crate::notify::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for PageState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: true,
            error: None,
        }
    }
}

/// A page's state cell. Starts out loading.
#[derive(Debug)]
pub(crate) struct PageCell<T> {
    state: watch::Sender<PageState<T>>,
}

impl<T: Clone> PageCell<T> {
    pub(crate) fn new() -> Self {
        let (state, _) = watch::channel(PageState::default());
        Self { state }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<PageState<T>> {
        self.state.subscribe()
    }

    pub(crate) fn snapshot(&self) -> PageState<T> {
        self.state.borrow().clone()
    }

    pub(crate) fn data(&self) -> Option<T> {
        self.state.borrow().data.clone()
    }

    /// Runs `fetch` and stores its result, keeping the previous data on error.
    pub(crate) async fn load<F>(&self, what: &str, fetch: F) -> Result<(), AppError>
    where
        F: Future<Output = Result<T, AppError>>,
    {
        self.state.send_modify(|state| state.loading = true);
        match fetch.await {
            Ok(data) => {
                self.state.send_replace(PageState {
                    data: Some(data),
                    loading: false,
                    error: None,
                });
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load {}: {}", what, e);
                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(e.display_message());
                });
                Err(e)
            }
        }
    }
}

/// Runs a mutation, turning a failure into an error toast.
pub(crate) async fn mutate<F, R>(notifier: &Notifier, action: Action, call: F) -> Result<R, AppError>
where
    F: Future<Output = Result<R, AppError>>,
{
    call.await.map_err(|e| {
        notifier.failure(action, &e);
        e
    })
}

/// Reloads after a mutation the server already accepted.
///
/// A failed reload is recorded in the page's `error` field by the load itself
/// and does not fail the mutation.
pub(crate) async fn refresh<F>(reload: F)
where
    F: Future<Output = Result<(), AppError>>,
{
    if let Err(e) = reload.await {
        debug!("Reload after mutation failed: {}", e);
    }
}

/// Trims `value`, rejecting it when nothing is left.
pub(crate) fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(value.to_string())
}
