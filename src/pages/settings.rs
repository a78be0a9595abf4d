use std::sync::Arc;

use log::warn;
use tokio::sync::watch;

use super::{refresh, PageCell, PageState};
use crate::api::ApiClient;
use crate::error::AppError;
use crate::models::{ProfilePatch, User};
use crate::notify::Notifier;
use crate::session::SessionStore;

pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile.";

/// The signed-in user's profile form.
pub struct SettingsPage {
    client: Arc<ApiClient>,
    notifier: Notifier,
    session: SessionStore,
    cell: PageCell<User>,
}

impl SettingsPage {
    pub fn new(client: Arc<ApiClient>, notifier: Notifier, session: SessionStore) -> Self {
        Self {
            client,
            notifier,
            session,
            cell: PageCell::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<User>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> PageState<User> {
        self.cell.snapshot()
    }

    /// Fetches the current profile into the form.
    pub async fn load(&self) -> Result<(), AppError> {
        self.cell
            .load("profile", self.client.get_current_user())
            .await
    }

    /// Saves the profile. The session's user is replaced with the server's copy.
    pub async fn save(&self, patch: &ProfilePatch) -> Result<User, AppError> {
        match self.client.update_current_user(patch).await {
            Ok(user) => {
                self.session.update_user(user.clone());
                self.notifier.success(PROFILE_UPDATED);
                refresh(self.load()).await;
                Ok(user)
            }
            Err(e) => {
                warn!("Profile update failed: {}", e);
                self.notifier.error(PROFILE_UPDATE_FAILED);
                Err(e)
            }
        }
    }
}
