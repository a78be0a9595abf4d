//! Application root: builds the shared services once and hands them to pages.

use std::sync::Arc;

use log::info;

use crate::api::ApiClient;
use crate::board::BoardView;
use crate::config::Config;
use crate::error::AppError;
use crate::guard::{GuardDecision, RouteGuard};
use crate::models::{Id, RegisterRequest, User};
use crate::navigation::{Navigator, Route};
use crate::notify::Notifier;
use crate::pages::{
    BoardsPage, DashboardPage, ProjectDetailPage, ProjectsPage, SettingsPage, TeamPage,
};
use crate::session::{SessionHandle, SessionStore};
use crate::storage::{FileStorage, SessionStorage};

pub struct App {
    config: Config,
    client: Arc<ApiClient>,
    navigator: Navigator,
    session: SessionStore,
    notifier: Notifier,
    guard: RouteGuard,
}

impl App {
    /// Builds the app with the session persisted to `config.session_file`.
    pub fn new(config: Config) -> Result<Self, AppError> {
        let storage = Arc::new(FileStorage::new(config.session_file.clone()));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn SessionStorage>) -> Result<Self, AppError> {
        let client = Arc::new(ApiClient::new(&config, storage.clone())?);
        let navigator = Navigator::default();
        let session = SessionStore::new(client.clone(), storage, navigator.clone());
        let guard = RouteGuard::new(session.handle(), navigator.clone());

        Ok(Self {
            config,
            client,
            navigator,
            session,
            notifier: Notifier::new(),
            guard,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn session(&self) -> SessionHandle {
        self.session.handle()
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Rehydrates the session, then opens `route`.
    pub fn start(&self, route: Route) -> GuardDecision {
        let state = self.session.initialize();
        info!(
            "Session ready (authenticated={}) against {}",
            state.is_authenticated(),
            self.config.api_base_url
        );
        self.open(route)
    }

    /// Opens `route` through the guard. Signed-in users skip the login and
    /// register views.
    pub fn open(&self, route: Route) -> GuardDecision {
        let route = match route {
            Route::Login | Route::Register if self.session.snapshot().is_authenticated() => {
                Route::DEFAULT_AUTHENTICATED
            }
            other => other,
        };
        self.guard.enter(route)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let result = self.session.login(email, password).await;
        self.after_sign_in(result)
    }

    pub async fn register(&self, profile: RegisterRequest) -> Result<User, AppError> {
        let result = self.session.register(profile).await;
        self.after_sign_in(result)
    }

    pub fn logout(&self) {
        self.session.logout();
        self.navigator.navigate(Route::Login);
    }

    fn after_sign_in(&self, result: Result<User, AppError>) -> Result<User, AppError> {
        match result {
            Ok(user) => {
                self.navigator.navigate(Route::DEFAULT_AUTHENTICATED);
                Ok(user)
            }
            Err(e) => {
                self.notifier.error(e.display_message());
                Err(e)
            }
        }
    }

    // Pages

    pub fn dashboard(&self) -> DashboardPage {
        DashboardPage::new(self.client.clone())
    }

    pub fn projects(&self) -> ProjectsPage {
        ProjectsPage::new(self.client.clone(), self.notifier.clone())
    }

    pub fn project_detail(&self, project_id: Id) -> ProjectDetailPage {
        ProjectDetailPage::new(
            project_id,
            self.client.clone(),
            self.notifier.clone(),
            self.navigator.clone(),
        )
    }

    pub fn boards(&self) -> BoardsPage {
        BoardsPage::new(self.client.clone(), self.notifier.clone())
    }

    pub fn board(&self, board_id: Id) -> BoardView {
        BoardView::new(board_id, self.client.clone(), self.notifier.clone())
    }

    pub fn team(&self) -> TeamPage {
        TeamPage::new(self.client.clone(), self.notifier.clone())
    }

    pub fn settings(&self) -> SettingsPage {
        SettingsPage::new(self.client.clone(), self.notifier.clone(), self.session.clone())
    }
}
