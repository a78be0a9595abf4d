//! Application routes and the navigator that tracks the current one.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use tokio::sync::watch;

use crate::models::Id;

lazy_static! {
    // Detail routes: `/projects/42`, `/boards/7`
    static ref DETAIL_ROUTE: Regex = Regex::new(r"^/(projects|boards)/(\d+)/?$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Login,
    Register,
    Dashboard,
    Projects,
    ProjectDetail(Id),
    Boards,
    BoardDetail(Id),
    Team,
    Settings,
}

impl Route {
    /// Where a freshly signed-in user lands.
    pub const DEFAULT_AUTHENTICATED: Route = Route::Dashboard;

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::ProjectDetail(id) => format!("/projects/{}", id),
            Route::Boards => "/boards".to_string(),
            Route::BoardDetail(id) => format!("/boards/{}", id),
            Route::Team => "/team".to_string(),
            Route::Settings => "/settings".to_string(),
        }
    }

    /// Parses a path; `None` for anything outside the route table.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let route = match trimmed {
            "" => Route::Landing,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/dashboard" => Route::Dashboard,
            "/projects" => Route::Projects,
            "/boards" => Route::Boards,
            "/team" => Route::Team,
            "/settings" => Route::Settings,
            _ => {
                let captures = DETAIL_ROUTE.captures(path)?;
                let id = captures[2].parse::<Id>().ok()?;
                match &captures[1] {
                    "projects" => Route::ProjectDetail(id),
                    _ => Route::BoardDetail(id),
                }
            }
        };
        Some(route)
    }

    /// Public routes render without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Landing | Route::Login | Route::Register)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Holds the current route. Cloning yields another handle to the same state.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            current: Arc::new(tx),
        }
    }

    pub fn navigate(&self, route: Route) {
        debug!("Navigating to {}", route);
        self.current.send_replace(route);
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Landing)
    }
}
