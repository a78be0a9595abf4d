use std::sync::Arc;

use tokio::sync::watch;

use super::{PageCell, PageState};
use crate::api::ApiClient;
use crate::error::AppError;
use crate::models::{BoardSummary, ProjectSummary};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSummary {
    pub projects: Vec<ProjectSummary>,
    pub boards: Vec<BoardSummary>,
    pub total_projects: usize,
    pub total_boards: usize,
    pub total_cards: u64,
}

impl DashboardSummary {
    pub fn new(projects: Vec<ProjectSummary>, boards: Vec<BoardSummary>) -> Self {
        Self {
            total_projects: projects.len(),
            total_boards: boards.len(),
            total_cards: boards.iter().map(|board| u64::from(board.card_count)).sum(),
            projects,
            boards,
        }
    }
}

pub struct DashboardPage {
    client: Arc<ApiClient>,
    cell: PageCell<DashboardSummary>,
}

impl DashboardPage {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            cell: PageCell::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PageState<DashboardSummary>> {
        self.cell.subscribe()
    }

    pub fn snapshot(&self) -> PageState<DashboardSummary> {
        self.cell.snapshot()
    }

    /// Fetches projects and boards concurrently.
    pub async fn load(&self) -> Result<(), AppError> {
        let client = &self.client;
        self.cell
            .load("dashboard", async {
                let (projects, boards) =
                    futures::try_join!(client.get_projects(), client.get_boards())?;
                Ok::<_, AppError>(DashboardSummary::new(projects, boards))
            })
            .await
    }
}
