use reqwest::Method;

use super::ApiClient;
use crate::error::AppError;
use crate::models::{
    AddMemberRequest, AuthResponse, Board, BoardInput, BoardMemberRequest, BoardPatch,
    BoardSummary, Card, CardInput, CardPatch, ColumnInput, Id, LoginRequest, MoveCardRequest,
    ProfilePatch, ProjectDetail, ProjectInput, ProjectSummary, RegisterRequest, User,
};

impl ApiClient {
    // Auth

    /// `POST /auth/login`. Exchanges credentials for a token and the user.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, AppError> {
        self.post("/auth/login", credentials).await
    }

    /// `POST /auth/register`. Creates an account and signs it in.
    pub async fn register(&self, profile: &RegisterRequest) -> Result<AuthResponse, AppError> {
        self.post("/auth/register", profile).await
    }

    // Projects

    /// `GET /projects`. Projects the user owns or belongs to.
    pub async fn get_projects(&self) -> Result<Vec<ProjectSummary>, AppError> {
        self.get("/projects").await
    }

    /// `GET /projects/:id` with members and boards.
    pub async fn get_project(&self, id: Id) -> Result<ProjectDetail, AppError> {
        self.get(&format!("/projects/{}", id)).await
    }

    /// `POST /projects`.
    pub async fn create_project(&self, input: &ProjectInput) -> Result<ProjectSummary, AppError> {
        self.post("/projects", input).await
    }

    /// `PUT /projects/:id`. Owner only.
    pub async fn update_project(
        &self,
        id: Id,
        input: &ProjectInput,
    ) -> Result<ProjectSummary, AppError> {
        self.put(&format!("/projects/{}", id), input).await
    }

    /// `DELETE /projects/:id`. Owner only.
    pub async fn delete_project(&self, id: Id) -> Result<(), AppError> {
        self.execute::<()>(Method::DELETE, &format!("/projects/{}", id), None)
            .await
    }

    /// `POST /projects/:id/members`, looking the user up by email.
    pub async fn add_project_member(&self, project_id: Id, email: &str) -> Result<(), AppError> {
        let body = AddMemberRequest {
            email: email.to_string(),
        };
        self.execute(
            Method::POST,
            &format!("/projects/{}/members", project_id),
            Some(&body),
        )
        .await
    }

    /// `DELETE /projects/:id/members/:userId`.
    pub async fn remove_project_member(&self, project_id: Id, user_id: Id) -> Result<(), AppError> {
        self.execute::<()>(
            Method::DELETE,
            &format!("/projects/{}/members/{}", project_id, user_id),
            None,
        )
        .await
    }

    // Boards

    /// `GET /boards`.
    pub async fn get_boards(&self) -> Result<Vec<BoardSummary>, AppError> {
        self.get("/boards").await
    }

    /// `GET /boards/:id` with columns and cards.
    pub async fn get_board(&self, id: Id) -> Result<Board, AppError> {
        self.get(&format!("/boards/{}", id)).await
    }

    /// `POST /boards`.
    pub async fn create_board(&self, input: &BoardInput) -> Result<Board, AppError> {
        self.post("/boards", input).await
    }

    /// `PUT /boards/:id`.
    pub async fn update_board(&self, id: Id, patch: &BoardPatch) -> Result<Board, AppError> {
        self.put(&format!("/boards/{}", id), patch).await
    }

    /// `DELETE /boards/:id`. Owner only.
    pub async fn delete_board(&self, id: Id) -> Result<(), AppError> {
        self.execute::<()>(Method::DELETE, &format!("/boards/{}", id), None)
            .await
    }

    /// `POST /boards/:id/members`.
    pub async fn add_board_member(&self, board_id: Id, user_id: Id) -> Result<(), AppError> {
        self.execute(
            Method::POST,
            &format!("/boards/{}/members", board_id),
            Some(&BoardMemberRequest { user_id }),
        )
        .await
    }

    /// `DELETE /boards/:id/members/:userId`.
    pub async fn remove_board_member(&self, board_id: Id, user_id: Id) -> Result<(), AppError> {
        self.execute::<()>(
            Method::DELETE,
            &format!("/boards/{}/members/{}", board_id, user_id),
            None,
        )
        .await
    }

    // Columns

    /// `POST /boards/:id/columns`.
    pub async fn create_column(&self, board_id: Id, input: &ColumnInput) -> Result<(), AppError> {
        self.execute(
            Method::POST,
            &format!("/boards/{}/columns", board_id),
            Some(input),
        )
        .await
    }

    /// `PUT /boards/:id/columns/:columnId`.
    pub async fn update_column(
        &self,
        board_id: Id,
        column_id: Id,
        input: &ColumnInput,
    ) -> Result<(), AppError> {
        self.execute(
            Method::PUT,
            &format!("/boards/{}/columns/{}", board_id, column_id),
            Some(input),
        )
        .await
    }

    /// `DELETE /boards/:id/columns/:columnId`.
    pub async fn delete_column(&self, board_id: Id, column_id: Id) -> Result<(), AppError> {
        self.execute::<()>(
            Method::DELETE,
            &format!("/boards/{}/columns/{}", board_id, column_id),
            None,
        )
        .await
    }

    // Cards

    /// `POST /cards`.
    pub async fn create_card(&self, input: &CardInput) -> Result<Card, AppError> {
        self.post("/cards", input).await
    }

    /// `PUT /cards/:id`.
    pub async fn update_card(&self, id: Id, patch: &CardPatch) -> Result<Card, AppError> {
        self.put(&format!("/cards/{}", id), patch).await
    }

    /// `DELETE /cards/:id`.
    pub async fn delete_card(&self, id: Id) -> Result<(), AppError> {
        self.execute::<()>(Method::DELETE, &format!("/cards/{}", id), None)
            .await
    }

    /// `PATCH /cards/:id/move`. The response body is not needed by callers.
    pub async fn move_card(&self, id: Id, request: &MoveCardRequest) -> Result<(), AppError> {
        self.execute(Method::PATCH, &format!("/cards/{}/move", id), Some(request))
            .await
    }

    // Users

    /// `GET /users`. Every account, used when project members are unavailable.
    pub async fn get_users(&self) -> Result<Vec<User>, AppError> {
        self.get("/users").await
    }

    /// `GET /users/me`.
    pub async fn get_current_user(&self) -> Result<User, AppError> {
        self.get("/users/me").await
    }

    /// `PUT /users/me`. An empty patch is rejected without a request.
    pub async fn update_current_user(&self, patch: &ProfilePatch) -> Result<User, AppError> {
        if patch == &ProfilePatch::default() {
            return Err(AppError::BadRequest("Nothing to update".into()));
        }
        self.put("/users/me", patch).await
    }
}
