use std::fmt;
use std::sync::{Mutex, MutexGuard};

use actix_web::http::StatusCode;
use actix_web::{delete, get, patch, post, put, web, HttpResponse, ResponseError};
use serde_json::json;
use wisecamp::board::{apply_move, MoveOutcome};
use wisecamp::models::{
    AddMemberRequest, AuthResponse, Board, BoardInput, BoardPatch, BoardSummary, Card, CardInput,
    CardPatch, Column, ColumnInput, Id, LoginRequest, MoveCardRequest, ProfilePatch,
    ProjectBoard, ProjectDetail, ProjectInput, ProjectMember, ProjectSummary, RegisterRequest,
    User,
};

use super::middleware::AuthUser;
use super::token::generate_token;
use super::{MockState, MockUser};

type State = web::Data<Mutex<MockState>>;
type Reply = Result<HttpResponse, MockError>;

/// Error reply in the API's `{ "message": ... }` shape.
#[derive(Debug)]
pub struct MockError {
    status: StatusCode,
    message: String,
}

impl MockError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            message: message.into(),
        }
    }

    fn not_found(what: &str) -> Self {
        Self::new(404, format!("{} not found", what))
    }
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl ResponseError for MockError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(json!({ "message": self.message }))
    }
}

fn lock(state: &State) -> MutexGuard<'_, MockState> {
    state.lock().unwrap()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(register)
        .service(get_projects)
        .service(get_project)
        .service(create_project)
        .service(update_project)
        .service(delete_project)
        .service(add_project_member)
        .service(remove_project_member)
        .service(get_boards)
        .service(get_board)
        .service(create_board)
        .service(update_board)
        .service(delete_board)
        .service(create_column)
        .service(update_column)
        .service(delete_column)
        .service(create_card)
        .service(update_card)
        .service(delete_card)
        .service(move_card)
        .service(get_users)
        .service(get_me)
        .service(update_me);
}

// Auth

#[post("/auth/login")]
async fn login(state: State, body: web::Json<LoginRequest>) -> Reply {
    let state = lock(&state);
    let account = state
        .users
        .iter()
        .find(|account| account.user.email == body.email && account.password == body.password)
        .ok_or_else(|| MockError::new(401, "Invalid email or password"))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token: generate_token(account.user.id),
        user: account.user.clone(),
    }))
}

#[post("/auth/register")]
async fn register(state: State, body: web::Json<RegisterRequest>) -> Reply {
    let mut state = lock(&state);
    if state.users.iter().any(|account| account.user.email == body.email) {
        return Err(MockError::new(400, "Email already registered"));
    }
    let user = User {
        id: state.next_id(),
        name: body.name.clone(),
        email: body.email.clone(),
        username: body.username.clone(),
        role: Some("USER".into()),
        avatar_url: None,
    };
    state.users.push(MockUser {
        user: user.clone(),
        password: body.password.clone(),
    });

    Ok(HttpResponse::Created().json(AuthResponse {
        token: generate_token(user.id),
        user,
    }))
}

// Projects

fn summary(project: &ProjectDetail) -> ProjectSummary {
    ProjectSummary {
        id: project.id,
        name: project.name.clone(),
        description: project.description.clone(),
        owner_id: project.owner_id,
        owner_name: project.owner_name.clone(),
        member_count: project.members.len() as u32,
        board_count: project.boards.len() as u32,
        created_at: project.created_at,
    }
}

fn owned_project<'a>(state: &'a mut MockState, id: Id, user: Id) -> Result<&'a mut ProjectDetail, MockError> {
    let project = state
        .projects
        .iter_mut()
        .find(|project| project.id == id)
        .ok_or_else(|| MockError::not_found("Project"))?;
    if project.owner_id != user {
        return Err(MockError::new(403, "Only project owner can modify the project"));
    }
    Ok(project)
}

#[get("/projects")]
async fn get_projects(state: State, _user: AuthUser) -> Reply {
    let state = lock(&state);
    let projects: Vec<ProjectSummary> = state.projects.iter().map(summary).collect();
    Ok(HttpResponse::Ok().json(projects))
}

#[get("/projects/{id}")]
async fn get_project(state: State, _user: AuthUser, path: web::Path<Id>) -> Reply {
    let state = lock(&state);
    if state.project_detail_fails {
        return Err(MockError::new(500, "Failed to load project"));
    }
    let id = path.into_inner();
    let project = state
        .projects
        .iter()
        .find(|project| project.id == id)
        .ok_or_else(|| MockError::not_found("Project"))?;
    Ok(HttpResponse::Ok().json(project))
}

#[post("/projects")]
async fn create_project(state: State, user: AuthUser, body: web::Json<ProjectInput>) -> Reply {
    let mut state = lock(&state);
    let id = state.next_id();
    let owner = state.user(user.0)?.clone();
    let project = ProjectDetail {
        id,
        name: body.name.clone(),
        description: body.description.clone(),
        owner_id: owner.id,
        owner_name: owner.name.clone(),
        members: vec![member(&owner)],
        boards: Vec::new(),
        created_at: None,
        updated_at: None,
    };
    let reply = summary(&project);
    state.projects.push(project);
    Ok(HttpResponse::Created().json(reply))
}

#[put("/projects/{id}")]
async fn update_project(state: State, user: AuthUser, path: web::Path<Id>, body: web::Json<ProjectInput>) -> Reply {
    let mut state = lock(&state);
    let project = owned_project(&mut state, path.into_inner(), user.0)?;
    project.name = body.name.clone();
    project.description = body.description.clone();
    let reply = summary(project);
    Ok(HttpResponse::Ok().json(reply))
}

#[delete("/projects/{id}")]
async fn delete_project(state: State, user: AuthUser, path: web::Path<Id>) -> Reply {
    let mut state = lock(&state);
    let id = path.into_inner();
    owned_project(&mut state, id, user.0)?;
    state.projects.retain(|project| project.id != id);
    Ok(HttpResponse::NoContent().finish())
}

fn member(user: &User) -> ProjectMember {
    ProjectMember {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        username: user.username.clone(),
        role: user.role.clone(),
        avatar_url: None,
        joined_at: None,
    }
}

#[post("/projects/{id}/members")]
async fn add_project_member(
    state: State,
    user: AuthUser,
    path: web::Path<Id>,
    body: web::Json<AddMemberRequest>,
) -> Reply {
    let mut state = lock(&state);
    let invited = state
        .users
        .iter()
        .find(|account| account.user.email == body.email)
        .map(|account| member(&account.user))
        .ok_or_else(|| MockError::not_found("User"))?;
    let project = owned_project(&mut state, path.into_inner(), user.0)?;
    if project.members.iter().any(|existing| existing.id == invited.id) {
        return Err(MockError::new(400, "User is already a member"));
    }
    project.members.push(invited);
    Ok(HttpResponse::Ok().json(json!({ "message": "Member added" })))
}

#[delete("/projects/{id}/members/{user_id}")]
async fn remove_project_member(state: State, user: AuthUser, path: web::Path<(Id, Id)>) -> Reply {
    let (id, member_id) = path.into_inner();
    let mut state = lock(&state);
    let project = owned_project(&mut state, id, user.0)?;
    project.members.retain(|member| member.id != member_id);
    Ok(HttpResponse::NoContent().finish())
}

// Boards

fn board_summary(board: &Board) -> BoardSummary {
    BoardSummary {
        id: board.id,
        name: board.name.clone(),
        description: board.description.clone(),
        is_public: board.is_public,
        member_count: 1,
        card_count: board.card_count() as u32,
        created_at: board.created_at,
    }
}

fn board_mut(state: &mut MockState, id: Id) -> Result<&mut Board, MockError> {
    state
        .boards
        .iter_mut()
        .find(|board| board.id == id)
        .ok_or_else(|| MockError::not_found("Board"))
}

#[get("/boards")]
async fn get_boards(state: State, _user: AuthUser) -> Reply {
    let state = lock(&state);
    let boards: Vec<BoardSummary> = state.boards.iter().map(board_summary).collect();
    Ok(HttpResponse::Ok().json(boards))
}

#[get("/boards/{id}")]
async fn get_board(state: State, _user: AuthUser, path: web::Path<Id>) -> Reply {
    let mut state = lock(&state);
    let board = board_mut(&mut state, path.into_inner())?;
    Ok(HttpResponse::Ok().json(&*board))
}

#[post("/boards")]
async fn create_board(state: State, user: AuthUser, body: web::Json<BoardInput>) -> Reply {
    let mut state = lock(&state);
    let board = Board {
        id: state.next_id(),
        name: body.name.clone(),
        description: body.description.clone(),
        is_public: body.is_public,
        owner_id: Some(user.0),
        columns: Vec::new(),
        created_at: None,
        updated_at: None,
    };
    if let Some(project_id) = body.project_id {
        let project = owned_project(&mut state, project_id, user.0)?;
        project.boards.push(ProjectBoard {
            id: board.id,
            name: board.name.clone(),
            description: board.description.clone(),
            is_public: board.is_public,
            created_at: None,
        });
    }
    state.boards.push(board.clone());
    Ok(HttpResponse::Created().json(board))
}

#[put("/boards/{id}")]
async fn update_board(state: State, _user: AuthUser, path: web::Path<Id>, body: web::Json<BoardPatch>) -> Reply {
    let mut state = lock(&state);
    let board = board_mut(&mut state, path.into_inner())?;
    if let Some(name) = &body.name {
        board.name = name.clone();
    }
    if let Some(description) = &body.description {
        board.description = description.clone();
    }
    if let Some(is_public) = body.is_public {
        board.is_public = is_public;
    }
    Ok(HttpResponse::Ok().json(&*board))
}

#[delete("/boards/{id}")]
async fn delete_board(state: State, user: AuthUser, path: web::Path<Id>) -> Reply {
    let mut state = lock(&state);
    let id = path.into_inner();
    let owner = board_mut(&mut state, id)?.owner_id;
    if owner != Some(user.0) {
        return Err(MockError::new(403, "Only board owner can delete the board"));
    }
    state.boards.retain(|board| board.id != id);
    Ok(HttpResponse::NoContent().finish())
}

// Columns

#[post("/boards/{id}/columns")]
async fn create_column(state: State, _user: AuthUser, path: web::Path<Id>, body: web::Json<ColumnInput>) -> Reply {
    let mut state = lock(&state);
    let id = state.next_id();
    let board = board_mut(&mut state, path.into_inner())?;
    let column = Column {
        id,
        name: body.name.clone().unwrap_or_default(),
        position: board.columns.len() as i64,
        cards: Vec::new(),
    };
    board.columns.push(column.clone());
    Ok(HttpResponse::Created().json(column))
}

#[put("/boards/{id}/columns/{column_id}")]
async fn update_column(
    state: State,
    _user: AuthUser,
    path: web::Path<(Id, Id)>,
    body: web::Json<ColumnInput>,
) -> Reply {
    let (board_id, column_id) = path.into_inner();
    let mut state = lock(&state);
    let board = board_mut(&mut state, board_id)?;
    let column = board
        .columns
        .iter_mut()
        .find(|column| column.id == column_id)
        .ok_or_else(|| MockError::not_found("Column"))?;
    if let Some(name) = &body.name {
        column.name = name.clone();
    }
    Ok(HttpResponse::Ok().json(&*column))
}

#[delete("/boards/{id}/columns/{column_id}")]
async fn delete_column(state: State, _user: AuthUser, path: web::Path<(Id, Id)>) -> Reply {
    let (board_id, column_id) = path.into_inner();
    let mut state = lock(&state);
    let board = board_mut(&mut state, board_id)?;
    board.columns.retain(|column| column.id != column_id);
    Ok(HttpResponse::NoContent().finish())
}

// Cards

fn card_mut(state: &mut MockState, card_id: Id) -> Result<&mut Card, MockError> {
    state
        .boards
        .iter_mut()
        .flat_map(|board| board.columns.iter_mut())
        .flat_map(|column| column.cards.iter_mut())
        .find(|card| card.id == card_id)
        .ok_or_else(|| MockError::not_found("Card"))
}

#[post("/cards")]
async fn create_card(state: State, _user: AuthUser, body: web::Json<CardInput>) -> Reply {
    let mut state = lock(&state);
    state.created_cards.push(body.0.clone());
    let id = state.next_id();
    let column = state
        .boards
        .iter_mut()
        .flat_map(|board| board.columns.iter_mut())
        .find(|column| column.id == body.column_id)
        .ok_or_else(|| MockError::not_found("Column"))?;
    let card = Card {
        id,
        title: body.title.clone(),
        name: Some(body.name.clone()),
        description: body.description.clone(),
        column_id: Some(column.id),
        position: column.cards.len() as i64,
        is_active: Some(true),
        due_date: body.due_date,
    };
    column.cards.push(card.clone());
    Ok(HttpResponse::Created().json(card))
}

#[put("/cards/{id}")]
async fn update_card(state: State, _user: AuthUser, path: web::Path<Id>, body: web::Json<CardPatch>) -> Reply {
    let mut state = lock(&state);
    let card = card_mut(&mut state, path.into_inner())?;
    if let Some(title) = &body.title {
        card.title = title.clone();
    }
    if let Some(name) = &body.name {
        card.name = Some(name.clone());
    }
    if let Some(description) = &body.description {
        card.description = description.clone();
    }
    Ok(HttpResponse::Ok().json(&*card))
}

#[delete("/cards/{id}")]
async fn delete_card(state: State, _user: AuthUser, path: web::Path<Id>) -> Reply {
    let id = path.into_inner();
    let mut state = lock(&state);
    card_mut(&mut state, id)?;
    for board in state.boards.iter_mut() {
        for column in board.columns.iter_mut() {
            column.cards.retain(|card| card.id != id);
        }
    }
    Ok(HttpResponse::NoContent().finish())
}

#[patch("/cards/{id}/move")]
async fn move_card(state: State, _user: AuthUser, path: web::Path<Id>, body: web::Json<MoveCardRequest>) -> Reply {
    let card_id = path.into_inner();
    let request = body.into_inner();
    let (delay, failure) = {
        let mut state = lock(&state);
        state.moves.push((card_id, request));
        (state.move_delay, state.fail_moves_with)
    };

    if !delay.is_zero() {
        actix_rt::time::sleep(delay).await;
    }
    if let Some(status) = failure {
        return Err(MockError::new(status, "Failed to move card"));
    }

    let mut state = lock(&state);
    let index = state
        .boards
        .iter()
        .position(|board| board.locate_card(card_id).is_some())
        .ok_or_else(|| MockError::not_found("Card"))?;
    let outcome = apply_move(
        &state.boards[index],
        card_id,
        request.column_id,
        request.position.max(0) as usize,
    )
    .map_err(|e| MockError::new(400, e.message()))?;
    if let MoveOutcome::Moved { board, .. } = outcome {
        state.boards[index] = board;
    }
    Ok(HttpResponse::Ok().json(json!({ "id": card_id, "columnId": request.column_id })))
}

// Users

#[get("/users")]
async fn get_users(state: State, _user: AuthUser) -> Reply {
    let state = lock(&state);
    let users: Vec<User> = state.users.iter().map(|account| account.user.clone()).collect();
    Ok(HttpResponse::Ok().json(users))
}

#[get("/users/me")]
async fn get_me(state: State, user: AuthUser) -> Reply {
    let state = lock(&state);
    Ok(HttpResponse::Ok().json(state.user(user.0)?))
}

#[put("/users/me")]
async fn update_me(state: State, user: AuthUser, body: web::Json<ProfilePatch>) -> Reply {
    let mut state = lock(&state);
    if state.reject_profile_updates {
        return Err(MockError::new(400, "Username already taken"));
    }
    let account = state
        .users
        .iter_mut()
        .find(|account| account.user.id == user.0)
        .ok_or_else(|| MockError::not_found("User"))?;
    if let Some(name) = &body.name {
        account.user.name = name.clone();
    }
    if let Some(username) = &body.username {
        account.user.username = username.clone();
    }
    if let Some(email) = &body.email {
        account.user.email = email.clone();
    }
    Ok(HttpResponse::Ok().json(&account.user))
}
