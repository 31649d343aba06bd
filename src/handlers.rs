use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::database::Database;
use crate::error::Error;
use crate::models::Cell;
use crate::remote::GistClient;
use crate::session::{Credentials, Session};

pub type AppSession = Session<GistClient, Database>;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<AppSession>,
}

pub struct AppError(Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!("{}", self.0);
        let status = match self.0 {
            Error::Busy => StatusCode::CONFLICT,
            Error::CellOutOfBounds { .. } | Error::InvalidGistId(_) => StatusCode::BAD_REQUEST,
            Error::RemoteFormat(_)
            | Error::Encoding(_)
            | Error::Decryption
            | Error::MalformedGrid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Transport(_) => StatusCode::BAD_GATEWAY,
            Error::Upload(_) | Error::Preferences(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorView {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorView {
    error: String,
}

/// Everything the page needs to redraw itself.
#[derive(Serialize, Deserialize, Debug)]
pub struct GridView {
    pub gist_id: String,
    pub columns: usize,
    pub rows: Vec<Vec<Cell>>,
    pub busy: bool,
}

impl GridView {
    fn of(session: &AppSession) -> Self {
        let grid = session.snapshot();
        GridView {
            gist_id: session.gist_id(),
            columns: grid.columns(),
            rows: grid.rows().to_vec(),
            busy: session.is_busy(),
        }
    }
}

#[derive(Deserialize)]
pub struct RefreshForm {
    passphrase: String,
    gist_id: String,
}

#[derive(Deserialize)]
pub struct UploadForm {
    passphrase: String,
    token: String,
    gist_id: String,
}

#[derive(Deserialize)]
pub struct CellForm {
    value: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(homepage_handler))
        .route("/api/state", get(state_handler))
        .route("/api/refresh", post(refresh_handler))
        .route("/api/upload", post(upload_handler))
        .route("/api/rows", post(add_row_handler))
        .route("/api/cells/{row}/{column}", put(edit_cell_handler))
        .with_state(state)
}

pub async fn homepage_handler() -> impl IntoResponse {
    Html(include_str!("index.html"))
}

pub async fn state_handler(State(state): State<AppState>) -> Json<GridView> {
    Json(GridView::of(&state.session))
}

pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(form): Json<RefreshForm>,
) -> Result<Json<GridView>, AppError> {
    let credentials = Credentials::new(&form.passphrase, "", &form.gist_id);
    state.session.refresh(&credentials).await?;
    Ok(Json(GridView::of(&state.session)))
}

pub async fn upload_handler(
    State(state): State<AppState>,
    Json(form): Json<UploadForm>,
) -> Result<Json<GridView>, AppError> {
    let credentials = Credentials::new(&form.passphrase, &form.token, &form.gist_id);
    state.session.upload(&credentials).await?;
    Ok(Json(GridView::of(&state.session)))
}

pub async fn add_row_handler(State(state): State<AppState>) -> Json<GridView> {
    state.session.add_row();
    Json(GridView::of(&state.session))
}

pub async fn edit_cell_handler(
    State(state): State<AppState>,
    Path((row, column)): Path<(usize, usize)>,
    Json(form): Json<CellForm>,
) -> Result<Json<GridView>, AppError> {
    state.session.edit_cell(row, column, Cell::from(form.value))?;
    Ok(Json(GridView::of(&state.session)))
}
