//! Dashboard route handlers.
//!
//! Actions answer with a `303` back to `/` on success. On failure they
//! render the page directly with a blocking error notice, so the message
//! is in front of the user before anything else happens.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use std::sync::Arc;
use tracing::warn;

use super::forms::{FilterForm, SettingsForm, StakeForm};
use super::render::render_page;
use crate::engine::{Board, Notice};
use crate::error::{BoardError, RegistrationError};
use crate::types::{BetId, RenderModel};

pub type AppState = Arc<Board>;

/// GET /
pub async fn index(State(board): State<AppState>) -> Html<String> {
    Html(render_page(&board.view().await))
}

/// POST /refresh
///
/// Also re-reads the filter choices, which only change with the feed.
pub async fn refresh(State(board): State<AppState>) -> Response {
    match board.refresh().await {
        Ok(_) => {
            board.reload_choices().await;
            Redirect::to("/").into_response()
        }
        Err(e) => error_page(&board, e).await,
    }
}

/// POST /filters
pub async fn apply_filter(
    State(board): State<AppState>,
    Form(form): Form<FilterForm>,
) -> Response {
    let filter = match form.parse() {
        Ok(filter) => filter,
        Err(e) => return error_page(&board, e.into()).await,
    };
    match board.apply_filter(filter).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => error_page(&board, e).await,
    }
}

/// POST /settings
pub async fn save_settings(
    State(board): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let (remote, local) = match form.parse() {
        Ok(parsed) => parsed,
        Err(e) => return error_page(&board, e.into()).await,
    };
    match board.save_settings(remote, local).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(e) => error_page(&board, e).await,
    }
}

/// POST /register/:kind/:bet_id
pub async fn register(
    State(board): State<AppState>,
    Path((kind, raw_id)): Path<(String, String)>,
    Form(form): Form<StakeForm>,
) -> Response {
    let Some(bet_id) = BetId::from_parts(&kind, &raw_id) else {
        return error_page(&board, BoardError::UnknownBet(raw_id)).await;
    };
    let stake = match form.parse() {
        Ok(stake) => stake,
        Err(e) => return error_page(&board, e.into()).await,
    };
    match board.register(&bet_id, stake).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => error_page(&board, e).await,
    }
}

/// GET /api/board
pub async fn board_json(State(board): State<AppState>) -> Json<Option<RenderModel>> {
    Json(board.view().await.model.as_deref().cloned())
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub fn status_for(err: &BoardError) -> StatusCode {
    match err {
        BoardError::Remote(_) => StatusCode::BAD_GATEWAY,
        BoardError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BoardError::Registration(RegistrationError::InFlight(_)) => StatusCode::CONFLICT,
        BoardError::Registration(RegistrationError::Remote(_)) => StatusCode::BAD_GATEWAY,
        BoardError::UnknownBet(_) => StatusCode::NOT_FOUND,
        BoardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn error_page(board: &Board, err: BoardError) -> Response {
    let status = status_for(&err);
    warn!(status = status.as_u16(), error = %err, "Dashboard action failed");

    let mut view = board.view().await;
    view.notice = Some(Notice::Error(err.to_string()));
    (status, Html(render_page(&view))).into_response()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
