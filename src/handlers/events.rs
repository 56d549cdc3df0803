use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::auth::{CurrentUser, MaybeUser};
use crate::domain::{bookmarks, events, registrations, Viewer};
use crate::models::event::{EventFilter, EventInput, EventPatch};
use crate::utils::error::AppError;
use crate::utils::pagination::PageParams;
use crate::utils::response::{created, success};
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    user: MaybeUser,
    Query(filter): Query<EventFilter>,
    Query(page): Query<PageParams>,
) -> Result<Response, AppError> {
    let events = events::list_events(&state.pool, user.viewer(), &filter, &page).await?;
    Ok(success(events, "Events retrieved").into_response())
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<EventInput>,
) -> Result<Response, AppError> {
    let event = events::create_event(&state.pool, user.id, input).await?;
    Ok(created(event, "Event created").into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let event = events::fetch_event(&state.pool, user.viewer(), event_id).await?;
    Ok(success(event, "Event retrieved").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(input): Json<EventInput>,
) -> Result<Response, AppError> {
    let event = events::update_event(&state.pool, Viewer::User(user.id), event_id, input).await?;
    Ok(success(event, "Event updated").into_response())
}

pub async fn partial_update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> Result<Response, AppError> {
    let event = events::patch_event(&state.pool, Viewer::User(user.id), event_id, patch).await?;
    Ok(success(event, "Event updated").into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    events::delete_event(&state.pool, event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn register(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let registration = registrations::register(&state.pool, event_id, &user).await?;
    Ok(created(registration, "Registered for event").into_response())
}

pub async fn add_bookmark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let bookmark = bookmarks::add(&state.pool, event_id, &user).await?;
    Ok(created(bookmark, "Event bookmarked").into_response())
}

pub async fn remove_bookmark(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(event_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    bookmarks::remove(&state.pool, event_id, &user).await?;
    Ok(StatusCode::NO_CONTENT)
}
