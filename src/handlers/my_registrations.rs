use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::domain::registrations;
use crate::models::registration::MyRegistrationFilter;
use crate::utils::error::AppError;
use crate::utils::pagination::PageParams;
use crate::utils::response::success;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(filter): Query<MyRegistrationFilter>,
    Query(page): Query<PageParams>,
) -> Result<Response, AppError> {
    let registrations = registrations::list_mine(&state.pool, &user, &filter, &page).await?;
    Ok(success(registrations, "Registrations retrieved").into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(registration_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let registration = registrations::fetch_mine(&state.pool, &user, registration_id).await?;
    Ok(success(registration, "Registration retrieved").into_response())
}
