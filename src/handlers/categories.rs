use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::domain::categories;
use crate::models::category::{CategoryInput, CategoryPatch};
use crate::utils::error::AppError;
use crate::utils::response::{created, success};
use crate::AppState;

pub async fn list(State(state): State<AppState>) -> Result<Response, AppError> {
    let categories = categories::list(&state.pool).await?;
    Ok(success(categories, "Categories retrieved").into_response())
}

pub async fn create(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Json(input): Json<CategoryInput>,
) -> Result<Response, AppError> {
    let category = categories::create(&state.pool, input).await?;
    Ok(created(category, "Category created").into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let category = categories::fetch(&state.pool, category_id).await?;
    Ok(success(category, "Category retrieved").into_response())
}

pub async fn update(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(input): Json<CategoryInput>,
) -> Result<Response, AppError> {
    let category = categories::update(&state.pool, category_id, input).await?;
    Ok(success(category, "Category updated").into_response())
}

pub async fn partial_update(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(category_id): Path<Uuid>,
    Json(patch): Json<CategoryPatch>,
) -> Result<Response, AppError> {
    let category = categories::patch(&state.pool, category_id, patch).await?;
    Ok(success(category, "Category updated").into_response())
}

pub async fn destroy(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    categories::delete(&state.pool, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
