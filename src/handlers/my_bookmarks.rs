use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::domain::bookmarks;
use crate::utils::error::AppError;
use crate::utils::pagination::PageParams;
use crate::utils::response::success;
use crate::AppState;

pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(page): Query<PageParams>,
) -> Result<Response, AppError> {
    let bookmarks = bookmarks::list_mine(&state.pool, &user, &page).await?;
    Ok(success(bookmarks, "Bookmarks retrieved").into_response())
}

pub async fn retrieve(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(bookmark_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let bookmark = bookmarks::fetch_mine(&state.pool, &user, bookmark_id).await?;
    Ok(success(bookmark, "Bookmark retrieved").into_response())
}
