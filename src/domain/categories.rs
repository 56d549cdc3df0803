use sqlx::PgPool;
use uuid::Uuid;

use crate::models::category::{Category, CategoryInput, CategoryPatch};
use crate::utils::error::AppError;

fn category_not_found(category_id: Uuid) -> AppError {
    AppError::NotFound(format!("Category '{category_id}' was not found"))
}

fn map_unique_name(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.constraint() == Some("categories_name_key") => {
            AppError::ValidationError("A category with this name already exists".to_string())
        }
        _ => AppError::from(err),
    }
}

pub async fn list(pool: &PgPool) -> Result<Vec<Category>, AppError> {
    let categories = sqlx::query_as("SELECT * FROM categories ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(categories)
}

pub async fn fetch(pool: &PgPool, category_id: Uuid) -> Result<Category, AppError> {
    sqlx::query_as("SELECT * FROM categories WHERE id = $1")
        .bind(category_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| category_not_found(category_id))
}

pub async fn create(pool: &PgPool, input: CategoryInput) -> Result<Category, AppError> {
    sqlx::query_as(
        "INSERT INTO categories (name, description, icon) VALUES ($1, $2, $3) RETURNING *",
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(&input.icon)
    .fetch_one(pool)
    .await
    .map_err(map_unique_name)
}

pub async fn update(
    pool: &PgPool,
    category_id: Uuid,
    input: CategoryInput,
) -> Result<Category, AppError> {
    sqlx::query_as(
        "UPDATE categories SET name = $2, description = $3, icon = $4 WHERE id = $1 RETURNING *",
    )
    .bind(category_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(&input.icon)
    .fetch_optional(pool)
    .await
    .map_err(map_unique_name)?
    .ok_or_else(|| category_not_found(category_id))
}

pub async fn patch(
    pool: &PgPool,
    category_id: Uuid,
    patch: CategoryPatch,
) -> Result<Category, AppError> {
    sqlx::query_as(
        "UPDATE categories SET \
         name = COALESCE($2, name), \
         description = COALESCE($3, description), \
         icon = COALESCE($4, icon) \
         WHERE id = $1 RETURNING *",
    )
    .bind(category_id)
    .bind(patch.name)
    .bind(patch.description)
    .bind(patch.icon)
    .fetch_optional(pool)
    .await
    .map_err(map_unique_name)?
    .ok_or_else(|| category_not_found(category_id))
}

pub async fn delete(pool: &PgPool, category_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(category_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(category_not_found(category_id));
    }
    Ok(())
}
