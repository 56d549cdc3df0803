use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use campus_activity_server::models::user::User;

pub async fn create_user(pool: &PgPool, username: &str) -> User {
    sqlx::query_as("INSERT INTO users (username, email, api_token) VALUES ($1, $2, $3) RETURNING *")
        .bind(username)
        .bind(format!("{username}@campus.test"))
        .bind(format!("token-{username}"))
        .fetch_one(pool)
        .await
        .expect("failed to insert user")
}

/// Inserts an event directly, bypassing the write-path validation, so tests
/// can set up past events.
pub async fn create_event(
    pool: &PgPool,
    organizer: &User,
    title: &str,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    capacity: i32,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO events (title, description, location, start_time, end_time, organizer_id, capacity) \
         VALUES ($1, 'An event for testing', 'Main hall', $2, $3, $4, $5) RETURNING id",
    )
    .bind(title)
    .bind(start_time)
    .bind(end_time)
    .bind(organizer.id)
    .bind(capacity)
    .fetch_one(pool)
    .await
    .expect("failed to insert event")
}

/// Event starting `hours_from_now` hours from now and running for two hours.
pub async fn create_upcoming_event(
    pool: &PgPool,
    organizer: &User,
    title: &str,
    hours_from_now: i64,
    capacity: i32,
) -> Uuid {
    let start_time = Utc::now() + Duration::hours(hours_from_now);
    create_event(pool, organizer, title, start_time, start_time + Duration::hours(2), capacity).await
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT count(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("failed to count rows")
}
