use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::events::{event_not_found, push_event_columns, EventRow};
use crate::domain::Viewer;
use crate::models::bookmark::BookmarkDetail;
use crate::models::event::EventDetail;
use crate::models::user::User;
use crate::utils::error::AppError;
use crate::utils::pagination::{Page, PageParams};

#[derive(Debug, FromRow)]
struct BookmarkRow {
    bookmark_id: Uuid,
    bookmark_created_at: DateTime<Utc>,
    #[sqlx(flatten)]
    event: EventRow,
}

impl BookmarkRow {
    fn into_detail(self, user: &User) -> BookmarkDetail {
        BookmarkDetail {
            id: self.bookmark_id,
            event: EventDetail::from(self.event),
            user: user.public(),
            created_at: self.bookmark_created_at,
        }
    }
}

async fn ensure_event_exists(pool: &PgPool, event_id: Uuid) -> Result<(), AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
        .bind(event_id)
        .fetch_one(pool)
        .await?;
    if !exists {
        return Err(event_not_found(event_id));
    }
    Ok(())
}

/// Adds a bookmark. The (event, user) uniqueness constraint makes this safe
/// under races: a conflicting insert leaves the existing row untouched and
/// surfaces as `Conflict`.
pub async fn add(pool: &PgPool, event_id: Uuid, user: &User) -> Result<BookmarkDetail, AppError> {
    ensure_event_exists(pool, event_id).await?;

    let inserted: Option<(Uuid, DateTime<Utc>)> = sqlx::query_as(
        "INSERT INTO bookmarks (event_id, user_id) VALUES ($1, $2) \
         ON CONFLICT (event_id, user_id) DO NOTHING \
         RETURNING id, created_at",
    )
    .bind(event_id)
    .bind(user.id)
    .fetch_optional(pool)
    .await?;

    let (id, created_at) = inserted
        .ok_or_else(|| AppError::Conflict("Event is already bookmarked".to_string()))?;

    let event = super::events::fetch_event(pool, Viewer::User(user.id), event_id).await?;

    Ok(BookmarkDetail {
        id,
        event,
        user: user.public(),
        created_at,
    })
}

/// Removes the caller's bookmark. Deleting a bookmark that does not exist is
/// not an error; the operation is idempotent.
pub async fn remove(pool: &PgPool, event_id: Uuid, user: &User) -> Result<(), AppError> {
    ensure_event_exists(pool, event_id).await?;

    sqlx::query("DELETE FROM bookmarks WHERE event_id = $1 AND user_id = $2")
        .bind(event_id)
        .bind(user.id)
        .execute(pool)
        .await?;

    Ok(())
}

fn push_my_bookmarks_select(qb: &mut QueryBuilder<'_, Postgres>, user_id: Uuid) {
    qb.push("SELECT b.id AS bookmark_id, b.created_at AS bookmark_created_at, ");
    push_event_columns(qb, Viewer::User(user_id));
    qb.push(
        " FROM bookmarks b \
         JOIN events e ON e.id = b.event_id \
         LEFT JOIN categories c ON c.id = e.category_id \
         JOIN users u ON u.id = e.organizer_id \
         WHERE b.user_id = ",
    );
    qb.push_bind(user_id);
}

pub async fn list_mine(
    pool: &PgPool,
    user: &User,
    page: &PageParams,
) -> Result<Page<BookmarkDetail>, AppError> {
    let count: i64 = sqlx::query_scalar("SELECT count(*) FROM bookmarks WHERE user_id = $1")
        .bind(user.id)
        .fetch_one(pool)
        .await?;

    let mut qb = QueryBuilder::new("");
    push_my_bookmarks_select(&mut qb, user.id);
    qb.push(" ORDER BY b.created_at DESC");
    qb.push(" LIMIT ").push_bind(page.limit());
    qb.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<BookmarkRow> = qb.build_query_as().fetch_all(pool).await?;
    let results = rows.into_iter().map(|row| row.into_detail(user)).collect();

    Ok(Page::new(results, count, page))
}

pub async fn fetch_mine(
    pool: &PgPool,
    user: &User,
    bookmark_id: Uuid,
) -> Result<BookmarkDetail, AppError> {
    let mut qb = QueryBuilder::new("");
    push_my_bookmarks_select(&mut qb, user.id);
    qb.push(" AND b.id = ").push_bind(bookmark_id);

    let row: Option<BookmarkRow> = qb.build_query_as().fetch_optional(pool).await?;
    row.map(|row| row.into_detail(user))
        .ok_or_else(|| AppError::NotFound(format!("Bookmark '{bookmark_id}' was not found")))
}
