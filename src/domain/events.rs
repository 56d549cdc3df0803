use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::Viewer;
use crate::models::category::Category;
use crate::models::event::{Event, EventDetail, EventFilter, EventInput, EventPatch, EventStatus};
use crate::models::user::UserPublic;
use crate::utils::error::AppError;
use crate::utils::pagination::{Page, PageParams};

const DEFAULT_CAPACITY: i32 = 100;

pub(crate) const EVENT_JOINS: &str = " FROM events e \
     LEFT JOIN categories c ON c.id = e.category_id \
     JOIN users u ON u.id = e.organizer_id";

/// Flat row shape produced by the event SELECT built in
/// [`push_event_columns`]; folded into [`EventDetail`].
#[derive(Debug, FromRow)]
pub(crate) struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: i32,
    pub cover_image: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_featured: bool,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub category_description: Option<String>,
    pub category_icon: Option<String>,
    pub organizer_id: Uuid,
    pub organizer_username: String,
    pub organizer_email: String,
    pub organizer_first_name: String,
    pub organizer_last_name: String,
    pub registration_count: i64,
    pub is_registered: bool,
    pub is_bookmarked: bool,
}

impl From<EventRow> for EventDetail {
    fn from(row: EventRow) -> Self {
        let category = row.category_id.map(|id| Category {
            id,
            name: row.category_name.unwrap_or_default(),
            description: row.category_description.unwrap_or_default(),
            icon: row.category_icon.unwrap_or_default(),
        });

        EventDetail {
            id: row.id,
            title: row.title,
            description: row.description,
            category,
            location: row.location,
            start_time: row.start_time,
            end_time: row.end_time,
            organizer: UserPublic {
                id: row.organizer_id,
                username: row.organizer_username,
                email: row.organizer_email,
                first_name: row.organizer_first_name,
                last_name: row.organizer_last_name,
            },
            capacity: row.capacity,
            cover_image: row.cover_image,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            is_featured: row.is_featured,
            registration_count: row.registration_count,
            is_registered: row.is_registered,
            is_bookmarked: row.is_bookmarked,
        }
    }
}

/// Pushes the column list for [`EventRow`], including the derived
/// registration count and the viewer flags. Expects table aliases `e`
/// (events), `c` (categories) and `u` (organizer) to be in scope.
pub(crate) fn push_event_columns(qb: &mut QueryBuilder<'_, Postgres>, viewer: Viewer) {
    qb.push(
        "e.id, e.title, e.description, e.location, e.start_time, e.end_time, \
         e.capacity, e.cover_image, e.status, e.created_at, e.updated_at, e.is_featured, \
         e.category_id, c.name AS category_name, c.description AS category_description, \
         c.icon AS category_icon, \
         e.organizer_id, u.username AS organizer_username, u.email AS organizer_email, \
         u.first_name AS organizer_first_name, u.last_name AS organizer_last_name, \
         (SELECT count(*) FROM registrations r2 WHERE r2.event_id = e.id) AS registration_count, ",
    );
    match viewer.user_id() {
        Some(user_id) => {
            qb.push("EXISTS(SELECT 1 FROM registrations r2 WHERE r2.event_id = e.id AND r2.user_id = ");
            qb.push_bind(user_id);
            qb.push(") AS is_registered, EXISTS(SELECT 1 FROM bookmarks b2 WHERE b2.event_id = e.id AND b2.user_id = ");
            qb.push_bind(user_id);
            qb.push(") AS is_bookmarked");
        }
        None => {
            qb.push("FALSE AS is_registered, FALSE AS is_bookmarked");
        }
    }
}

fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &EventFilter, viewer: Viewer) {
    qb.push(" WHERE TRUE");

    if !filter.show_past {
        qb.push(" AND e.end_time >= now()");
    }
    if let Some(category) = filter.category {
        qb.push(" AND e.category_id = ").push_bind(category);
    }
    if let Some(status) = filter.status {
        qb.push(" AND e.status = ").push_bind(status);
    }
    if let Some(featured) = filter.is_featured {
        qb.push(" AND e.is_featured = ").push_bind(featured);
    }
    if let Some(term) = filter.search.as_deref().filter(|t| !t.is_empty()) {
        let pattern = format!("%{term}%");
        qb.push(" AND (e.title ILIKE ").push_bind(pattern.clone());
        qb.push(" OR e.description ILIKE ").push_bind(pattern.clone());
        qb.push(" OR e.location ILIKE ").push_bind(pattern);
        qb.push(")");
    }

    // Viewer-dependent filters are no-ops for anonymous requests.
    if let Some(user_id) = viewer.user_id() {
        match filter.registered {
            Some(true) => {
                qb.push(" AND EXISTS(SELECT 1 FROM registrations r WHERE r.event_id = e.id AND r.user_id = ");
                qb.push_bind(user_id);
                qb.push(")");
            }
            Some(false) => {
                qb.push(" AND NOT EXISTS(SELECT 1 FROM registrations r WHERE r.event_id = e.id AND r.user_id = ");
                qb.push_bind(user_id);
                qb.push(")");
            }
            None => {}
        }
        if filter.bookmarked == Some(true) {
            qb.push(" AND EXISTS(SELECT 1 FROM bookmarks b WHERE b.event_id = e.id AND b.user_id = ");
            qb.push_bind(user_id);
            qb.push(")");
        }
    }
}

fn order_clause(ordering: Option<&str>) -> &'static str {
    match ordering {
        Some("start_time") => "e.start_time ASC",
        Some("created_at") => "e.created_at ASC",
        Some("-created_at") => "e.created_at DESC",
        _ => "e.start_time DESC",
    }
}

pub async fn list_events(
    pool: &PgPool,
    viewer: Viewer,
    filter: &EventFilter,
    page: &PageParams,
) -> Result<Page<EventDetail>, AppError> {
    let mut count_qb = QueryBuilder::new("SELECT count(*) FROM events e");
    push_filters(&mut count_qb, filter, viewer);
    let count: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new("SELECT ");
    push_event_columns(&mut qb, viewer);
    qb.push(EVENT_JOINS);
    push_filters(&mut qb, filter, viewer);
    qb.push(" ORDER BY ");
    qb.push(order_clause(filter.ordering.as_deref()));
    qb.push(" LIMIT ").push_bind(page.limit());
    qb.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<EventRow> = qb.build_query_as().fetch_all(pool).await?;
    let results = rows.into_iter().map(EventDetail::from).collect();

    Ok(Page::new(results, count, page))
}

pub async fn fetch_event(
    pool: &PgPool,
    viewer: Viewer,
    event_id: Uuid,
) -> Result<EventDetail, AppError> {
    let mut qb = QueryBuilder::new("SELECT ");
    push_event_columns(&mut qb, viewer);
    qb.push(EVENT_JOINS);
    qb.push(" WHERE e.id = ").push_bind(event_id);

    let row: Option<EventRow> = qb.build_query_as().fetch_optional(pool).await?;
    row.map(EventDetail::from).ok_or_else(|| event_not_found(event_id))
}

pub(crate) fn event_not_found(event_id: Uuid) -> AppError {
    AppError::NotFound(format!("Event '{event_id}' was not found"))
}

/// Time-ordering rules applied on create and update. The past-start rule is
/// evaluated against `now` once, at validation time; events may age into the
/// past afterwards.
pub fn validate_times(
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if start_time >= end_time {
        return Err(AppError::ValidationError(
            "end_time must be after start_time".to_string(),
        ));
    }
    if start_time < now {
        return Err(AppError::ValidationError(
            "start_time must not be in the past".to_string(),
        ));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> Result<(), AppError> {
    if capacity <= 0 {
        return Err(AppError::ValidationError(
            "capacity must be a positive integer".to_string(),
        ));
    }
    Ok(())
}

fn map_category_fk(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.constraint() == Some("events_category_id_fkey") => {
            AppError::ValidationError("Unknown category".to_string())
        }
        _ => AppError::from(err),
    }
}

pub async fn create_event(
    pool: &PgPool,
    organizer_id: Uuid,
    input: EventInput,
) -> Result<EventDetail, AppError> {
    validate_times(input.start_time, input.end_time, Utc::now())?;
    let capacity = input.capacity.unwrap_or(DEFAULT_CAPACITY);
    validate_capacity(capacity)?;

    let event_id: Uuid = sqlx::query_scalar(
        "INSERT INTO events \
         (title, description, category_id, location, start_time, end_time, \
          organizer_id, capacity, cover_image, status, is_featured) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING id",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.category)
    .bind(&input.location)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(organizer_id)
    .bind(capacity)
    .bind(&input.cover_image)
    .bind(input.status.unwrap_or(EventStatus::Published))
    .bind(input.is_featured.unwrap_or(false))
    .fetch_one(pool)
    .await
    .map_err(map_category_fk)?;

    fetch_event(pool, Viewer::User(organizer_id), event_id).await
}

/// Full update. The organizer column is deliberately not touched.
pub async fn update_event(
    pool: &PgPool,
    viewer: Viewer,
    event_id: Uuid,
    input: EventInput,
) -> Result<EventDetail, AppError> {
    validate_times(input.start_time, input.end_time, Utc::now())?;
    let capacity = input.capacity.unwrap_or(DEFAULT_CAPACITY);
    validate_capacity(capacity)?;

    let result = sqlx::query(
        "UPDATE events SET \
         title = $1, description = $2, category_id = $3, location = $4, \
         start_time = $5, end_time = $6, capacity = $7, cover_image = $8, \
         status = $9, is_featured = $10, updated_at = now() \
         WHERE id = $11",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.category)
    .bind(&input.location)
    .bind(input.start_time)
    .bind(input.end_time)
    .bind(capacity)
    .bind(&input.cover_image)
    .bind(input.status.unwrap_or(EventStatus::Published))
    .bind(input.is_featured.unwrap_or(false))
    .bind(event_id)
    .execute(pool)
    .await
    .map_err(map_category_fk)?;

    if result.rows_affected() == 0 {
        return Err(event_not_found(event_id));
    }

    fetch_event(pool, viewer, event_id).await
}

/// Partial update. Time validation runs against the merged stored+patched
/// pair, and only when the patch touches a time field.
pub async fn patch_event(
    pool: &PgPool,
    viewer: Viewer,
    event_id: Uuid,
    patch: EventPatch,
) -> Result<EventDetail, AppError> {
    let current: Event = sqlx::query_as("SELECT * FROM events WHERE id = $1")
        .bind(event_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| event_not_found(event_id))?;

    if patch.start_time.is_some() || patch.end_time.is_some() {
        let start_time = patch.start_time.unwrap_or(current.start_time);
        let end_time = patch.end_time.unwrap_or(current.end_time);
        validate_times(start_time, end_time, Utc::now())?;
    }
    if let Some(capacity) = patch.capacity {
        validate_capacity(capacity)?;
    }
    if patch.is_empty() {
        return fetch_event(pool, viewer, event_id).await;
    }

    let mut qb = QueryBuilder::new("UPDATE events SET updated_at = now()");
    if let Some(title) = patch.title {
        qb.push(", title = ").push_bind(title);
    }
    if let Some(description) = patch.description {
        qb.push(", description = ").push_bind(description);
    }
    if let Some(category) = patch.category {
        qb.push(", category_id = ").push_bind(category);
    }
    if let Some(location) = patch.location {
        qb.push(", location = ").push_bind(location);
    }
    if let Some(start_time) = patch.start_time {
        qb.push(", start_time = ").push_bind(start_time);
    }
    if let Some(end_time) = patch.end_time {
        qb.push(", end_time = ").push_bind(end_time);
    }
    if let Some(capacity) = patch.capacity {
        qb.push(", capacity = ").push_bind(capacity);
    }
    if let Some(cover_image) = patch.cover_image {
        qb.push(", cover_image = ").push_bind(cover_image);
    }
    if let Some(status) = patch.status {
        qb.push(", status = ").push_bind(status);
    }
    if let Some(is_featured) = patch.is_featured {
        qb.push(", is_featured = ").push_bind(is_featured);
    }
    qb.push(" WHERE id = ").push_bind(event_id);

    qb.build().execute(pool).await.map_err(map_category_fk)?;

    fetch_event(pool, viewer, event_id).await
}

pub async fn delete_event(pool: &PgPool, event_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(event_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(event_not_found(event_id));
    }
    Ok(())
}
