use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::events::{event_not_found, push_event_columns, EventRow};
use crate::domain::Viewer;
use crate::models::event::EventDetail;
use crate::models::registration::{MyRegistrationFilter, RegistrationDetail};
use crate::models::user::User;
use crate::utils::error::AppError;
use crate::utils::pagination::{Page, PageParams};

#[derive(Debug, FromRow)]
struct RegistrationRow {
    registration_id: Uuid,
    registration_time: DateTime<Utc>,
    attended: bool,
    feedback: String,
    rating: Option<i16>,
    #[sqlx(flatten)]
    event: EventRow,
}

impl RegistrationRow {
    fn into_detail(self, user: &User) -> RegistrationDetail {
        RegistrationDetail {
            id: self.registration_id,
            event: EventDetail::from(self.event),
            user: user.public(),
            registration_time: self.registration_time,
            attended: self.attended,
            feedback: self.feedback,
            rating: self.rating,
        }
    }
}

/// Registers `user` for the event. The event row is locked for the duration
/// of the transaction, so concurrent registrations for the same event
/// serialize and the capacity check cannot be raced past.
///
/// Precondition order is part of the contract: capacity first, then the
/// duplicate check.
pub async fn register(
    pool: &PgPool,
    event_id: Uuid,
    user: &User,
) -> Result<RegistrationDetail, AppError> {
    let mut tx = pool.begin().await?;

    let capacity: i32 = sqlx::query_scalar("SELECT capacity FROM events WHERE id = $1 FOR UPDATE")
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| event_not_found(event_id))?;

    let registered: i64 =
        sqlx::query_scalar("SELECT count(*) FROM registrations WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?;
    if registered >= i64::from(capacity) {
        return Err(AppError::Conflict("Event is at full capacity".to_string()));
    }

    let already: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM registrations WHERE event_id = $1 AND user_id = $2)",
    )
    .bind(event_id)
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await?;
    if already {
        return Err(AppError::Conflict(
            "You are already registered for this event".to_string(),
        ));
    }

    let (id, registration_time): (Uuid, DateTime<Utc>) = sqlx::query_as(
        "INSERT INTO registrations (event_id, user_id) VALUES ($1, $2) \
         RETURNING id, registration_time",
    )
    .bind(event_id)
    .bind(user.id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    // Fetched after commit so is_registered reflects the new row.
    let event = super::events::fetch_event(pool, Viewer::User(user.id), event_id).await?;

    Ok(RegistrationDetail {
        id,
        event,
        user: user.public(),
        registration_time,
        attended: false,
        feedback: String::new(),
        rating: None,
    })
}

fn push_my_registrations_select(qb: &mut QueryBuilder<'_, Postgres>, user_id: Uuid) {
    qb.push("SELECT r.id AS registration_id, r.registration_time, r.attended, r.feedback, r.rating, ");
    push_event_columns(qb, Viewer::User(user_id));
    qb.push(
        " FROM registrations r \
         JOIN events e ON e.id = r.event_id \
         LEFT JOIN categories c ON c.id = e.category_id \
         JOIN users u ON u.id = e.organizer_id \
         WHERE r.user_id = ",
    );
    qb.push_bind(user_id);
}

pub async fn list_mine(
    pool: &PgPool,
    user: &User,
    filter: &MyRegistrationFilter,
    page: &PageParams,
) -> Result<Page<RegistrationDetail>, AppError> {
    let mut count_qb =
        QueryBuilder::new("SELECT count(*) FROM registrations r WHERE r.user_id = ");
    count_qb.push_bind(user.id);
    if let Some(attended) = filter.attended {
        count_qb.push(" AND r.attended = ").push_bind(attended);
    }
    let count: i64 = count_qb.build_query_scalar().fetch_one(pool).await?;

    let mut qb = QueryBuilder::new("");
    push_my_registrations_select(&mut qb, user.id);
    if let Some(attended) = filter.attended {
        qb.push(" AND r.attended = ").push_bind(attended);
    }
    qb.push(" ORDER BY r.registration_time DESC");
    qb.push(" LIMIT ").push_bind(page.limit());
    qb.push(" OFFSET ").push_bind(page.offset());

    let rows: Vec<RegistrationRow> = qb.build_query_as().fetch_all(pool).await?;
    let results = rows.into_iter().map(|row| row.into_detail(user)).collect();

    Ok(Page::new(results, count, page))
}

pub async fn fetch_mine(
    pool: &PgPool,
    user: &User,
    registration_id: Uuid,
) -> Result<RegistrationDetail, AppError> {
    let mut qb = QueryBuilder::new("");
    push_my_registrations_select(&mut qb, user.id);
    qb.push(" AND r.id = ").push_bind(registration_id);

    let row: Option<RegistrationRow> = qb.build_query_as().fetch_optional(pool).await?;
    row.map(|row| row.into_detail(user))
        .ok_or_else(|| AppError::NotFound(format!("Registration '{registration_id}' was not found")))
}
