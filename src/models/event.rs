use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::category::Category;
use crate::models::user::UserPublic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
pub enum EventStatus {
    Draft,
    Published,
    Canceled,
}

/// Raw `events` row, without joined or derived fields.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Option<Uuid>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer_id: Uuid,
    pub capacity: i32,
    pub cover_image: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_featured: bool,
}

/// Client-facing event representation with nested category/organizer and the
/// per-request derived fields (registration count, viewer flags).
#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub organizer: UserPublic,
    pub capacity: i32,
    pub cover_image: Option<String>,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_featured: bool,
    pub registration_count: i64,
    pub is_registered: bool,
    pub is_bookmarked: bool,
}

/// Write payload for create and full update. The organizer is never part of
/// the payload; it is fixed from the acting user at creation.
#[derive(Debug, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: String,
    pub category: Option<Uuid>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub cover_image: Option<String>,
    pub status: Option<EventStatus>,
    pub is_featured: Option<bool>,
}

/// Partial update payload. `category` and `cover_image` distinguish "absent"
/// from an explicit `null` that clears the field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<Option<Uuid>>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub cover_image: Option<Option<String>>,
    pub status: Option<EventStatus>,
    pub is_featured: Option<bool>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.location.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.capacity.is_none()
            && self.cover_image.is_none()
            && self.status.is_none()
            && self.is_featured.is_none()
    }
}

/// Query parameters accepted by the event listing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    pub category: Option<Uuid>,
    pub status: Option<EventStatus>,
    pub is_featured: Option<bool>,
    pub search: Option<String>,
    pub ordering: Option<String>,
    pub show_past: bool,
    pub registered: Option<bool>,
    pub bookmarked: Option<bool>,
}
