use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::event::EventDetail;
use crate::models::user::UserPublic;

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkDetail {
    pub id: Uuid,
    pub event: EventDetail,
    pub user: UserPublic,
    pub created_at: DateTime<Utc>,
}
