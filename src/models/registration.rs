use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::event::EventDetail;
use crate::models::user::UserPublic;

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationDetail {
    pub id: Uuid,
    pub event: EventDetail,
    pub user: UserPublic,
    pub registration_time: DateTime<Utc>,
    pub attended: bool,
    pub feedback: String,
    pub rating: Option<i16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MyRegistrationFilter {
    pub attended: Option<bool>,
}
