pub mod auth;
pub mod config;
pub mod domain;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod utils;

use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
