use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer};
use crate::handlers::{categories, events, health_check, my_bookmarks, my_registrations};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/:id",
            get(categories::retrieve)
                .put(categories::update)
                .patch(categories::partial_update)
                .delete(categories::destroy),
        )
        .route("/events", get(events::list).post(events::create))
        .route(
            "/events/:id",
            get(events::retrieve)
                .put(events::update)
                .patch(events::partial_update)
                .delete(events::destroy),
        )
        .route("/events/:id/register", post(events::register))
        .route(
            "/events/:id/bookmark",
            post(events::add_bookmark).delete(events::remove_bookmark),
        )
        .route("/my-registrations", get(my_registrations::list))
        .route("/my-registrations/:id", get(my_registrations::retrieve))
        .route("/my-bookmarks", get(my_bookmarks::list))
        .route("/my-bookmarks/:id", get(my_bookmarks::retrieve))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer())
        .layer(create_cors_layer())
        .with_state(state)
}
