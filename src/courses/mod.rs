use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(handlers::list_courses))
        .route("/courses", post(handlers::create_course))
        .route("/courses/:id", get(handlers::get_course))
        .route("/courses/:id", put(handlers::update_course))
        .route("/courses/:id", delete(handlers::delete_course))
}
