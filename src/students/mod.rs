use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/students", get(handlers::list_students))
        .route("/students", post(handlers::create_student))
        .route("/students/:id", get(handlers::get_student))
        .route("/students/:id", put(handlers::update_student))
        .route("/students/:id", delete(handlers::delete_student))
}
