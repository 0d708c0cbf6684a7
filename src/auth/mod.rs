use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/me", get(handlers::get_me))
}
