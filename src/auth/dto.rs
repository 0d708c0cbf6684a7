use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
}

/// Public part of the user returned to the client. The password hash never
/// leaves the persistence layer.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
}
