use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Insert a new user. The username carries a UNIQUE constraint, so inserting
/// a taken name fails with a database error rather than overwriting.
pub async fn create(db: &SqlitePool, username: &str, password_hash: &str) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash)
        VALUES (?, ?)
        RETURNING id, username, password_hash
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(db)
    .await
}
