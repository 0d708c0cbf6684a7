use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Course record. `user_id` is the owning instructor, set from the
/// authenticated creator and nulled out if that user is deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub user_id: Option<i64>,
}

pub async fn list_all(db: &SqlitePool) -> sqlx::Result<Vec<Course>> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, user_id
        FROM courses
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Course>> {
    sqlx::query_as::<_, Course>(
        r#"
        SELECT id, name, user_id
        FROM courses
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert(db: &SqlitePool, name: &str, user_id: Option<i64>) -> sqlx::Result<Course> {
    sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (name, user_id)
        VALUES (?, ?)
        RETURNING id, name, user_id
        "#,
    )
    .bind(name)
    .bind(user_id)
    .fetch_one(db)
    .await
}

/// Rename a course in place. Returns `None` when the id has no row.
pub async fn update_name(db: &SqlitePool, id: i64, name: &str) -> sqlx::Result<Option<Course>> {
    sqlx::query_as::<_, Course>(
        r#"
        UPDATE courses
        SET name = ?
        WHERE id = ?
        RETURNING id, name, user_id
        "#,
    )
    .bind(name)
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
