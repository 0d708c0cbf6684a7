use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// Student record. `course_id` points at the enrolled course, or NULL when
/// unenrolled (including after that course is deleted).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub course_id: Option<i64>,
}

pub async fn list_all(db: &SqlitePool) -> sqlx::Result<Vec<Student>> {
    sqlx::query_as::<_, Student>(
        r#"
        SELECT id, name, course_id
        FROM students
        ORDER BY id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn list_by_course(db: &SqlitePool, course_id: i64) -> sqlx::Result<Vec<Student>> {
    sqlx::query_as::<_, Student>(
        r#"
        SELECT id, name, course_id
        FROM students
        WHERE course_id = ?
        ORDER BY id
        "#,
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

pub async fn find_by_id(db: &SqlitePool, id: i64) -> sqlx::Result<Option<Student>> {
    sqlx::query_as::<_, Student>(
        r#"
        SELECT id, name, course_id
        FROM students
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Insert a new student. A `course_id` pointing at no course fails the
/// foreign-key check instead of creating a dangling reference.
pub async fn insert(db: &SqlitePool, name: &str, course_id: Option<i64>) -> sqlx::Result<Student> {
    sqlx::query_as::<_, Student>(
        r#"
        INSERT INTO students (name, course_id)
        VALUES (?, ?)
        RETURNING id, name, course_id
        "#,
    )
    .bind(name)
    .bind(course_id)
    .fetch_one(db)
    .await
}

pub async fn update(
    db: &SqlitePool,
    id: i64,
    name: &str,
    course_id: Option<i64>,
) -> sqlx::Result<Option<Student>> {
    sqlx::query_as::<_, Student>(
        r#"
        UPDATE students
        SET name = ?, course_id = ?
        WHERE id = ?
        RETURNING id, name, course_id
        "#,
    )
    .bind(name)
    .bind(course_id)
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn delete(db: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::courses;
    use crate::state::test_support::test_db;
    use sqlx::error::ErrorKind;

    #[tokio::test]
    async fn insert_links_to_an_existing_course() {
        let db = test_db().await;
        let course = courses::repo::insert(&db, "Math", None).await.expect("course");
        let student = insert(&db, "Anthony", Some(course.id)).await.expect("insert");
        assert_eq!(student.id, 1);
        assert_eq!(student.course_id, Some(course.id));

        let linked = list_by_course(&db, course.id).await.expect("list");
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].name, "Anthony");
    }

    #[tokio::test]
    async fn insert_without_course_is_allowed() {
        let db = test_db().await;
        let student = insert(&db, "Charlie", None).await.expect("insert");
        assert_eq!(student.course_id, None);
    }

    #[tokio::test]
    async fn insert_with_unknown_course_fails_the_fk_check() {
        let db = test_db().await;
        let err = insert(&db, "Anthony", Some(99)).await.unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => {
                assert_eq!(db_err.kind(), ErrorKind::ForeignKeyViolation)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn duplicate_student_name_is_rejected() {
        let db = test_db().await;
        insert(&db, "Anthony", None).await.expect("insert");
        let err = insert(&db, "Anthony", None).await.unwrap_err();
        match err {
            sqlx::Error::Database(db_err) => {
                assert_eq!(db_err.kind(), ErrorKind::UniqueViolation)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn update_moves_a_student_between_courses() {
        let db = test_db().await;
        let math = courses::repo::insert(&db, "Math", None).await.expect("course");
        let science = courses::repo::insert(&db, "Science", None).await.expect("course");
        let student = insert(&db, "Britney", Some(math.id)).await.expect("insert");

        let moved = update(&db, student.id, "Britney", Some(science.id))
            .await
            .expect("update")
            .expect("present");
        assert_eq!(moved.id, student.id);
        assert_eq!(moved.course_id, Some(science.id));
    }
}
