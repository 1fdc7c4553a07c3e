use super::RepositoryError;
use crate::domain::{Book, NewBook};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "List books", skip(db_pool))]
pub async fn list_for_user(db_pool: &PgPool, user_id: Uuid) -> Result<Vec<Book>, RepositoryError> {
    sqlx::query_as::<_, Book>(
        r#"
        SELECT * FROM books
        WHERE user_id = $1 AND is_active
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await
    .map_err(|e| RepositoryError::FetchFailed("books", e))
}

#[tracing::instrument(name = "Count books", skip(db_pool))]
pub async fn count_active_for_user(
    db_pool: &PgPool,
    user_id: Uuid,
) -> Result<i64, RepositoryError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM books WHERE user_id = $1 AND is_active")
            .bind(user_id)
            .fetch_one(db_pool)
            .await
            .map_err(|e| RepositoryError::FetchFailed("books", e))?;

    Ok(count)
}

#[tracing::instrument(name = "Find book for owner", skip(db_pool))]
pub async fn find_for_user(
    db_pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<Book>, RepositoryError> {
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .fetch_optional(db_pool)
        .await
        .map_err(|e| RepositoryError::FetchFailed("books", e))
}

/// Reader-facing lookup for the download gate; soft-deleted books are
/// invisible here.
#[tracing::instrument(name = "Find active book", skip(db_pool))]
pub async fn find_active(db_pool: &PgPool, id: Uuid) -> Result<Option<Book>, RepositoryError> {
    sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND is_active")
        .bind(id)
        .fetch_optional(db_pool)
        .await
        .map_err(|e| RepositoryError::FetchFailed("books", e))
}

#[tracing::instrument(name = "Insert book", skip(db_pool, book))]
pub async fn insert(
    db_pool: &PgPool,
    user_id: Uuid,
    book: &NewBook,
    file_url: &str,
    file_type: Option<&str>,
    cover_image_url: Option<&str>,
) -> Result<Book, RepositoryError> {
    let mut tx = db_pool
        .begin()
        .await
        .map_err(|e| RepositoryError::MutationFailed("books", e))?;

    let inserted = sqlx::query_as::<_, Book>(
        r#"
        INSERT INTO books
            (id, user_id, title, description, book_type, price, file_url, file_type,
             cover_image_url, expiration_date, collect_emails)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(book.title.as_ref())
    .bind(book.description.as_deref())
    .bind(book.book_type.as_ref())
    .bind(book.price)
    .bind(file_url)
    .bind(file_type)
    .bind(cover_image_url)
    .bind(book.expiration_date)
    .bind(book.collect_emails)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| RepositoryError::MutationFailed("books", e))?;

    // Upload tally on the profile, kept in step with the insert.
    sqlx::query(
        r#"
        UPDATE user_profiles
        SET books_uploaded = books_uploaded + 1, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| RepositoryError::MutationFailed("user_profiles", e))?;

    tx.commit()
        .await
        .map_err(|e| RepositoryError::MutationFailed("books", e))?;

    Ok(inserted)
}

/// Soft delete only: the row stays retrievable by id so download history and
/// campaign references keep working.
#[tracing::instrument(name = "Soft-delete book", skip(db_pool))]
pub async fn soft_delete(
    db_pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE books
        SET is_active = FALSE, updated_at = now()
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(db_pool)
    .await
    .map_err(|e| RepositoryError::MutationFailed("books", e))?;

    Ok(result.rows_affected() > 0)
}
