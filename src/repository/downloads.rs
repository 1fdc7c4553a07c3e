use super::RepositoryError;
use sqlx::PgPool;
use uuid::Uuid;

/// Appends the download log entry and bumps the book's counter in one
/// transaction, so concurrent downloads never lose an increment.
#[tracing::instrument(name = "Record download", skip(db_pool))]
pub async fn record(
    db_pool: &PgPool,
    book_id: Uuid,
    owner_id: Uuid,
    reader_email: Option<&str>,
) -> Result<(), RepositoryError> {
    let mut tx = db_pool
        .begin()
        .await
        .map_err(|e| RepositoryError::MutationFailed("downloads", e))?;

    sqlx::query(
        r#"
        INSERT INTO downloads (id, book_id, user_id, reader_email)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(book_id)
    .bind(owner_id)
    .bind(reader_email)
    .execute(&mut *tx)
    .await
    .map_err(|e| RepositoryError::MutationFailed("downloads", e))?;

    sqlx::query(
        r#"
        UPDATE books
        SET download_count = download_count + 1, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(book_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| RepositoryError::MutationFailed("books", e))?;

    tx.commit()
        .await
        .map_err(|e| RepositoryError::MutationFailed("downloads", e))?;

    Ok(())
}

#[tracing::instrument(name = "Count downloads", skip(db_pool))]
pub async fn count_for_user(db_pool: &PgPool, user_id: Uuid) -> Result<i64, RepositoryError> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM downloads WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db_pool)
        .await
        .map_err(|e| RepositoryError::FetchFailed("downloads", e))?;

    Ok(count)
}
