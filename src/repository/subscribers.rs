use super::RepositoryError;
use crate::domain::{EmailSubscriber, NewSubscriber};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "List subscribers", skip(db_pool))]
pub async fn list_active_for_user(
    db_pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<EmailSubscriber>, RepositoryError> {
    sqlx::query_as::<_, EmailSubscriber>(
        r#"
        SELECT * FROM email_subscribers
        WHERE user_id = $1 AND is_active
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await
    .map_err(|e| RepositoryError::FetchFailed("email_subscribers", e))
}

#[tracing::instrument(name = "Count subscribers", skip(db_pool))]
pub async fn count_active_for_user(
    db_pool: &PgPool,
    user_id: Uuid,
) -> Result<i64, RepositoryError> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM email_subscribers WHERE user_id = $1 AND is_active")
            .bind(user_id)
            .fetch_one(db_pool)
            .await
            .map_err(|e| RepositoryError::FetchFailed("email_subscribers", e))?;

    Ok(count)
}

/// Opt-ins are idempotent per (owner, email): a reader downloading twice
/// does not produce a second row.
#[tracing::instrument(name = "Insert subscriber", skip(db_pool, subscriber))]
pub async fn insert(
    db_pool: &PgPool,
    user_id: Uuid,
    subscriber: &NewSubscriber,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO email_subscribers (id, user_id, email, name, source, book_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id, email) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(subscriber.email.as_ref())
    .bind(subscriber.name.as_deref())
    .bind(subscriber.source.as_deref())
    .bind(subscriber.book_id)
    .execute(db_pool)
    .await
    .map_err(|e| RepositoryError::MutationFailed("email_subscribers", e))?;

    Ok(())
}

/// Deactivation, not deletion: the row keeps its history and timestamps
/// when it went inactive.
#[tracing::instrument(name = "Unsubscribe", skip(db_pool))]
pub async fn unsubscribe(db_pool: &PgPool, id: Uuid) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE email_subscribers
        SET is_active = FALSE, unsubscribed_at = now()
        WHERE id = $1 AND is_active
        "#,
    )
    .bind(id)
    .execute(db_pool)
    .await
    .map_err(|e| RepositoryError::MutationFailed("email_subscribers", e))?;

    Ok(result.rows_affected() > 0)
}
