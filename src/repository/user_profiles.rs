use super::RepositoryError;
use crate::domain::{EmailAddress, SubscriptionPlan, SubscriptionStatus, UserProfile};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "Find user profile", skip(db_pool))]
pub async fn find(db_pool: &PgPool, user_id: Uuid) -> Result<Option<UserProfile>, RepositoryError> {
    sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db_pool)
        .await
        .map_err(|e| RepositoryError::FetchFailed("user_profiles", e))
}

/// Profiles are created lazily on the first dashboard load; the display name
/// defaults to the local part of the account email.
#[tracing::instrument(name = "Get or create user profile", skip(db_pool))]
pub async fn get_or_create(
    db_pool: &PgPool,
    user_id: Uuid,
) -> Result<UserProfile, RepositoryError> {
    if let Some(profile) = find(db_pool, user_id).await? {
        return Ok(profile);
    }

    let (email,): (String,) = sqlx::query_as("SELECT email FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(db_pool)
        .await
        .map_err(|e| RepositoryError::FetchFailed("users", e))?;

    let display_name = match EmailAddress::parse(email.clone()) {
        Ok(parsed) => parsed.local_part().to_string(),
        Err(_) => email.clone(),
    };

    sqlx::query_as::<_, UserProfile>(
        r#"
        INSERT INTO user_profiles
            (id, email, display_name, subscription_plan, subscription_status, books_uploaded)
        VALUES ($1, $2, $3, $4, $5, 0)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&email)
    .bind(&display_name)
    .bind(SubscriptionPlan::Free.as_ref())
    .bind(SubscriptionStatus::Active.as_ref())
    .fetch_one(db_pool)
    .await
    .map_err(|e| RepositoryError::MutationFailed("user_profiles", e))
}
