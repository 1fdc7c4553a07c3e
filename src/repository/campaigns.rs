use super::RepositoryError;
use crate::domain::{CampaignStatus, EmailCampaign, NewCampaign};
use sqlx::PgPool;
use uuid::Uuid;

#[tracing::instrument(name = "List campaigns", skip(db_pool))]
pub async fn list_for_user(
    db_pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<EmailCampaign>, RepositoryError> {
    sqlx::query_as::<_, EmailCampaign>(
        r#"
        SELECT * FROM email_campaigns
        WHERE user_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db_pool)
    .await
    .map_err(|e| RepositoryError::FetchFailed("email_campaigns", e))
}

#[tracing::instrument(name = "Find campaign for owner", skip(db_pool))]
pub async fn find_for_user(
    db_pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
) -> Result<Option<EmailCampaign>, RepositoryError> {
    sqlx::query_as::<_, EmailCampaign>(
        "SELECT * FROM email_campaigns WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db_pool)
    .await
    .map_err(|e| RepositoryError::FetchFailed("email_campaigns", e))
}

/// New campaigns always start as drafts.
#[tracing::instrument(name = "Insert campaign", skip(db_pool, campaign))]
pub async fn insert(
    db_pool: &PgPool,
    user_id: Uuid,
    campaign: &NewCampaign,
) -> Result<EmailCampaign, RepositoryError> {
    sqlx::query_as::<_, EmailCampaign>(
        r#"
        INSERT INTO email_campaigns (id, user_id, name, subject, content_html, content_text, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&campaign.name)
    .bind(&campaign.subject)
    .bind(&campaign.content_html)
    .bind(&campaign.content_text)
    .bind(CampaignStatus::Draft.as_ref())
    .fetch_one(db_pool)
    .await
    .map_err(|e| RepositoryError::MutationFailed("email_campaigns", e))
}

/// Guarded by the current status so a stale caller cannot move a campaign
/// backwards; returns false when the row was no longer in `current`.
#[tracing::instrument(name = "Update campaign status", skip(db_pool))]
pub async fn update_status(
    db_pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    current: CampaignStatus,
    next: CampaignStatus,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r#"
        UPDATE email_campaigns
        SET status = $1, updated_at = now()
        WHERE id = $2 AND user_id = $3 AND status = $4
        "#,
    )
    .bind(next.as_ref())
    .bind(id)
    .bind(user_id)
    .bind(current.as_ref())
    .execute(db_pool)
    .await
    .map_err(|e| RepositoryError::MutationFailed("email_campaigns", e))?;

    Ok(result.rows_affected() > 0)
}
